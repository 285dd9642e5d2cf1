// Copyright 2024-2025 Irreducible Inc.

/// One timing observation of a worker thread, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub thread_id: usize,
    pub start_ms: f64,
    pub end_ms: f64,
    /// Computed once from the original seconds, not from `end_ms - start_ms`.
    pub duration_ms: f64,
}

impl Sample {
    /// `end_seconds < start_seconds` is accepted and yields a negative duration.
    pub fn from_seconds(thread_id: usize, start_seconds: f64, end_seconds: f64) -> Self {
        Self {
            thread_id,
            start_ms: start_seconds * 1000.0,
            end_ms: end_seconds * 1000.0,
            duration_ms: (end_seconds - start_seconds) * 1000.0,
        }
    }
}
