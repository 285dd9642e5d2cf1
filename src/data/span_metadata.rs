// Copyright 2024-2025 Irreducible Inc.

use std::thread::ThreadId;

/// Per-span storage of the timing layer.
///
/// A span handle can be cloned into several threads and entered on all of them
/// at once, so open enters are keyed by the OS thread that made them.
#[derive(Debug)]
pub struct ThreadSpan {
    pub thread_id: usize,
    starts: Vec<(ThreadId, f64)>,
}

impl ThreadSpan {
    pub fn new(thread_id: usize) -> Self {
        Self {
            thread_id,
            starts: Vec::new(),
        }
    }

    pub fn enter(&mut self, thread: ThreadId, start_seconds: f64) {
        self.starts.push((thread, start_seconds));
    }

    /// Start time of the innermost open enter made by `thread`.
    pub fn exit(&mut self, thread: ThreadId) -> Option<f64> {
        let index = self.starts.iter().rposition(|(id, _)| *id == thread)?;
        Some(self.starts.remove(index).1)
    }
}
