// Copyright 2024-2025 Irreducible Inc.

//! Diagnostic channel for failures the recorder swallows.
//!
//! Flushing never returns an error to the instrumented program, so anything
//! that goes wrong is handed to a [`Reporter`] instead.

use crate::errors::err_msg;

pub trait Reporter: Send + Sync {
    fn report(&self, message: &str);
}

/// Prints diagnostics to stderr. Panics instead under the `panic` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn report(&self, message: &str) {
        err_msg!("thread_timing: {message}");
    }
}

/// Forwards diagnostics as `tracing` error events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, message: &str) {
        tracing::error!(target: "thread_timing", "{message}");
    }
}

impl<F> Reporter for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn closures_are_reporters() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter: Box<dyn Reporter> =
            Box::new(move |message: &str| sink.lock().unwrap().push(message.to_string()));

        reporter.report("disk full");
        assert_eq!(*seen.lock().unwrap(), vec!["disk full".to_string()]);
    }

    #[test]
    fn tracing_reporter_does_not_panic_without_subscriber() {
        TracingReporter.report("nobody listens");
    }
}
