// Copyright 2024-2025 Irreducible Inc.

//! Process-wide recorder for code that cannot thread a [`Recorder`] through.
//!
//! The recorder is created on first use from [`Config::from_env`].

use std::{
    path::PathBuf,
    sync::{Arc, OnceLock},
};

use crate::recorder::{Config, Recorder};

static RECORDER: OnceLock<Arc<Recorder>> = OnceLock::new();

pub fn recorder() -> &'static Arc<Recorder> {
    RECORDER.get_or_init(|| Arc::new(Recorder::new(Config::from_env())))
}

pub fn set_output_path(path: impl Into<PathBuf>) {
    recorder().set_output_path(path)
}

pub fn set_run_label(label: impl Into<String>) {
    recorder().set_run_label(label)
}

pub fn begin_run(num_threads: usize) -> u64 {
    recorder().begin_run(num_threads)
}

pub fn record_sample(thread_id: usize, start_seconds: f64, end_seconds: f64) {
    recorder().record_sample(thread_id, start_seconds, end_seconds)
}

pub fn end_run() {
    recorder().end_run()
}
