//! A per-thread timing recorder for parallel computations.
//!
//! # Overview
//! A [`Recorder`] collects one sample per unit of work a worker thread
//! performs: the worker id, when the work started and when it ended. Samples
//! are buffered in memory during a run and appended as CSV rows to a file when
//! the run ends, so that load imbalance between threads can be analyzed later.
//!
//! A run has a simple lifecycle:
//!     `begin_run`: declares the thread count and starts a new run id.
//!     `record_sample`: called concurrently by the workers.
//!     `end_run`: appends the buffered samples to the output file.
//!
//! The file gets a header when it is empty or missing and one row per sample:
//! ```text
//! run_id,label,num_threads,thread_id,start_ms,end_ms,duration_ms
//! 1,view 1,2,0,0.000000,41.250000,41.250000
//! 1,view 1,2,1,0.000000,12.500000,12.500000
//! ```
//!
//! Flushing never fails the instrumented program. Errors go to a [`Reporter`],
//! stderr by default.
//!
//! ```
//! use thread_timing::{Config, Recorder};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let recorder = Recorder::new(Config::default().with_output_path(dir.path().join("t.csv")));
//!
//! recorder.set_run_label("view 1");
//! recorder.begin_run(2);
//! std::thread::scope(|s| {
//!     for thread_id in 0..2 {
//!         let recorder = &recorder;
//!         s.spawn(move || recorder.time(thread_id, || (0..1000).sum::<u64>()));
//!     }
//! });
//! recorder.end_run();
//! ```
//!
//! The [`global`] module keeps a process-wide recorder for code that cannot pass
//! one around, and [`TimingLayer`] records spans with a `thread_id` field.
//! [`TimingLog`] reads the resulting file back.
//!
//! # Features
//! The `enabled` feature (on by default) turns recording on. Without it every
//! recording operation is a no-op and no file is ever written.
//! The `panic` feature will turn eprintln! into panic!, causing the program to halt on errors.

mod clock;
mod data;
mod env_utils;
mod errors;
pub mod global;
mod layers;
mod reader;
mod recorder;
mod report;

pub use clock::now_seconds;
pub use data::{Sample, TimingRow};
pub use errors::Error;
pub use layers::{
    init_tracing::{init_tracing, init_tracing_with},
    timing::Layer as TimingLayer,
};
pub use reader::{RunView, ThreadOrder, TimingLog};
pub use recorder::{Config, Recorder, RunGuard, DEFAULT_OUTPUT_PATH};
pub use report::{Reporter, StderrReporter, TracingReporter};

#[cfg(all(test, feature = "enabled"))]
mod tests {
    use rusty_fork::rusty_fork_test;

    use super::*;

    // Since the global recorder is created once per process, we need to run the tests in separate processes.
    rusty_fork_test! {
        #[test]
        fn global_recorder_round_trip() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("global.csv");

            global::set_output_path(&path);
            global::set_run_label("global");
            assert_eq!(global::begin_run(3), 1);
            std::thread::scope(|s| {
                for thread_id in 0..3 {
                    s.spawn(move || global::record_sample(thread_id, 1.0, 1.5));
                }
            });
            global::end_run();

            let log = TimingLog::load(&path).unwrap();
            let run = log.run(None).unwrap();
            assert_eq!(run.run_id(), 1);
            assert_eq!(run.label(), "global");
            assert_eq!(run.num_threads(), 3);
            assert!(run.rows().iter().all(|row| row.duration_ms == 500.0));
        }

        #[test]
        fn global_recorder_reads_env() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("env.csv");
            std::env::set_var("THREAD_TIMING_OUTPUT_PATH", &path);
            std::env::set_var("THREAD_TIMING_LABEL", "from env");

            assert_eq!(global::recorder().output_path(), path);
            global::begin_run(1);
            global::record_sample(0, 0.0, 1.0);
            global::end_run();

            let log = TimingLog::load(&path).unwrap();
            assert_eq!(log.run(None).unwrap().label(), "from env");
        }
    }
}
