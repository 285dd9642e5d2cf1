// Copyright 2024-2025 Irreducible Inc.

use std::path::PathBuf;

use super::Sample;

/// Everything the recorder mutates, kept behind a single mutex.
#[derive(Debug)]
pub struct RunState {
    pub run_id: u64,
    pub num_threads: usize,
    pub label: String,
    pub output_path: PathBuf,
    pub quote_labels: bool,
    pub samples: Vec<Sample>,
}

impl RunState {
    pub fn new(output_path: PathBuf, label: String, quote_labels: bool) -> Self {
        Self {
            run_id: 0,
            num_threads: 0,
            label,
            output_path,
            quote_labels,
            samples: Vec::new(),
        }
    }

    /// Starts a new run and returns its id. Unflushed samples are dropped.
    pub fn begin(&mut self, num_threads: usize) -> u64 {
        self.samples.clear();
        self.num_threads = num_threads;
        self.run_id += 1;
        self.run_id
    }

    /// Copies out what a flush needs. The live buffer is left untouched.
    pub fn snapshot(&self) -> Option<RunSnapshot> {
        if self.samples.is_empty() {
            return None;
        }

        Some(RunSnapshot {
            run_id: self.run_id,
            num_threads: self.num_threads,
            label: self.label.clone(),
            output_path: self.output_path.clone(),
            quote_labels: self.quote_labels,
            samples: self.samples.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RunSnapshot {
    pub run_id: u64,
    pub num_threads: usize,
    pub label: String,
    pub output_path: PathBuf,
    pub quote_labels: bool,
    pub samples: Vec<Sample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> RunState {
        RunState::new("out.csv".into(), String::new(), true)
    }

    #[test]
    fn run_ids_start_at_one_and_increase() {
        let mut state = state();
        assert_eq!(state.run_id, 0);
        assert_eq!(state.begin(4), 1);
        assert_eq!(state.begin(8), 2);
        assert_eq!(state.begin(2), 3);
        assert_eq!(state.num_threads, 2);
    }

    #[test]
    fn begin_discards_buffered_samples() {
        let mut state = state();
        state.begin(1);
        state.samples.push(Sample::from_seconds(0, 0.0, 1.0));
        state.begin(1);
        assert!(state.samples.is_empty());
    }

    #[test]
    fn empty_buffer_has_no_snapshot() {
        let mut state = state();
        state.begin(2);
        assert!(state.snapshot().is_none());
    }

    #[test]
    fn snapshot_leaves_buffer_in_place() {
        let mut state = state();
        state.begin(2);
        state.samples.push(Sample::from_seconds(1, 0.0, 1.0));
        state.label = "view 1".into();

        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.run_id, 1);
        assert_eq!(snapshot.num_threads, 2);
        assert_eq!(snapshot.label, "view 1");
        assert_eq!(snapshot.samples.len(), 1);
        assert_eq!(state.samples.len(), 1);
    }
}
