// Copyright 2024-2025 Irreducible Inc.

//! Reads timing files back for analysis.
//!
//! A file accumulates many runs, possibly from several processes. [`TimingLog`]
//! groups its rows by `run_id` and [`RunView`] presents one run, by default the
//! latest one, with its rows ordered for a per-thread load chart.

use std::{fs, path::Path};

use linear_map::LinearMap;

use crate::{data::TimingRow, errors::Error};

/// How [`RunView::ordered`] arranges the threads of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadOrder {
    /// Longest first, which puts the load imbalance at the top.
    #[default]
    Duration,
    Thread,
}

#[derive(Debug, Clone)]
pub struct TimingLog {
    runs: LinearMap<u64, Vec<TimingRow>>,
}

impl TimingLog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_csv(&text)
    }

    /// Parses the content of a timing file. The header line is required.
    pub fn from_csv(text: &str) -> Result<Self, Error> {
        if text.trim().is_empty() {
            return Err(Error::EmptyLog);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let header = reader.headers().map_err(parse_error)?;
        if header.iter().ne(TimingRow::COLUMNS) {
            let found: Vec<&str> = header.iter().collect();
            return Err(Error::Parse {
                line: 1,
                message: format!("unexpected header '{}'", found.join(",")),
            });
        }

        let mut runs: LinearMap<u64, Vec<TimingRow>> = LinearMap::new();
        for record in reader.records() {
            let record = record.map_err(parse_error)?;
            let line = record.position().map_or(0, |pos| pos.line() as usize);
            let row = TimingRow::from_record(&record, line)?;
            runs.entry(row.run_id).or_insert(Vec::new()).push(row);
        }

        if runs.is_empty() {
            return Err(Error::EmptyLog);
        }

        Ok(Self { runs })
    }

    /// Number of data rows across all runs.
    pub fn len(&self) -> usize {
        self.runs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows in file order within each run; runs in order of first appearance.
    pub fn rows(&self) -> impl Iterator<Item = &TimingRow> {
        self.runs.values().flatten()
    }

    pub fn run_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.runs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn latest_run_id(&self) -> u64 {
        self.runs.keys().copied().max().unwrap_or_default()
    }

    /// The requested run, or the latest one when `requested` is `None`.
    ///
    /// Run ids restart at 1 in every process, so a file appended to by several
    /// processes merges their runs under the same id.
    pub fn run(&self, requested: Option<u64>) -> Result<RunView, Error> {
        let run_id = requested.unwrap_or_else(|| self.latest_run_id());
        let Some(rows) = self.runs.get(&run_id) else {
            return Err(Error::UnknownRun {
                requested: run_id,
                available: self.run_ids(),
            });
        };

        let mut rows = rows.clone();
        rows.sort_by_key(|row| row.thread_id);
        Ok(RunView { run_id, rows })
    }
}

/// The rows of a single run, sorted by thread id.
#[derive(Debug, Clone)]
pub struct RunView {
    run_id: u64,
    rows: Vec<TimingRow>,
}

impl RunView {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn label(&self) -> &str {
        self.rows.first().map_or("", |row| row.label.as_str())
    }

    pub fn num_threads(&self) -> usize {
        self.rows.first().map_or(0, |row| row.num_threads)
    }

    pub fn rows(&self) -> &[TimingRow] {
        &self.rows
    }

    pub fn ordered(&self, order: ThreadOrder) -> Vec<&TimingRow> {
        let mut rows: Vec<&TimingRow> = self.rows.iter().collect();
        match order {
            ThreadOrder::Duration => {
                rows.sort_by(|a, b| b.duration_ms.total_cmp(&a.duration_ms))
            }
            ThreadOrder::Thread => rows.sort_by_key(|row| row.thread_id),
        }
        rows
    }
}

fn parse_error(err: csv::Error) -> Error {
    Error::Parse {
        line: err.position().map_or(0, |pos| pos.line() as usize),
        message: err.to_string(),
    }
}
