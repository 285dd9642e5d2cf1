// Copyright 2024-2025 Irreducible Inc.

use csv::{QuoteStyle, StringRecord};

use super::Sample;
use crate::errors::Error;

/// A buffered sample with the run-level columns of its flush.
///
/// example output
/// ```bash
/// cat thread_timings.csv
///
/// run_id,label,num_threads,thread_id,start_ms,end_ms,duration_ms
/// 1,view 1,2,0,1000.000000,1002.500000,2.500000
/// 1,view 1,2,1,1000.000000,1004.000000,4.000000
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    pub run_id: u64,
    pub label: &'a str,
    pub num_threads: usize,
    pub sample: &'a Sample,
}

impl RowRef<'_> {
    /// Fields in column order, millisecond values with 6 decimal digits.
    pub fn record(&self) -> [String; 7] {
        [
            self.run_id.to_string(),
            self.label.to_string(),
            self.num_threads.to_string(),
            self.sample.thread_id.to_string(),
            format!("{:.6}", self.sample.start_ms),
            format!("{:.6}", self.sample.end_ms),
            format!("{:.6}", self.sample.duration_ms),
        ]
    }
}

/// Quoting used when writing rows.
///
/// Only the label can contain a delimiter. Without quoting it is written raw,
/// so a comma or a newline in it corrupts the file.
pub fn quote_style(quote_labels: bool) -> QuoteStyle {
    if quote_labels {
        QuoteStyle::Necessary
    } else {
        QuoteStyle::Never
    }
}

/// One data row read back from a timing file.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRow {
    pub run_id: u64,
    pub label: String,
    pub num_threads: usize,
    pub thread_id: usize,
    pub start_ms: f64,
    pub end_ms: f64,
    pub duration_ms: f64,
}

impl TimingRow {
    pub const COLUMNS: [&'static str; 7] = [
        "run_id",
        "label",
        "num_threads",
        "thread_id",
        "start_ms",
        "end_ms",
        "duration_ms",
    ];

    pub fn header<'a>() -> &'a str {
        "run_id,label,num_threads,thread_id,start_ms,end_ms,duration_ms\n"
    }

    /// Builds a row from a parsed record. `line` is only used for errors.
    pub fn from_record(record: &StringRecord, line: usize) -> Result<Self, Error> {
        let fields: Vec<&str> = record.iter().collect();
        let [run_id, label, num_threads, thread_id, start_ms, end_ms, duration_ms] =
            fields.as_slice()
        else {
            return Err(Error::Parse {
                line,
                message: format!(
                    "expected {} fields, found {}",
                    Self::COLUMNS.len(),
                    fields.len()
                ),
            });
        };

        Ok(Self {
            run_id: parse_field(run_id, "run_id", line)?,
            label: label.to_string(),
            num_threads: parse_field(num_threads, "num_threads", line)?,
            thread_id: parse_field(thread_id, "thread_id", line)?,
            start_ms: parse_field(start_ms, "start_ms", line)?,
            end_ms: parse_field(end_ms, "end_ms", line)?,
            duration_ms: parse_field(duration_ms, "duration_ms", line)?,
        })
    }
}

fn parse_field<T: std::str::FromStr>(value: &str, column: &str, line: usize) -> Result<T, Error> {
    value.trim().parse().map_err(|_| Error::Parse {
        line,
        message: format!("invalid {column} value '{value}'"),
    })
}
