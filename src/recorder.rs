// Copyright 2024-2025 Irreducible Inc.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use csv::Terminator;

use crate::{
    clock::now_seconds,
    data::{quote_style, RowRef, RunSnapshot, RunState, Sample, TimingRow},
    env_utils::{get_bool_env_var, get_env_var},
    errors::Error,
    report::{Reporter, StderrReporter},
};

/// Without the `enabled` feature every recording operation compiles to a no-op.
const ENABLED: bool = cfg!(feature = "enabled");

pub const DEFAULT_OUTPUT_PATH: &str = "thread_timings.csv";

/// Recorder config.
#[derive(Debug, Clone)]
pub struct Config {
    /// File the runs are appended to.
    /// Corresponds to the `THREAD_TIMING_OUTPUT_PATH` environment variable.
    pub output_path: PathBuf,

    /// Initial run label.
    /// Corresponds to the `THREAD_TIMING_LABEL` environment variable.
    pub label: String,

    /// Whether labels containing a comma, a quote or a line break are written
    /// as quoted CSV fields. When disabled they are written raw.
    /// Corresponds to the `THREAD_TIMING_QUOTE_LABELS` environment variable.
    pub quote_labels: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            output_path: get_env_var("THREAD_TIMING_OUTPUT_PATH", DEFAULT_OUTPUT_PATH.to_string())
                .into(),
            label: get_env_var("THREAD_TIMING_LABEL", String::new()),
            quote_labels: get_bool_env_var("THREAD_TIMING_QUOTE_LABELS", true),
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_quote_labels(mut self, quote_labels: bool) -> Self {
        self.quote_labels = quote_labels;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Buffers per-thread timing samples and appends them to a CSV file when a run ends.
///
/// The recorder is shared by reference between the coordinating thread and the
/// workers. One mutex guards all of its state; it is held for in-memory updates
/// only, never while the file is written.
///
/// ```rust,no_run
/// use thread_timing::{Config, Recorder};
///
/// let recorder = Recorder::new(Config::default().with_output_path("/tmp/timings.csv"));
/// recorder.set_run_label("view 1");
/// recorder.begin_run(4);
/// std::thread::scope(|s| {
///     for thread_id in 0..4 {
///         let recorder = &recorder;
///         s.spawn(move || recorder.time(thread_id, || { /* work */ }));
///     }
/// });
/// recorder.end_run();
/// ```
pub struct Recorder {
    state: Mutex<RunState>,
    reporter: Box<dyn Reporter>,
}

impl Recorder {
    pub fn new(config: Config) -> Self {
        Self::with_reporter(config, StderrReporter)
    }

    pub fn with_reporter(config: Config, reporter: impl Reporter + 'static) -> Self {
        Self {
            state: Mutex::new(RunState::new(
                config.output_path,
                config.label,
                config.quote_labels,
            )),
            reporter: Box::new(reporter),
        }
    }

    // a worker that panicked mid-push leaves nothing half-written behind, so
    // a poisoned lock is still usable
    fn state(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes effect at the next `end_run`, including for samples already buffered.
    pub fn set_output_path(&self, path: impl Into<PathBuf>) {
        if !ENABLED {
            return;
        }
        self.state().output_path = path.into();
    }

    pub fn output_path(&self) -> PathBuf {
        self.state().output_path.clone()
    }

    /// The label is read when the run is flushed, not when samples are recorded.
    pub fn set_run_label(&self, label: impl Into<String>) {
        if !ENABLED {
            return;
        }
        self.state().label = label.into();
    }

    /// Id of the current run, 0 before the first `begin_run`.
    pub fn run_id(&self) -> u64 {
        self.state().run_id
    }

    /// Starts a new run and returns its id.
    ///
    /// Samples buffered since the previous `begin_run` are discarded whether or
    /// not they were flushed.
    pub fn begin_run(&self, num_threads: usize) -> u64 {
        if !ENABLED {
            return 0;
        }
        let run_id = self.state().begin(num_threads);
        tracing::debug!(target: "thread_timing", run_id, num_threads, "timing run started");
        run_id
    }

    /// Starts a run that is flushed when the returned guard is dropped.
    pub fn run(&self, num_threads: usize) -> RunGuard<'_> {
        let run_id = self.begin_run(num_threads);
        RunGuard {
            recorder: self,
            run_id,
        }
    }

    /// Buffers one sample.
    ///
    /// Timestamps are seconds on any clock that is consistent within a run.
    /// [`Recorder::time`] and the tracing layer use [`now_seconds`], so callers
    /// mixing their own samples with those should read the same clock.
    pub fn record_sample(&self, thread_id: usize, start_seconds: f64, end_seconds: f64) {
        if !ENABLED {
            return;
        }
        let sample = Sample::from_seconds(thread_id, start_seconds, end_seconds);
        self.state().samples.push(sample);
    }

    /// Runs `f` and records how long it took as one sample of `thread_id`.
    pub fn time<R>(&self, thread_id: usize, f: impl FnOnce() -> R) -> R {
        if !ENABLED {
            return f();
        }
        let start = now_seconds();
        let result = f();
        self.record_sample(thread_id, start, now_seconds());
        result
    }

    /// Appends the buffered samples to the output file.
    ///
    /// Failures go to the reporter and the samples of this flush are lost. The
    /// buffer itself is kept until the next `begin_run`, so calling this twice
    /// writes the same rows twice.
    pub fn end_run(&self) {
        if let Err(err) = self.try_end_run() {
            self.reporter.report(&err.to_string());
        }
    }

    /// Same flush as [`Recorder::end_run`], returning the number of rows written.
    pub fn try_end_run(&self) -> Result<usize, Error> {
        if !ENABLED {
            return Ok(0);
        }
        let Some(snapshot) = self.state().snapshot() else {
            return Ok(0);
        };

        let rows = write_snapshot(&snapshot)?;
        tracing::debug!(
            target: "thread_timing",
            run_id = snapshot.run_id,
            rows,
            path = %snapshot.output_path.display(),
            "timing run flushed"
        );
        Ok(rows)
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Ends the run it was created for when dropped.
#[must_use = "dropping the guard ends the run immediately"]
pub struct RunGuard<'a> {
    recorder: &'a Recorder,
    run_id: u64,
}

impl RunGuard<'_> {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.recorder.end_run();
    }
}

// a missing file and an unreadable one both get a header
fn has_content(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|metadata| metadata.len() > 0)
}

fn write_snapshot(snapshot: &RunSnapshot) -> Result<usize, Error> {
    let path = &snapshot.output_path;
    let need_header = !has_content(path);

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|source| Error::Open {
            path: path.clone(),
            source,
        })?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(quote_style(snapshot.quote_labels))
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);
    write_rows(&mut writer, snapshot, need_header).map_err(|err| Error::Write {
        path: path.clone(),
        source: err.into(),
    })?;

    Ok(snapshot.samples.len())
}

fn write_rows<W: Write>(
    writer: &mut csv::Writer<W>,
    snapshot: &RunSnapshot,
    need_header: bool,
) -> csv::Result<()> {
    if need_header {
        writer.write_record(TimingRow::COLUMNS)?;
    }

    for sample in &snapshot.samples {
        let row = RowRef {
            run_id: snapshot.run_id,
            label: &snapshot.label,
            num_threads: snapshot.num_threads,
            sample,
        };
        writer.write_record(row.record())?;
    }

    writer.flush()?;
    Ok(())
}
