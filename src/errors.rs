// Copyright 2024-2025 Irreducible Inc.

use std::{io, path::PathBuf};

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

// use this instead of eprintln!
macro_rules! err_msg {
    ($($arg:tt)*) => {{
        eprintln!($($arg)*);
        assert!(cfg!(not(feature = "panic")))
    }};
}

pub(crate) use err_msg;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open timing file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write timing file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read timing file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed timing csv at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("timing log has no rows")]
    EmptyLog,
    #[error("run_id {requested} not present, available: {available:?}")]
    UnknownRun { requested: u64, available: Vec<u64> },
    #[error("failed to initialize tracing: {0}")]
    TryInit(#[from] TryInitError),
}
