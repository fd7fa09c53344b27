//! Errors raised while indexing, matching and writing overlap results
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlapError {
    /// Opening, reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A start/stop column could not be read as an integer.
    #[error("{path}:{line}: column {column} is not an integer ({value:?})")]
    MalformedInteger {
        path: PathBuf,
        line: usize,
        column: usize,
        value: String,
    },

    /// A row had fewer columns than the layout asks for.
    #[error("{path}:{line}: expected at least {needed} columns, found {found}")]
    MissingColumn {
        path: PathBuf,
        line: usize,
        needed: usize,
        found: usize,
    },

    #[error("{path}:{line}: unknown strand {value:?} (expected '+' or '-')")]
    UnknownStrand {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("{path}:{line}: stop {stop} is before start {start}")]
    InvertedInterval {
        path: PathBuf,
        line: usize,
        start: u64,
        stop: u64,
    },

    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(usize),

    #[error("malformed overlap file {path}: {message}")]
    MalformedOverlapFile { path: PathBuf, message: String },

    #[error("could not find executable '{executable}'")]
    ToolNotFound { executable: String },

    #[error("'{executable} {args}' failed ({status}): {stderr}")]
    ToolFailed {
        executable: String,
        args: String,
        status: String,
        stderr: String,
    },
}

impl OverlapError {
    /// Attach the offending path to an io error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OverlapError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, OverlapError>;
