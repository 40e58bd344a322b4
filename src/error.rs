use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    #[error("Error opening file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error reading {stage}: {message}")]
    Parse { stage: &'static str, message: String },

    #[error("Unexpected CSV header: {0}")]
    Header(String),

    #[error("Invalid {column} value {value:?} on line {line}: {reason}")]
    Coercion {
        column: &'static str,
        value: String,
        line: u64,
        reason: String,
    },

    #[error("Row on line {line} has {found} columns, expected {expected}")]
    ShortRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("ItemWriter from: {0}")]
    ItemWriter(String),
}

impl BatchError {
    /// Process exit status reported by the binary for this error.
    ///
    /// `0` is reserved for success, every variant gets its own code.
    pub fn exit_code(&self) -> u8 {
        match self {
            BatchError::Io { .. } => 2,
            BatchError::Parse { .. } => 3,
            BatchError::Header(_) => 4,
            BatchError::Coercion { .. } => 5,
            BatchError::ShortRow { .. } => 6,
            BatchError::ItemWriter(_) => 7,
        }
    }

    pub(crate) fn parse(stage: &'static str, error: csv::Error) -> Self {
        BatchError::Parse {
            stage,
            message: error.to_string(),
        }
    }
}
