//! Error types for the Parquet to JSON converter.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause attached to read failures (I/O, Parquet or Arrow errors).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while converting a file.
///
/// Every variant names the file it concerns so a batch run can report which
/// input (or output) was at fault.
#[derive(Debug, Error)]
pub enum Error {
    /// The input is missing, unreadable, not Parquet, or holds data that
    /// cannot be loaded into a table.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// The output (or its directory) could not be created or written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value in the input has no JSON representation under the active options.
    #[error("failed to encode {}: {source}", .path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
}

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Error::Read {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    /// Path of the file the error concerns.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::Read { path, .. } | Error::Write { path, .. } | Error::Encoding { path, .. } => {
                path
            }
        }
    }
}

/// A single value that could not be turned into JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column '{column}', row {row}: {reason}")]
pub struct EncodeError {
    /// Top-level column holding the value.
    pub column: String,
    /// Zero-based row index within the whole table.
    pub row: usize,
    pub reason: String,
}
