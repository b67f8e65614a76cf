use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors surfaced by the observation pipeline.
///
/// Empty plans are not errors: the driver reports them as skipped files.
#[derive(Debug, Error)]
pub enum ObservationError {
    /// The solutions directory does not exist.
    #[error("solutions directory not found: {}", .0.display())]
    SourceMissing(PathBuf),
    /// The solutions directory holds no plan files.
    #[error("no solution files (*.{extension}) found in {}", dir.display())]
    NoPlanFiles {
        /// Directory that was scanned.
        dir: PathBuf,
        /// Extension that was matched.
        extension: String,
    },
    /// Removal rate outside `[0, 1)`.
    #[error("removal rate {0} is outside [0, 1)")]
    InvalidRate(f64),
    /// Plan file extension is empty.
    #[error("invalid plan file extension {0:?}")]
    InvalidExtension(String),
    /// Configuration file could not be parsed.
    #[error("invalid configuration {}: {message}", path.display())]
    Config {
        /// Configuration file path.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// Filesystem failure on a specific path.
    #[error("I/O failure on {}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Progress report could not be written to the console.
    #[error("writing progress report")]
    Console(#[source] io::Error),
    /// Run log or report serialization failed.
    #[error(transparent)]
    Telemetry(#[from] anyhow::Error),
}

impl ObservationError {
    /// Wraps an I/O error with the path it occurred on.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
