//! Error types for simulation runs and archives.

use snorp_spectral::SpectralError;
use snorp_types::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or writing archived results.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither the compressed nor the plain signal file exists.
    #[error("Signal file not found: tried {compressed} and {plain}")]
    NotFound { compressed: PathBuf, plain: PathBuf },

    /// A line of a signal file could not be parsed.
    #[error("Malformed value {value:?} at {path}:{line}")]
    Parse {
        path: PathBuf,
        line: usize,
        value: String,
    },
}

impl ArchiveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArchiveError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from a simulation run.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// The configuration cannot be run.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Spectral estimation failed.
    #[error("Spectral estimation failed: {0}")]
    Spectral(#[from] SpectralError),

    /// Writing results failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}
