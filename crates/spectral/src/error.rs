//! Error types for spectral estimation.

use thiserror::Error;

/// Errors from spectral estimators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectralError {
    /// The input series has no samples.
    #[error("Cannot estimate the spectrum of an empty series")]
    EmptySeries,

    /// Sample rate must be positive.
    #[error("Sample rate must be positive, got {0}")]
    InvalidSampleRate(f64),

    /// A requested natural-frequency bin lies above the Nyquist bin.
    #[error("Frequency bin {bin} is out of range (highest bin is {max})")]
    BinOutOfRange { bin: usize, max: usize },
}
