//! Configuration errors.

use thiserror::Error;

/// Errors raised for malformed simulation parameters.
///
/// Numeric edge cases of correctly-parameterized runs are clamped rather than
/// reported; these variants cover values no clamp can repair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A rate that must be strictly positive was not.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositiveRate { name: &'static str, value: f64 },

    /// A rate that must be non-negative was not.
    #[error("{name} must be non-negative and finite, got {value}")]
    NegativeRate { name: &'static str, value: f64 },

    /// A duration or period was not strictly positive.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositiveDuration { name: &'static str, value: f64 },

    /// A parameter was NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    /// A count parameter was below its minimum.
    #[error("{name} must be at least {min}, got {value}")]
    CountTooSmall {
        name: &'static str,
        min: usize,
        value: usize,
    },

    /// The frequency selection produced no usable frequency.
    #[error("frequency selection [{min_freq}, {max_freq}] yields no positive natural frequency")]
    EmptyFrequencyGrid { min_freq: f64, max_freq: f64 },
}
