//! PSD estimators for SNORP realizations.
//!
//! Two estimators match the two simulation paths:
//!
//! - [`AnalyticEstimator`]: exact Fourier transform of a rectangular-pulse
//!   waveform given as a gap/pulse train. No sampling, no aliasing.
//! - [`Periodogram`]: one-sided density periodogram of a uniformly sampled
//!   series, reported at selected natural-frequency bins.
//!
//! Both report one-sided PSDs normalised so that they are directly comparable
//! with the closed-form spectra in `snorp-theory`.

mod analytic;
mod error;
mod periodogram;

pub use analytic::{AnalyticEstimate, AnalyticEstimator};
pub use error::SpectralError;
pub use periodogram::{Detrend, Periodogram};
