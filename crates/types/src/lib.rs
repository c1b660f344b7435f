//! Core types for SNORP simulation.
//!
//! SNORP is a two-state signal that randomly toggles between a baseline (a
//! "gap", carrier captured) and an elevated level (a "pulse", carrier free).
//! This crate holds the data model shared by the simulation, spectral and
//! theory crates:
//!
//! - [`RateRange`]: the uniform detachment-rate range `[min, max]`
//! - [`ModelParams`]: pulse magnitude, capture rate and detachment range
//! - [`PulseGapEvent`]: one (gap, pulse) pair of a single-carrier train
//! - [`FrequencyGrid`]: natural frequencies `k / T` at which PSDs are evaluated
//! - [`PsdCurve`]: (frequency, empirical, theoretical) rows of a finished run

mod curve;
mod error;
mod event;
mod frequency;
mod params;
mod rates;

pub use curve::{PsdCurve, PsdRow};
pub use error::ConfigError;
pub use event::PulseGapEvent;
pub use frequency::{logspace, FrequencyGrid};
pub use params::ModelParams;
pub use rates::RateRange;

/// Number of carriers in a multi-carrier simulation.
pub type CarrierCount = u32;
