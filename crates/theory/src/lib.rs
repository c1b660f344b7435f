//! Closed-form statistics of the SNORP model.
//!
//! - [`PsdModel`]: theoretical power spectral density in three asymptotic regimes
//! - [`free_probability`]: steady-state probability that a carrier is free
//! - [`free_count_pmf`]: distribution of the number of free carriers
//! - [`captured_time_pdf`]: distribution of captured (gap) durations

mod occupancy;
mod psd;

pub use occupancy::{captured_time_pdf, free_count_pmf, free_probability};
pub use psd::{PsdModel, PsdRegime};
