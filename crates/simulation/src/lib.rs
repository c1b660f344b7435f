//! Stochastic generators for SNORP realizations.
//!
//! Every generator takes an explicit `rand::Rng` handle; nothing here touches
//! global random state, so realizations can be replayed from a seed or run on
//! independent streams in parallel.
//!
//! # Components
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────┐
//! │ PulseTrain           │        │ JumpSimulator            │
//! │ single carrier       │        │ N independent carriers   │
//! │ lazy (gap, pulse)    │        │ switch-time event queue  │
//! └──────────┬───────────┘        └────────────┬─────────────┘
//!            │                                 │
//!            ▼                                 ▼
//!   analytic Fourier PSD              sampled free-carrier counts
//!   (or sample_pulse_train)           → periodogram
//! ```

mod jump;
mod pulse_train;
mod series;

pub use jump::{CarrierSignal, CarrierState, JumpSimulator};
pub use pulse_train::PulseTrain;
pub use series::sample_pulse_train;

use rand::Rng;
use rand_distr::Exp1;

/// Draw an exponential holding time with the given rate.
///
/// A zero rate never fires and yields an infinite holding time.
pub(crate) fn exponential<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> f64 {
    if rate <= 0.0 {
        return f64::INFINITY;
    }
    let unit: f64 = rng.sample(Exp1);
    unit / rate
}
