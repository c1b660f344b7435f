//! Physical model parameters.

use crate::{ConfigError, RateRange};

/// Parameters of the SNORP model shared by simulation and theory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    /// Signal level of a pulse (a free carrier) above the baseline.
    pub pulse_magnitude: f64,

    /// Rate at which a free carrier is captured; pulses last `Exp(capture_rate)`.
    pub capture_rate: f64,

    /// Range of detachment rates; each gap draws its own rate uniformly.
    pub rates: RateRange,
}

impl ModelParams {
    /// Create model parameters.
    pub fn new(pulse_magnitude: f64, capture_rate: f64, rates: RateRange) -> Self {
        Self {
            pulse_magnitude,
            capture_rate,
            rates,
        }
    }

    /// Mean pulse (free) duration, `1 / capture_rate`.
    pub fn mean_pulse(&self) -> f64 {
        1.0 / self.capture_rate
    }

    /// Mean gap (captured) duration over the detachment-rate mixture.
    pub fn mean_gap(&self) -> f64 {
        self.rates.mean_inverse()
    }

    /// Mean number of pulse/gap cycles per unit time, `1 / (mean_pulse + mean_gap)`.
    pub fn event_rate(&self) -> f64 {
        1.0 / (self.mean_pulse() + self.mean_gap())
    }

    /// Copy of these parameters with the detachment floor raised to `1 / duration`.
    pub fn clamped_to_duration(&self, duration: f64) -> Self {
        Self {
            rates: self.rates.clamp_min(1.0 / duration),
            ..*self
        }
    }

    /// Check parameter sanity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.pulse_magnitude.is_finite() {
            return Err(ConfigError::NotFinite {
                name: "pulse_magnitude",
                value: self.pulse_magnitude,
            });
        }
        if !self.capture_rate.is_finite() || self.capture_rate <= 0.0 {
            return Err(ConfigError::NonPositiveRate {
                name: "capture_rate",
                value: self.capture_rate,
            });
        }
        self.rates.validate()
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            pulse_magnitude: 1.0,
            capture_rate: 1.0,
            rates: RateRange::new(0.0, 1e3),
        }
    }
}
