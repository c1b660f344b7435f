//! Detachment-rate range.

use crate::ConfigError;

/// Range `[min, max]` from which per-event detachment rates are drawn uniformly.
///
/// The range is always ordered: [`RateRange::new`] corrects an inverted range
/// by setting `max = min` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateRange {
    min: f64,
    max: f64,
}

impl RateRange {
    /// Create a rate range, setting `max = min` if `min > max`.
    pub fn new(min: f64, max: f64) -> Self {
        if min > max {
            Self { min, max: min }
        } else {
            Self { min, max }
        }
    }

    /// A degenerate range with a single fixed rate.
    pub fn fixed(rate: f64) -> Self {
        Self {
            min: rate,
            max: rate,
        }
    }

    /// Whether `new(min, max)` would have to correct the given bounds.
    pub fn is_inverted(min: f64, max: f64) -> bool {
        min > max
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// True when the range has collapsed to a single rate.
    pub fn is_fixed(&self) -> bool {
        self.max <= self.min
    }

    /// Raise the lower bound to at least `floor`.
    ///
    /// Rates below `1 / duration` are unobservable in a finite simulation, so
    /// callers clamp with `floor = 1 / duration` before computing
    /// [`RateRange::mean_inverse`].
    pub fn clamp_min(self, floor: f64) -> Self {
        Self::new(self.min.max(floor), self.max)
    }

    /// Expectation of `1 / R` for `R` uniform on the range.
    ///
    /// This is the mean captured (gap) duration: `ln(max/min) / (max - min)`,
    /// or `1 / min` when the range is degenerate.
    pub fn mean_inverse(&self) -> f64 {
        if self.is_fixed() {
            return 1.0 / self.min;
        }
        (self.max / self.min).ln() / (self.max - self.min)
    }

    /// Inverse CDF of the size-biased rate distribution.
    ///
    /// A carrier observed while captured is more likely to belong to a slow
    /// rate class: the rate density is proportional to `1 / r` on the range,
    /// whose inverse CDF is `min * (max / min)^u`.
    pub fn size_biased_quantile(&self, u: f64) -> f64 {
        if self.is_fixed() {
            return self.min;
        }
        self.min * (self.max / self.min).powf(u)
    }

    /// Check that both bounds are usable rates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min.is_finite() || self.min < 0.0 {
            return Err(ConfigError::NegativeRate {
                name: "min_detachment_rate",
                value: self.min,
            });
        }
        if !self.max.is_finite() || self.max <= 0.0 {
            return Err(ConfigError::NonPositiveRate {
                name: "max_detachment_rate",
                value: self.max,
            });
        }
        Ok(())
    }
}
