//! Theoretical PSD of a (multi-carrier) SNORP signal.

use snorp_types::ModelParams;
use std::f64::consts::PI;

/// Asymptotic regime of the theoretical spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsdRegime {
    /// Degenerate detachment range: classic telegraph-noise Lorentzian.
    Fixed,
    /// Capture slower than the fastest detachment: `1/f` spectrum.
    LongPulse,
    /// Capture at least as fast as the fastest detachment: `1/f` with a
    /// Lorentzian-in-log-frequency correction.
    ShortPulse,
}

impl PsdRegime {
    /// Select the regime by comparing `rmin` with `rmax` and `capture_rate` with `rmax`.
    pub fn select(params: &ModelParams) -> Self {
        if params.rates.is_fixed() {
            PsdRegime::Fixed
        } else if params.capture_rate < params.rates.max() {
            PsdRegime::LongPulse
        } else {
            PsdRegime::ShortPulse
        }
    }
}

/// Theoretical PSD for `n_carriers` independent SNORP carriers.
///
/// The detachment floor must already be clamped to `1 / duration` (see
/// [`ModelParams::clamped_to_duration`]); a zero floor makes the mean gap
/// diverge.
#[derive(Debug, Clone, Copy)]
pub struct PsdModel {
    params: ModelParams,
    n_carriers: u32,
}

impl PsdModel {
    pub fn new(params: ModelParams, n_carriers: u32) -> Self {
        Self { params, n_carriers }
    }

    /// Single-carrier model.
    pub fn single(params: ModelParams) -> Self {
        Self::new(params, 1)
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn regime(&self) -> PsdRegime {
        PsdRegime::select(&self.params)
    }

    /// `n · a² · ν̄`, the amplitude shared by all regimes.
    fn base_amplitude(&self) -> f64 {
        let a = self.params.pulse_magnitude;
        self.n_carriers as f64 * a * a * self.params.event_rate()
    }

    /// PSD at frequency `f` in the selected regime.
    pub fn evaluate(&self, frequency: f64) -> f64 {
        self.evaluate_in(self.regime(), frequency)
    }

    /// PSD at frequency `f` using the formula of `regime`, regardless of
    /// which regime the parameters select.
    pub fn evaluate_in(&self, regime: PsdRegime, frequency: f64) -> f64 {
        let capture_rate = self.params.capture_rate;
        let max_rate = self.params.rates.max();
        let amplitude = self.base_amplitude();

        match regime {
            PsdRegime::Fixed => {
                let rate = capture_rate + self.params.rates.min();
                let angular = 2.0 * PI * frequency;
                4.0 * amplitude / (rate * rate + angular * angular)
            }
            PsdRegime::LongPulse => amplitude / max_rate / frequency,
            PsdRegime::ShortPulse => {
                let amplitude = amplitude * max_rate / (capture_rate * capture_rate);
                let log_term = max_rate / capture_rate - (2.0 * PI * frequency / max_rate).ln();
                let log_lorentzian = (PI / 2.0).powi(2) + log_term * log_term;
                amplitude / frequency / log_lorentzian
            }
        }
    }

    /// PSD at every frequency of `frequencies`.
    pub fn curve(&self, frequencies: &[f64]) -> Vec<f64> {
        let regime = self.regime();
        frequencies
            .iter()
            .map(|&f| self.evaluate_in(regime, f))
            .collect()
    }
}
