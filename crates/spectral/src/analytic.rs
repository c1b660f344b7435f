//! Exact Fourier PSD of a rectangular-pulse waveform.

use num_complex::Complex64;
use snorp_types::PulseGapEvent;
use std::f64::consts::PI;

/// Result of one analytic PSD evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticEstimate {
    /// One-sided PSD at each frequency of the estimator.
    pub psd: Vec<f64>,
    /// Total time spent in gaps.
    pub total_gap: f64,
    /// Total time spent in pulses.
    pub total_pulse: f64,
    /// Level of pulses after subtracting the waveform mean.
    pub adjusted_pulse_magnitude: f64,
    /// Level of gaps after subtracting the waveform mean.
    pub adjusted_gap_magnitude: f64,
    /// Number of pulses with non-zero duration.
    pub n_pulses: u64,
}

impl AnalyticEstimate {
    /// Time integral of the mean-adjusted waveform; zero up to rounding.
    pub fn mean_residual(&self) -> f64 {
        self.adjusted_pulse_magnitude * self.total_pulse
            + self.adjusted_gap_magnitude * self.total_gap
    }
}

/// Evaluates the Fourier transform of a gap/pulse train in closed form.
///
/// A rectangle of length `d` starting at `s` transforms to
/// `(1/iω)·exp(iω·s)·(exp(iω·d) − 1)` with `iω = −2πi·f`. Gap and pulse
/// rectangles are accumulated separately, scaled by their mean-adjusted
/// levels (`−a·Tp/T` and `a − a·Tp/T`), summed, and turned into the one-sided
/// PSD `(2/T)·|F|²`.
#[derive(Debug, Clone)]
pub struct AnalyticEstimator {
    imag_angular: Vec<Complex64>,
}

impl AnalyticEstimator {
    /// Prepare the estimator for the given frequencies (Hz).
    pub fn new(frequencies: &[f64]) -> Self {
        let imag_angular = frequencies
            .iter()
            .map(|&f| Complex64::new(0.0, -2.0 * PI * f))
            .collect();
        Self { imag_angular }
    }

    pub fn len(&self) -> usize {
        self.imag_angular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imag_angular.is_empty()
    }

    /// Consume `events` in a single forward pass and return the PSD of the
    /// resulting waveform of pulse height `magnitude` over `duration`.
    pub fn estimate(
        &self,
        events: impl IntoIterator<Item = PulseGapEvent>,
        duration: f64,
        magnitude: f64,
    ) -> AnalyticEstimate {
        let n_freq = self.imag_angular.len();
        let mut gap_fourier = vec![Complex64::new(0.0, 0.0); n_freq];
        let mut pulse_fourier = vec![Complex64::new(0.0, 0.0); n_freq];
        // exp(iω·t) at the current segment boundary
        let mut boundary_phase = vec![Complex64::new(1.0, 0.0); n_freq];

        let mut total_gap = 0.0;
        let mut total_pulse = 0.0;
        let mut n_pulses = 0u64;

        for event in events {
            let clock = total_gap + total_pulse;
            if event.gap > 0.0 {
                accumulate_rect(
                    &self.imag_angular,
                    &mut boundary_phase,
                    &mut gap_fourier,
                    clock + event.gap,
                );
            }
            total_gap += event.gap;

            if event.has_pulse() {
                accumulate_rect(
                    &self.imag_angular,
                    &mut boundary_phase,
                    &mut pulse_fourier,
                    clock + event.gap + event.pulse,
                );
                n_pulses += 1;
            }
            total_pulse += event.pulse;
        }

        let mean_magnitude = magnitude * total_pulse / duration;
        let adjusted_pulse_magnitude = magnitude - mean_magnitude;
        let adjusted_gap_magnitude = -mean_magnitude;

        let normalization = 2.0 / duration;
        let psd = self
            .imag_angular
            .iter()
            .zip(gap_fourier.iter().zip(&pulse_fourier))
            .map(|(iw, (gap, pulse))| {
                let fourier =
                    (*gap * adjusted_gap_magnitude + *pulse * adjusted_pulse_magnitude) / *iw;
                normalization * fourier.norm_sqr()
            })
            .collect();

        AnalyticEstimate {
            psd,
            total_gap,
            total_pulse,
            adjusted_pulse_magnitude,
            adjusted_gap_magnitude,
            n_pulses,
        }
    }
}

/// Add the rectangle ending at `end` (and starting at the current boundary)
/// to `sums`, omitting the shared `1/iω` factor.
///
/// `exp(iω·s)·(exp(iω·d) − 1) = exp(iω·(s + d)) − exp(iω·s)`, and `exp(iω·s)`
/// is the phase left behind by the previous segment.
fn accumulate_rect(
    imag_angular: &[Complex64],
    boundary_phase: &mut [Complex64],
    sums: &mut [Complex64],
    end: f64,
) {
    for ((iw, phase), sum) in imag_angular
        .iter()
        .zip(boundary_phase.iter_mut())
        .zip(sums.iter_mut())
    {
        let end_phase = Complex64::cis(iw.im * end);
        *sum += end_phase - *phase;
        *phase = end_phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sketch_train() -> Vec<PulseGapEvent> {
        // pulses on (1, 2), (3.5, 4) and (5, 6)
        vec![
            PulseGapEvent::new(1.0, 1.0),
            PulseGapEvent::new(1.5, 0.5),
            PulseGapEvent::new(1.0, 1.0),
        ]
    }

    fn waveform(t: f64) -> f64 {
        if (1.0..2.0).contains(&t) || (3.5..4.0).contains(&t) || (5.0..6.0).contains(&t) {
            1.0
        } else {
            0.0
        }
    }

    #[test]
    fn test_matches_numerical_fourier_integral() {
        let duration = 6.0;
        let frequencies: Vec<f64> = (1..=5).map(|k| k as f64 / duration).collect();
        let estimate = AnalyticEstimator::new(&frequencies).estimate(sketch_train(), duration, 1.0);

        let mean = 2.5 / duration;
        let steps = 60_000;
        let dt = duration / steps as f64;
        for (f, psd) in frequencies.iter().zip(&estimate.psd) {
            let fourier: Complex64 = (0..steps)
                .map(|i| {
                    let t = (i as f64 + 0.5) * dt;
                    Complex64::cis(-2.0 * PI * f * t) * (waveform(t) - mean) * dt
                })
                .sum();
            let numerical = 2.0 / duration * fourier.norm_sqr();
            assert!(
                (psd - numerical).abs() < 1e-6 * (1.0 + numerical),
                "f = {f}: analytic {psd} vs numerical {numerical}"
            );
        }
    }

    #[test]
    fn test_waveform_is_mean_centered() {
        let estimate = AnalyticEstimator::new(&[0.5]).estimate(sketch_train(), 6.0, 3.0);
        assert_eq!(estimate.total_gap, 3.5);
        assert_eq!(estimate.total_pulse, 2.5);
        assert!((estimate.adjusted_pulse_magnitude - 3.0 * 3.5 / 6.0).abs() < 1e-12);
        assert!((estimate.adjusted_gap_magnitude + 3.0 * 2.5 / 6.0).abs() < 1e-12);
        assert!(estimate.mean_residual().abs() < 1e-12);
    }

    #[test]
    fn test_counts_non_degenerate_pulses() {
        let mut events = sketch_train();
        events.push(PulseGapEvent::new(0.5, 0.0));
        let estimate = AnalyticEstimator::new(&[1.0]).estimate(events, 6.5, 1.0);
        assert_eq!(estimate.n_pulses, 3);
    }

    #[test]
    fn test_constant_waveform_has_no_power() {
        // A single gap spanning the whole duration is flat after centering.
        let estimate = AnalyticEstimator::new(&[0.1, 0.2, 0.3]).estimate(
            [PulseGapEvent::new(10.0, 0.0)],
            10.0,
            1.0,
        );
        assert!(estimate.psd.iter().all(|&p| p < 1e-24));
    }

    #[test]
    fn test_psd_scales_with_magnitude_squared() {
        let frequencies = [1.0 / 6.0, 0.5];
        let estimator = AnalyticEstimator::new(&frequencies);
        let unit = estimator.estimate(sketch_train(), 6.0, 1.0);
        let doubled = estimator.estimate(sketch_train(), 6.0, 2.0);
        for (a, b) in unit.psd.iter().zip(&doubled.psd) {
            assert!((b - 4.0 * a).abs() < 1e-12 * (1.0 + b));
        }
    }
}
