//! One-sided density periodogram.

use crate::SpectralError;
use rustfft::{num_complex::Complex, FftPlanner};

/// Detrending applied before the transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Detrend {
    /// Use the series as given.
    None,
    /// Subtract the sample mean.
    #[default]
    Constant,
}

/// Boxcar-window periodogram with density scaling.
///
/// For a real series of length `M` sampled at `fs`, bin `k` sits at the
/// natural frequency `k·fs/M = k/(M·δ)` and holds `|X_k|² / (fs·M)`, doubled
/// for every bin except DC and (for even `M`) the Nyquist bin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Periodogram {
    detrend: Detrend,
}

impl Periodogram {
    pub fn new(detrend: Detrend) -> Self {
        Self { detrend }
    }

    /// Highest one-sided bin index for a series of length `len`.
    pub fn nyquist_bin(len: usize) -> usize {
        len / 2
    }

    /// Full one-sided PSD, bins `0..=len/2`.
    pub fn density(&self, series: &[f64], sample_rate: f64) -> Result<Vec<f64>, SpectralError> {
        if series.is_empty() {
            return Err(SpectralError::EmptySeries);
        }
        if !(sample_rate > 0.0 && sample_rate.is_finite()) {
            return Err(SpectralError::InvalidSampleRate(sample_rate));
        }

        let len = series.len();
        let offset = match self.detrend {
            Detrend::None => 0.0,
            Detrend::Constant => series.iter().sum::<f64>() / len as f64,
        };
        let mut buffer: Vec<Complex<f64>> = series
            .iter()
            .map(|&x| Complex::new(x - offset, 0.0))
            .collect();

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(len);
        fft.process(&mut buffer);

        let scale = 1.0 / (sample_rate * len as f64);
        let nyquist = Self::nyquist_bin(len);
        let psd = buffer[..=nyquist]
            .iter()
            .enumerate()
            .map(|(k, x)| {
                let one_sided = if k == 0 || (len % 2 == 0 && k == nyquist) {
                    1.0
                } else {
                    2.0
                };
                one_sided * scale * x.norm_sqr()
            })
            .collect();
        Ok(psd)
    }

    /// PSD at the requested natural-frequency bins only.
    pub fn at_bins(
        &self,
        series: &[f64],
        sample_rate: f64,
        bins: &[usize],
    ) -> Result<Vec<f64>, SpectralError> {
        let max = Self::nyquist_bin(series.len());
        if let Some(&bin) = bins.iter().find(|&&bin| bin > max) {
            return Err(SpectralError::BinOutOfRange { bin, max });
        }
        let psd = self.density(series, sample_rate)?;
        Ok(bins.iter().map(|&bin| psd[bin]).collect())
    }
}
