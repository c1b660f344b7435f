//! Natural-frequency grids.

use crate::ConfigError;

/// `n` points spaced evenly in log10 between `10^start` and `10^stop`, inclusive.
pub fn logspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![10f64.powf(start)],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| 10f64.powf(start + step * i as f64))
                .collect()
        }
    }
}

/// Sorted set of strictly positive natural frequencies `k / T`.
///
/// Every frequency is an integer multiple of the fundamental `1 / T`, which is
/// what both the periodogram (bin selection) and the analytic estimator
/// (orthogonal harmonics over `[0, T]`) expect.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    duration: f64,
    indices: Vec<usize>,
    frequencies: Vec<f64>,
}

impl FrequencyGrid {
    /// Build a grid from natural indices. Duplicates and the zero index are dropped.
    pub fn from_natural_indices(duration: f64, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().filter(|&k| k > 0).collect();
        indices.sort_unstable();
        indices.dedup();
        let frequencies = indices.iter().map(|&k| k as f64 / duration).collect();
        Self {
            duration,
            indices,
            frequencies,
        }
    }

    /// Log-spaced frequencies in `[min_freq, max_freq]`, rounded to the nearest
    /// natural frequency of a signal of length `duration`.
    pub fn rounded_log_spaced(
        duration: f64,
        min_freq: f64,
        max_freq: f64,
        n_freq: usize,
    ) -> Result<Self, ConfigError> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(ConfigError::NonPositiveDuration {
                name: "duration",
                value: duration,
            });
        }
        if !(min_freq > 0.0 && max_freq > 0.0) {
            return Err(ConfigError::EmptyFrequencyGrid { min_freq, max_freq });
        }

        let indices = logspace(min_freq.log10(), max_freq.log10(), n_freq)
            .into_iter()
            .map(|f| (duration * f).round())
            .filter(|k| k.is_finite() && *k >= 1.0)
            .map(|k| k as usize);

        let grid = Self::from_natural_indices(duration, indices);
        if grid.is_empty() {
            return Err(ConfigError::EmptyFrequencyGrid { min_freq, max_freq });
        }
        Ok(grid)
    }

    /// Natural indices spaced logarithmically from 1 up to the Nyquist index
    /// `n_samples / 2` of a sampled series.
    pub fn natural_log_spaced(
        n_samples: usize,
        sample_period: f64,
        n_freq: usize,
    ) -> Result<Self, ConfigError> {
        if n_samples < 2 {
            return Err(ConfigError::CountTooSmall {
                name: "n_samples",
                min: 2,
                value: n_samples,
            });
        }
        let duration = n_samples as f64 * sample_period;
        let nyquist = n_samples / 2;

        let indices = logspace(0.0, (nyquist as f64).log10(), n_freq)
            .into_iter()
            .map(|k| (k.floor() as usize).min(nyquist));

        let grid = Self::from_natural_indices(duration, indices);
        if grid.is_empty() {
            return Err(ConfigError::EmptyFrequencyGrid {
                min_freq: 1.0 / duration,
                max_freq: nyquist as f64 / duration,
            });
        }
        Ok(grid)
    }

    /// Signal duration `T` the grid is defined for.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Natural indices `k`.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Frequencies `k / T`.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logspace_endpoints() {
        let points = logspace(0.0, 3.0, 4);
        assert_eq!(points.len(), 4);
        for (p, expected) in points.iter().zip([1.0, 10.0, 100.0, 1000.0]) {
            assert!((p - expected).abs() < 1e-9 * expected);
        }
        assert_eq!(logspace(2.0, 5.0, 1), vec![100.0]);
        assert!(logspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_from_natural_indices_sorts_and_drops_zero() {
        let grid = FrequencyGrid::from_natural_indices(10.0, [3, 0, 1, 3, 2]);
        assert_eq!(grid.indices(), &[1, 2, 3]);
        assert_eq!(grid.frequencies(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_rounded_log_spaced_are_natural() {
        let duration = 1e4;
        let grid = FrequencyGrid::rounded_log_spaced(duration, 1e-4, 1e3, 100).unwrap();
        assert!(!grid.is_empty());
        assert!(grid.len() <= 100);
        assert_eq!(grid.indices()[0], 1);
        for (k, f) in grid.indices().iter().zip(grid.frequencies()) {
            assert!(*f > 0.0);
            assert!((f * duration - *k as f64).abs() < 1e-6);
        }
        assert!(grid.frequencies().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_rounded_log_spaced_removes_zero_frequency() {
        // 1e-6 Hz over 1e4 s rounds to index 0 and must be dropped.
        let grid = FrequencyGrid::rounded_log_spaced(1e4, 1e-6, 1e-2, 10).unwrap();
        assert!(grid.indices().iter().all(|&k| k > 0));
    }

    #[test]
    fn test_rounded_log_spaced_rejects_empty_grid() {
        assert!(matches!(
            FrequencyGrid::rounded_log_spaced(10.0, 1e-6, 1e-5, 5),
            Err(ConfigError::EmptyFrequencyGrid { .. })
        ));
        assert!(FrequencyGrid::rounded_log_spaced(10.0, -1.0, 1.0, 5).is_err());
    }

    #[test]
    fn test_natural_log_spaced_bounds() {
        let grid = FrequencyGrid::natural_log_spaced(1 << 12, 1e-3, 50).unwrap();
        assert_eq!(grid.indices()[0], 1);
        assert!(*grid.indices().last().unwrap() <= 1 << 11);
        assert!((grid.duration() - 4.096).abs() < 1e-12);
    }
}
