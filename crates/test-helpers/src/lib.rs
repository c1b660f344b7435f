//! Shared fixtures for SNORP tests.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Deterministic random stream for tests.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `amplitude · sin(2π·bin·n / len)` for `n` in `0..len`: a sinusoid sitting
/// exactly on natural-frequency bin `bin`.
pub fn sinusoid(len: usize, bin: usize, amplitude: f64) -> Vec<f64> {
    (0..len)
        .map(|n| amplitude * (2.0 * PI * bin as f64 * n as f64 / len as f64).sin())
        .collect()
}

/// `|actual - expected| / |expected|`.
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs() / expected.abs()
}
