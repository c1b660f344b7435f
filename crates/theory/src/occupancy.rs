//! Steady-state occupancy of the two carrier states.

use snorp_types::RateRange;

/// Probability that a carrier observed at a random time is free.
///
/// Mean free time is `1 / capture_rate`; mean captured time is the uniform-rate
/// mixture expectation with the detachment floor clamped to `1 / duration`.
pub fn free_probability(capture_rate: f64, rates: RateRange, duration: f64) -> f64 {
    let mean_free = 1.0 / capture_rate;
    let mean_captured = rates.clamp_min(1.0 / duration).mean_inverse();
    mean_free / (mean_free + mean_captured)
}

/// Binomial distribution of the number of free carriers among `n_carriers`
/// independent carriers, each free with probability `p`.
///
/// Entry `k` of the result is `P(k carriers free)`, for `k` in `0..=n_carriers`.
pub fn free_count_pmf(n_carriers: u32, p: f64) -> Vec<f64> {
    let n = n_carriers as usize;
    let mut pmf = vec![0.0; n + 1];
    if p <= 0.0 {
        pmf[0] = 1.0;
        return pmf;
    }
    if p >= 1.0 {
        pmf[n] = 1.0;
        return pmf;
    }

    let (ln_p, ln_q) = (p.ln(), (1.0 - p).ln());
    let mut ln_choose = 0.0;
    for (k, slot) in pmf.iter_mut().enumerate() {
        if k > 0 {
            ln_choose += ((n - k + 1) as f64 / k as f64).ln();
        }
        *slot = (ln_choose + k as f64 * ln_p + (n - k) as f64 * ln_q).exp();
    }
    pmf
}

/// Density of the captured (gap) duration `tau`.
///
/// Each gap draws its detachment rate uniformly from `rates` and then an
/// exponential duration, so the overall density is the uniform mixture of
/// `r·exp(-r·tau)`:
///
/// ```text
/// p(tau) = [(1 + rmin·tau)·exp(-rmin·tau) - (1 + rmax·tau)·exp(-rmax·tau)] / (tau² · (rmax - rmin))
/// ```
pub fn captured_time_pdf(tau: f64, rates: RateRange) -> f64 {
    if tau < 0.0 {
        return 0.0;
    }
    let (min, max) = (rates.min(), rates.max());
    if rates.is_fixed() {
        return min * (-min * tau).exp();
    }
    if tau == 0.0 {
        return 0.5 * (min + max);
    }
    let survival_moment = |rate: f64| (1.0 + rate * tau) * (-rate * tau).exp();
    (survival_moment(min) - survival_moment(max)) / (tau * tau * (max - min))
}
