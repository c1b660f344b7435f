//! Free-carrier occupancy of a stored multi-carrier signal.

use snorp_theory::{free_count_pmf, free_probability};
use snorp_types::{CarrierCount, RateRange};

/// Empirical and binomial probability of one free-carrier count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupancyRow {
    pub count: CarrierCount,
    pub empirical: f64,
    pub theoretical: f64,
}

/// Tabulate the distribution of free-carrier counts in `signal` against the
/// binomial steady state.
///
/// Rows cover every count from the smallest to the largest observed value.
/// Samples are rounded to the nearest count; negative values count as zero
/// and values above `n_carriers` as `n_carriers`.
pub fn occupancy_table(
    signal: &[f64],
    n_carriers: CarrierCount,
    capture_rate: f64,
    rates: RateRange,
    duration: f64,
) -> Vec<OccupancyRow> {
    if signal.is_empty() {
        return Vec::new();
    }
    let counts: Vec<usize> = signal
        .iter()
        .map(|&value| value.round().clamp(0.0, n_carriers as f64) as usize)
        .collect();

    let mut histogram = vec![0u64; n_carriers as usize + 1];
    for &count in &counts {
        histogram[count] += 1;
    }
    let (lowest, highest) = counts
        .iter()
        .fold((usize::MAX, 0), |(lo, hi), &c| (lo.min(c), hi.max(c)));

    let pmf = free_count_pmf(n_carriers, free_probability(capture_rate, rates, duration));
    let total = counts.len() as f64;
    (lowest..=highest)
        .map(|count| OccupancyRow {
            count: count as CarrierCount,
            empirical: histogram[count] as f64 / total,
            theoretical: pmf[count],
        })
        .collect()
}
