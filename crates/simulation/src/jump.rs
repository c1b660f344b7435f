//! Multi-carrier continuous-time jump process.
//!
//! Each carrier alternates between captured and free with exponential holding
//! times. Switch times are kept in a min-ordered event queue and resolved
//! exactly; the process is only observed at the sample boundaries.

use crate::exponential;
use rand::Rng;
use snorp_theory::free_probability;
use snorp_types::{CarrierCount, ModelParams, RateRange};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use tracing::debug;

/// State of a single carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierState {
    /// Held by a trap; leaves at its detachment rate.
    Captured,
    /// Contributes to the signal; captured at the capture rate.
    Free,
}

#[derive(Debug, Clone, Copy)]
struct Carrier {
    state: CarrierState,
    next_switch: f64,
}

/// Queue key: switch time, ties broken by carrier index.
#[derive(Debug, Clone, Copy)]
struct SwitchKey {
    time: f64,
    carrier: usize,
}

impl PartialEq for SwitchKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SwitchKey {}

impl PartialOrd for SwitchKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SwitchKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.carrier.cmp(&other.carrier))
    }
}

/// One sampled realization of the free-carrier count.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierSignal {
    /// Number of free carriers at `0, δ, 2δ, …`.
    pub samples: Vec<CarrierCount>,
    /// Running mean of `samples`.
    pub mean: f64,
    /// Total number of state switches resolved.
    pub transitions: u64,
}

impl CarrierSignal {
    /// Samples with the running mean subtracted.
    pub fn centered(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|&count| count as f64 - self.mean)
            .collect()
    }
}

/// Simulator for `n_carriers` independent two-state carriers.
#[derive(Debug, Clone)]
pub struct JumpSimulator {
    n_carriers: CarrierCount,
    params: ModelParams,
    sample_period: f64,
    n_samples: usize,
}

impl JumpSimulator {
    pub fn new(
        n_carriers: CarrierCount,
        params: ModelParams,
        sample_period: f64,
        n_samples: usize,
    ) -> Self {
        Self {
            n_carriers,
            params,
            sample_period,
            n_samples,
        }
    }

    /// Observed duration `n_samples · sample_period`.
    pub fn duration(&self) -> f64 {
        self.n_samples as f64 * self.sample_period
    }

    /// Detachment range with the floor clamped to `1 / duration`.
    fn observable_rates(&self) -> RateRange {
        self.params.rates.clamp_min(1.0 / self.duration())
    }

    /// Draw a steady-state initial configuration.
    ///
    /// The number of free carriers matches `n · p` in expectation (floor plus a
    /// Bernoulli draw on the fractional part). Free carriers get an ordinary
    /// `Exp(capture_rate)` residual. Captured carriers were caught mid-gap, so
    /// their rate class is size-biased towards slow rates: the rate is drawn
    /// from the log-uniform distribution and the residual is `Exp(rate)`.
    fn initial_carriers<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<Carrier>, CarrierCount) {
        let p = free_probability(
            self.params.capture_rate,
            self.params.rates,
            self.duration(),
        );
        let expected_free = self.n_carriers as f64 * p;
        let mut free = expected_free.floor() as CarrierCount;
        if rng.gen::<f64>() < expected_free - free as f64 {
            free += 1;
        }
        let free = free.min(self.n_carriers);

        let rates = self.observable_rates();
        let mut carriers = Vec::with_capacity(self.n_carriers as usize);
        for _ in 0..free {
            carriers.push(Carrier {
                state: CarrierState::Free,
                next_switch: exponential(rng, self.params.capture_rate),
            });
        }
        for _ in free..self.n_carriers {
            let rate = rates.size_biased_quantile(rng.gen::<f64>());
            carriers.push(Carrier {
                state: CarrierState::Captured,
                next_switch: exponential(rng, rate),
            });
        }
        (carriers, free)
    }

    /// Holding time after entering `state`.
    fn holding_time<R: Rng + ?Sized>(&self, state: CarrierState, rng: &mut R) -> f64 {
        match state {
            CarrierState::Free => exponential(rng, self.params.capture_rate),
            CarrierState::Captured => {
                let rates = self.params.rates;
                let rate = if rates.is_fixed() {
                    rates.min()
                } else {
                    rng.gen_range(rates.min()..=rates.max())
                };
                exponential(rng, rate)
            }
        }
    }

    /// Simulate one realization.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> CarrierSignal {
        if self.n_samples == 0 {
            return CarrierSignal {
                samples: Vec::new(),
                mean: 0.0,
                transitions: 0,
            };
        }

        let (mut carriers, mut free) = self.initial_carriers(rng);
        let mut queue: BinaryHeap<Reverse<SwitchKey>> = carriers
            .iter()
            .enumerate()
            .map(|(carrier, c)| {
                Reverse(SwitchKey {
                    time: c.next_switch,
                    carrier,
                })
            })
            .collect();

        let mut samples = Vec::with_capacity(self.n_samples);
        samples.push(free);
        let mut mean = free as f64;
        let mut transitions = 0u64;

        for sample_idx in 1..self.n_samples {
            let boundary = sample_idx as f64 * self.sample_period;

            // A carrier rescheduled below the boundary is popped again, so
            // several switches per interval resolve in time order.
            while queue
                .peek()
                .is_some_and(|Reverse(key)| key.time < boundary)
            {
                let Some(Reverse(key)) = queue.pop() else {
                    break;
                };
                let carrier = &mut carriers[key.carrier];
                let next_state = match carrier.state {
                    CarrierState::Captured => {
                        free += 1;
                        CarrierState::Free
                    }
                    CarrierState::Free => {
                        free -= 1;
                        CarrierState::Captured
                    }
                };
                carrier.state = next_state;
                carrier.next_switch = key.time + self.holding_time(next_state, rng);
                transitions += 1;
                queue.push(Reverse(SwitchKey {
                    time: carriers[key.carrier].next_switch,
                    carrier: key.carrier,
                }));
            }

            samples.push(free);
            mean += (free as f64 - mean) / (sample_idx + 1) as f64;
        }

        debug!(
            n_carriers = self.n_carriers,
            n_samples = self.n_samples,
            transitions,
            mean,
            "Jump process realization complete"
        );

        CarrierSignal {
            samples,
            mean,
            transitions,
        }
    }
}
