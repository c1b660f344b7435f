//! Simulation runner.

use crate::config::{ExecutionMode, Scenario, SimulatorConfig, AUTO_SEED_BOUND};
use crate::error::{ArchiveError, SimulatorError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use snorp_simulation::{sample_pulse_train, JumpSimulator, PulseTrain};
use snorp_spectral::{AnalyticEstimator, Periodogram};
use snorp_theory::PsdModel;
use snorp_types::{CarrierCount, FrequencyGrid, PsdCurve};
use std::time::Instant;
use tracing::{debug, info};

/// One realization's raw signal, handed to a [`SignalSink`].
#[derive(Debug, Clone, Copy)]
pub enum SignalRecord<'a> {
    /// Free-carrier counts of a multi-carrier realization.
    Counts(&'a [CarrierCount]),
    /// `(time, level)` samples of a single-carrier realization.
    Levels(&'a [(f64, f64)]),
}

/// Receives raw signals as realizations complete.
///
/// Realizations may run concurrently, so `record` takes `&self`.
pub trait SignalSink: Sync {
    /// Whether signals should be produced at all.
    fn wants_signals(&self) -> bool {
        true
    }

    /// Store the signal of realization `index`.
    fn record(&self, index: usize, signal: SignalRecord<'_>) -> Result<(), ArchiveError>;
}

/// Discards every signal.
impl SignalSink for () {
    fn wants_signals(&self) -> bool {
        false
    }

    fn record(&self, _index: usize, _signal: SignalRecord<'_>) -> Result<(), ArchiveError> {
        Ok(())
    }
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    /// Seed the run was started from.
    pub seed: u64,
    /// Number of realizations averaged.
    pub repeats: usize,
    /// Averaged empirical PSD next to theory.
    pub curve: PsdCurve,
    /// Pulses per realization (single-carrier only, empty otherwise).
    pub pulse_counts: Vec<u64>,
}

impl SimulationReport {
    /// Print a summary to stdout.
    pub fn print(&self) {
        println!("\n=== SNORP Simulation Report ===");
        println!("Seed:        {}", self.seed);
        println!("Repeats:     {}", self.repeats);
        println!("Frequencies: {}", self.curve.len());
        if !self.pulse_counts.is_empty() {
            let total: u64 = self.pulse_counts.iter().sum();
            println!(
                "Pulses:      {:.1} per realization",
                total as f64 / self.pulse_counts.len() as f64
            );
        }
        println!("Mean ratio (empirical / theory): {:.4}", self.curve.mean_ratio());
        println!("\n{:>14} {:>14} {:>14}", "f", "empirical", "theory");
        for row in self.curve.rows() {
            println!(
                "{:>14.6e} {:>14.6e} {:>14.6e}",
                row.frequency, row.empirical, row.theoretical
            );
        }
    }
}

/// Per-realization result.
struct Realization {
    psd: Vec<f64>,
    n_pulses: Option<u64>,
}

/// Runs repeated realizations of one scenario and compares them with theory.
pub struct Simulator {
    config: SimulatorConfig,
    seed: u64,
    grid: FrequencyGrid,
}

impl Simulator {
    /// Validate `config` and fix the seed.
    ///
    /// Without a configured seed one is drawn from the thread RNG in
    /// `[0, 2^20)` and reported in the result.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        let grid = config.frequency_grid()?;
        let seed = config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen_range(0..AUTO_SEED_BOUND));
        Ok(Self { config, seed, grid })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Frequencies the report will cover.
    pub fn grid(&self) -> &FrequencyGrid {
        &self.grid
    }

    /// Run all repeats, discarding raw signals.
    pub fn run(&self) -> Result<SimulationReport, SimulatorError> {
        self.run_with_sink(&())
    }

    /// Run all repeats, passing each raw signal to `sink`.
    pub fn run_with_sink<S: SignalSink>(
        &self,
        sink: &S,
    ) -> Result<SimulationReport, SimulatorError> {
        let repeats = self.config.repeats;
        info!(
            seed = self.seed,
            repeats,
            n_carriers = self.config.n_carriers(),
            duration = self.config.duration(),
            n_freq = self.grid.len(),
            execution = ?self.config.execution,
            "Starting simulation"
        );
        let started = Instant::now();

        let estimator = AnalyticEstimator::new(self.grid.frequencies());
        let realizations: Vec<Realization> = match self.config.execution {
            ExecutionMode::Sequential => {
                let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
                (0..repeats)
                    .map(|index| self.realize(index, &mut rng, &estimator, sink))
                    .collect::<Result<_, _>>()?
            }
            ExecutionMode::Parallel => (0..repeats)
                .into_par_iter()
                .map(|index| {
                    let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
                    rng.set_stream(index as u64);
                    self.realize(index, &mut rng, &estimator, sink)
                })
                .collect::<Result<_, _>>()?,
        };

        let mut empirical = vec![0.0; self.grid.len()];
        for realization in &realizations {
            for (sum, value) in empirical.iter_mut().zip(&realization.psd) {
                *sum += value;
            }
        }
        for value in &mut empirical {
            *value /= repeats as f64;
        }

        let theory = PsdModel::new(self.config.observable_model(), self.config.n_carriers());
        let theoretical = theory.curve(self.grid.frequencies());
        let curve = PsdCurve::new(self.grid.frequencies(), &empirical, &theoretical);
        let pulse_counts = realizations.iter().filter_map(|r| r.n_pulses).collect();

        info!(
            seed = self.seed,
            regime = ?theory.regime(),
            mean_ratio = curve.mean_ratio(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Simulation complete"
        );

        Ok(SimulationReport {
            seed: self.seed,
            repeats,
            curve,
            pulse_counts,
        })
    }

    fn realize<R: Rng + ?Sized, S: SignalSink>(
        &self,
        index: usize,
        rng: &mut R,
        estimator: &AnalyticEstimator,
        sink: &S,
    ) -> Result<Realization, SimulatorError> {
        let model = &self.config.model;
        let realization = match &self.config.scenario {
            Scenario::SingleCarrier {
                duration,
                signal_step,
                ..
            } => {
                let estimate = match signal_step {
                    Some(step) if sink.wants_signals() => {
                        let events: Vec<_> = PulseTrain::new(rng, *duration, model).collect();
                        let levels = sample_pulse_train(
                            events.iter().copied(),
                            0.0,
                            *duration,
                            *step,
                            model.pulse_magnitude,
                        );
                        sink.record(index, SignalRecord::Levels(&levels))?;
                        estimator.estimate(events, *duration, model.pulse_magnitude)
                    }
                    _ => estimator.estimate(
                        PulseTrain::new(rng, *duration, model),
                        *duration,
                        model.pulse_magnitude,
                    ),
                };
                debug!(
                    index,
                    n_pulses = estimate.n_pulses,
                    total_pulse = estimate.total_pulse,
                    "Single-carrier realization complete"
                );
                Realization {
                    psd: estimate.psd,
                    n_pulses: Some(estimate.n_pulses),
                }
            }
            Scenario::MultiCarrier {
                n_carriers,
                n_samples,
                sample_period,
                ..
            } => {
                let simulator = JumpSimulator::new(*n_carriers, *model, *sample_period, *n_samples);
                let signal = simulator.run(rng);
                if sink.wants_signals() {
                    sink.record(index, SignalRecord::Counts(&signal.samples))?;
                }
                let psd = Periodogram::default().at_bins(
                    &signal.centered(),
                    1.0 / sample_period,
                    self.grid.indices(),
                )?;
                debug!(
                    index,
                    mean = signal.mean,
                    transitions = signal.transitions,
                    "Multi-carrier realization complete"
                );
                Realization {
                    psd,
                    n_pulses: None,
                }
            }
        };
        Ok(realization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrequencySelection;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    fn small_single() -> SimulatorConfig {
        SimulatorConfig::new(Scenario::SingleCarrier {
            duration: 100.0,
            frequencies: FrequencySelection::range(0.1, 10.0, 20),
            signal_step: None,
        })
        .with_detachment_rates(0.0, 100.0)
        .with_repeats(3)
        .with_seed(7)
    }

    fn small_multi() -> SimulatorConfig {
        SimulatorConfig::new(Scenario::multi(5, 1 << 10, 1e-2))
            .with_detachment_rates(0.0, 100.0)
            .with_repeats(3)
            .with_seed(7)
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(usize, usize)>>,
    }

    impl SignalSink for Recorder {
        fn record(&self, index: usize, signal: SignalRecord<'_>) -> Result<(), ArchiveError> {
            let len = match signal {
                SignalRecord::Counts(counts) => counts.len(),
                SignalRecord::Levels(levels) => levels.len(),
            };
            self.seen.lock().unwrap().push((index, len));
            Ok(())
        }
    }

    #[test]
    fn test_seed_is_drawn_when_unset() {
        let config = small_single();
        let config = SimulatorConfig { seed: None, ..config };
        let simulator = Simulator::new(config).unwrap();
        assert!(simulator.seed() < AUTO_SEED_BOUND);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = small_single().with_repeats(0);
        assert!(matches!(
            Simulator::new(config),
            Err(SimulatorError::Config(_))
        ));
    }

    #[test]
    fn test_single_carrier_report_shape() {
        let simulator = Simulator::new(small_single()).unwrap();
        let report = simulator.run().unwrap();
        assert_eq!(report.seed, 7);
        assert_eq!(report.repeats, 3);
        assert_eq!(report.curve.len(), simulator.grid().len());
        assert_eq!(report.pulse_counts.len(), 3);
        for row in report.curve.rows() {
            assert!(row.frequency > 0.0);
            assert!(row.empirical >= 0.0);
            assert!(row.theoretical > 0.0);
        }
    }

    #[test]
    fn test_multi_carrier_report_shape() {
        let simulator = Simulator::new(small_multi()).unwrap();
        let report = simulator.run().unwrap();
        assert!(report.pulse_counts.is_empty());
        assert_eq!(report.curve.len(), simulator.grid().len());
        assert_eq!(simulator.grid().indices()[0], 1);
    }

    #[test]
    fn test_same_seed_same_report() {
        for config in [small_single(), small_multi()] {
            let a = Simulator::new(config.clone()).unwrap().run().unwrap();
            let b = Simulator::new(config).unwrap().run().unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_parallel_is_reproducible() {
        for config in [small_single(), small_multi()] {
            let config = config.with_execution(ExecutionMode::Parallel);
            let a = Simulator::new(config.clone()).unwrap().run().unwrap();
            let b = Simulator::new(config).unwrap().run().unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_first_parallel_realization_matches_sequential() {
        // Stream 0 is the default stream of a freshly seeded generator.
        let sequential = small_multi().with_repeats(1);
        let parallel = sequential.clone().with_execution(ExecutionMode::Parallel);
        let a = Simulator::new(sequential).unwrap().run().unwrap();
        let b = Simulator::new(parallel).unwrap().run().unwrap();
        assert_eq!(a.curve, b.curve);
    }

    #[test]
    fn test_sink_receives_every_realization() {
        let recorder = Recorder::default();
        let config = small_multi().with_execution(ExecutionMode::Parallel);
        Simulator::new(config).unwrap().run_with_sink(&recorder).unwrap();
        let mut seen = recorder.seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![(0, 1 << 10), (1, 1 << 10), (2, 1 << 10)]);
    }

    #[test]
    fn test_single_carrier_levels_only_with_step() {
        let recorder = Recorder::default();
        Simulator::new(small_single())
            .unwrap()
            .run_with_sink(&recorder)
            .unwrap();
        assert!(recorder.seen.lock().unwrap().is_empty());

        let config = SimulatorConfig {
            scenario: Scenario::SingleCarrier {
                duration: 100.0,
                frequencies: FrequencySelection::range(0.1, 10.0, 20),
                signal_step: Some(0.5),
            },
            ..small_single()
        };
        let recorder = Recorder::default();
        Simulator::new(config).unwrap().run_with_sink(&recorder).unwrap();
        let seen = recorder.seen.into_inner().unwrap();
        assert_eq!(seen, vec![(0, 200), (1, 200), (2, 200)]);
    }

    #[test]
    fn test_recording_does_not_change_the_spectrum() {
        let config = SimulatorConfig {
            scenario: Scenario::SingleCarrier {
                duration: 100.0,
                frequencies: FrequencySelection::range(0.1, 10.0, 20),
                signal_step: Some(0.5),
            },
            ..small_single()
        };
        let simulator = Simulator::new(config).unwrap();
        let silent = simulator.run().unwrap();
        let recorded = simulator.run_with_sink(&Recorder::default()).unwrap();
        assert_eq!(silent, recorded);
    }

    #[traced_test]
    #[test]
    fn test_logs_run_boundaries() {
        Simulator::new(small_multi()).unwrap().run().unwrap();
        assert!(logs_contain("Starting simulation"));
        assert!(logs_contain("Simulation complete"));
    }
}
