//! Configuration types for the simulator.

use snorp_types::{CarrierCount, ConfigError, FrequencyGrid, ModelParams, RateRange};
use std::f64::consts::PI;
use tracing::warn;

/// Upper bound (exclusive) of automatically drawn seeds.
pub const AUTO_SEED_BOUND: u64 = 1 << 20;

/// Configuration for a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatorConfig {
    /// Number of independent realizations whose PSDs are averaged.
    pub repeats: usize,

    /// Physical model parameters.
    pub model: ModelParams,

    /// Which simulation path to run.
    pub scenario: Scenario,

    /// Random seed. `None` draws one from system entropy.
    pub seed: Option<u64>,

    /// How realizations are scheduled.
    pub execution: ExecutionMode,
}

impl SimulatorConfig {
    /// Create a configuration for the given scenario with default model parameters.
    pub fn new(scenario: Scenario) -> Self {
        Self {
            repeats: 1,
            model: ModelParams::default(),
            scenario,
            seed: None,
            execution: ExecutionMode::default(),
        }
    }

    /// Set the number of repeats.
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    /// Set the model parameters.
    pub fn with_model(mut self, model: ModelParams) -> Self {
        self.model = model;
        self
    }

    /// Set the pulse magnitude.
    pub fn with_pulse_magnitude(mut self, magnitude: f64) -> Self {
        self.model.pulse_magnitude = magnitude;
        self
    }

    /// Set the capture rate.
    pub fn with_capture_rate(mut self, rate: f64) -> Self {
        self.model.capture_rate = rate;
        self
    }

    /// Set the detachment-rate range.
    ///
    /// An inverted range is not an error: `max` is raised to `min`.
    pub fn with_detachment_rates(mut self, min: f64, max: f64) -> Self {
        if RateRange::is_inverted(min, max) {
            warn!(
                min_detachment_rate = min,
                max_detachment_rate = max,
                "Inverted detachment-rate range, using a fixed rate"
            );
        }
        self.model.rates = RateRange::new(min, max);
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the execution mode.
    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Observed duration of one realization.
    pub fn duration(&self) -> f64 {
        self.scenario.duration()
    }

    /// Number of carriers simulated.
    pub fn n_carriers(&self) -> CarrierCount {
        match self.scenario {
            Scenario::SingleCarrier { .. } => 1,
            Scenario::MultiCarrier { n_carriers, .. } => n_carriers,
        }
    }

    /// Model parameters with the detachment floor raised to `1 / duration`,
    /// as used for the theoretical spectrum.
    pub fn observable_model(&self) -> ModelParams {
        self.model.clamped_to_duration(self.duration())
    }

    /// Frequencies at which PSDs are reported.
    pub fn frequency_grid(&self) -> Result<FrequencyGrid, ConfigError> {
        match &self.scenario {
            Scenario::SingleCarrier {
                duration,
                frequencies,
                ..
            } => frequencies.resolve(*duration, self.model.rates),
            Scenario::MultiCarrier {
                n_samples,
                sample_period,
                n_freq,
                ..
            } => FrequencyGrid::natural_log_spaced(*n_samples, *sample_period, *n_freq),
        }
    }

    /// Check that the configuration can be run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repeats == 0 {
            return Err(ConfigError::CountTooSmall {
                name: "repeats",
                min: 1,
                value: 0,
            });
        }
        self.model.validate()?;
        self.scenario.validate()?;
        self.frequency_grid().map(|_| ())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new(Scenario::single(1e6))
    }
}

/// Simulation path.
#[derive(Clone, Debug, PartialEq)]
pub enum Scenario {
    /// One carrier, PSD from the exact Fourier transform of its pulse train.
    SingleCarrier {
        /// Simulated duration.
        duration: f64,
        /// Frequency range selection.
        frequencies: FrequencySelection,
        /// Sampling step for raw signal output, if wanted.
        signal_step: Option<f64>,
    },

    /// Many carriers, PSD from the periodogram of the sampled free-carrier count.
    MultiCarrier {
        /// Number of independent carriers.
        n_carriers: CarrierCount,
        /// Number of samples per realization.
        n_samples: usize,
        /// Time between samples.
        sample_period: f64,
        /// Number of log-spaced natural frequencies to report.
        n_freq: usize,
    },
}

impl Scenario {
    /// Single-carrier scenario with automatic frequency selection.
    pub fn single(duration: f64) -> Self {
        Scenario::SingleCarrier {
            duration,
            frequencies: FrequencySelection::default(),
            signal_step: None,
        }
    }

    /// Multi-carrier scenario reporting 100 frequencies.
    pub fn multi(n_carriers: CarrierCount, n_samples: usize, sample_period: f64) -> Self {
        Scenario::MultiCarrier {
            n_carriers,
            n_samples,
            sample_period,
            n_freq: 100,
        }
    }

    /// Observed duration of one realization.
    pub fn duration(&self) -> f64 {
        match self {
            Scenario::SingleCarrier { duration, .. } => *duration,
            Scenario::MultiCarrier {
                n_samples,
                sample_period,
                ..
            } => *n_samples as f64 * sample_period,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Scenario::SingleCarrier {
                duration,
                frequencies,
                signal_step,
            } => {
                positive("duration", *duration)?;
                if let Some(step) = signal_step {
                    positive("signal_step", *step)?;
                }
                at_least("n_freq", 1, frequencies.n_freq)
            }
            Scenario::MultiCarrier {
                n_carriers,
                n_samples,
                sample_period,
                n_freq,
            } => {
                at_least("n_carriers", 1, *n_carriers as usize)?;
                at_least("n_samples", 2, *n_samples)?;
                positive("sample_period", *sample_period)?;
                at_least("n_freq", 1, *n_freq)
            }
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveDuration { name, value })
    }
}

fn at_least(name: &'static str, min: usize, value: usize) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::CountTooSmall { name, min, value })
    }
}

/// Frequency range for the single-carrier path.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencySelection {
    /// Lowest frequency. `None` selects `max(1/T, 0.1·rmin/(2π))`.
    pub min_freq: Option<f64>,

    /// Highest frequency. `None` selects `10·rmax/π²`.
    pub max_freq: Option<f64>,

    /// Number of log-spaced frequencies before rounding to natural frequencies.
    pub n_freq: usize,
}

impl Default for FrequencySelection {
    fn default() -> Self {
        Self {
            min_freq: None,
            max_freq: None,
            n_freq: 100,
        }
    }
}

impl FrequencySelection {
    /// Explicit range.
    pub fn range(min_freq: f64, max_freq: f64, n_freq: usize) -> Self {
        Self {
            min_freq: Some(min_freq),
            max_freq: Some(max_freq),
            n_freq,
        }
    }

    /// Resolve to natural frequencies of a signal of length `duration`.
    pub fn resolve(&self, duration: f64, rates: RateRange) -> Result<FrequencyGrid, ConfigError> {
        let max_freq = self
            .max_freq
            .unwrap_or_else(|| 10.0 * rates.max() / (PI * PI));
        let min_freq = self
            .min_freq
            .unwrap_or_else(|| (1.0 / duration).max(0.1 * rates.min() / (2.0 * PI)));
        FrequencyGrid::rounded_log_spaced(duration, min_freq, max_freq, self.n_freq)
    }
}

/// How realizations are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One random stream shared by all realizations, run in order.
    #[default]
    Sequential,

    /// Realizations run concurrently; realization `i` uses stream `i` of the seed.
    Parallel,
}
