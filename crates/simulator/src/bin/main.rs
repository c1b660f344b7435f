//! SNORP Simulator CLI
//!
//! Simulates SNORP realizations, estimates their PSD and archives the result
//! next to the theoretical spectrum.

use clap::{Args, Parser, Subcommand};
use snorp_simulator::{
    occupancy_table, read_signal, Archive, ExecutionMode, FrequencySelection, OutputConfig,
    Scenario, Simulator, SimulatorConfig,
};
use snorp_types::RateRange;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snorp-sim")]
#[command(about = "Simulate SNORP signals and compare their PSD with theory")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Single carrier, PSD from the exact Fourier transform of the pulse train
    Single {
        #[command(flatten)]
        run: RunArgs,

        /// Simulated duration
        #[arg(long, default_value = "1e6")]
        duration: f64,

        /// Lowest frequency (default: max(1/T, 0.1·rmin/2π))
        #[arg(long)]
        min_freq: Option<f64>,

        /// Highest frequency (default: 10·rmax/π²)
        #[arg(long)]
        max_freq: Option<f64>,

        /// Write the number of pulses of every realization
        #[arg(long)]
        save_n_pulses: bool,

        /// Sample and write the raw signal with this time step
        #[arg(long)]
        signal_step: Option<f64>,
    },

    /// Many carriers, PSD from the periodogram of the sampled free-carrier count
    Multi {
        #[command(flatten)]
        run: RunArgs,

        /// Number of independent carriers
        #[arg(long, default_value = "1")]
        n_carriers: u32,

        /// Number of samples per realization
        #[arg(long, default_value = "1048576")]
        n_samples: usize,

        /// Sampling period
        #[arg(long, default_value = "1e-3")]
        sample_period: f64,

        /// Write the raw signal of every realization
        #[arg(long)]
        signal_output: bool,
    },

    /// Compare the free-carrier counts of a stored signal with the binomial steady state
    Occupancy {
        /// Signal file; `<path>.gz` is tried first
        path: PathBuf,

        /// Number of carriers in the simulation that produced the signal
        #[arg(long)]
        n_carriers: u32,

        /// Sampling period of the signal
        #[arg(long, default_value = "1e-3")]
        sample_period: f64,

        /// Carrier capture rate
        #[arg(long, default_value = "1")]
        capture_rate: f64,

        /// Minimum detachment rate
        #[arg(long, default_value = "0")]
        min_detachment_rate: f64,

        /// Maximum detachment rate
        #[arg(long, default_value = "1e3")]
        max_detachment_rate: f64,
    },
}

/// Options shared by the simulation subcommands.
#[derive(Args)]
struct RunArgs {
    /// Number of realizations to average
    #[arg(long, default_value = "1")]
    repeats: usize,

    /// Pulse magnitude
    #[arg(long, default_value = "1")]
    pulse_magnitude: f64,

    /// Carrier capture rate
    #[arg(long, default_value = "1")]
    capture_rate: f64,

    /// Minimum detachment rate
    #[arg(long, default_value = "0")]
    min_detachment_rate: f64,

    /// Maximum detachment rate
    #[arg(long, default_value = "1e3")]
    max_detachment_rate: f64,

    /// Number of frequencies
    #[arg(long, default_value = "100")]
    n_freq: usize,

    /// Archive directory
    #[arg(long, default_value = "data")]
    archive_dir: PathBuf,

    /// RNG seed (drawn at random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Run realizations in parallel
    #[arg(long)]
    parallel: bool,

    /// Gzip raw signal files
    #[arg(long)]
    compress: bool,
}

impl RunArgs {
    fn config(&self, scenario: Scenario) -> SimulatorConfig {
        let execution = if self.parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        };
        let mut config = SimulatorConfig::new(scenario)
            .with_repeats(self.repeats)
            .with_pulse_magnitude(self.pulse_magnitude)
            .with_capture_rate(self.capture_rate)
            .with_detachment_rates(self.min_detachment_rate, self.max_detachment_rate)
            .with_execution(execution);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn simulate(
    config: SimulatorConfig,
    output: OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let simulator = Simulator::new(config)?;
    let archive = Archive::new(output.clone(), simulator.config(), simulator.seed());
    archive.create_dir()?;

    let report = simulator.run_with_sink(&archive)?;
    archive.write_psd(&report.curve)?;
    if output.write_pulse_counts {
        archive.write_pulse_counts(&report.pulse_counts)?;
    }
    report.print();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Single {
            run,
            duration,
            min_freq,
            max_freq,
            save_n_pulses,
            signal_step,
        } => {
            let scenario = Scenario::SingleCarrier {
                duration,
                frequencies: FrequencySelection {
                    min_freq,
                    max_freq,
                    n_freq: run.n_freq,
                },
                signal_step,
            };
            let mut output = OutputConfig::new(&run.archive_dir);
            if signal_step.is_some() {
                output = output.with_signals(run.compress);
            }
            if save_n_pulses {
                output = output.with_pulse_counts();
            }
            simulate(run.config(scenario), output)?;
        }

        Commands::Multi {
            run,
            n_carriers,
            n_samples,
            sample_period,
            signal_output,
        } => {
            let scenario = Scenario::MultiCarrier {
                n_carriers,
                n_samples,
                sample_period,
                n_freq: run.n_freq,
            };
            let mut output = OutputConfig::new(&run.archive_dir);
            if signal_output {
                output = output.with_signals(run.compress);
            }
            simulate(run.config(scenario), output)?;
        }

        Commands::Occupancy {
            path,
            n_carriers,
            sample_period,
            capture_rate,
            min_detachment_rate,
            max_detachment_rate,
        } => {
            let signal = read_signal(&path)?;
            let duration = signal.len() as f64 * sample_period;
            let rates = RateRange::new(min_detachment_rate, max_detachment_rate);
            let table = occupancy_table(&signal, n_carriers, capture_rate, rates, duration);

            println!("{:>8} {:>14} {:>14}", "count", "empirical", "binomial");
            for row in table {
                println!(
                    "{:>8} {:>14.6e} {:>14.6e}",
                    row.count, row.empirical, row.theoretical
                );
            }
        }
    }

    Ok(())
}
