//! SNORP simulation driver.
//!
//! Runs repeated realizations of a single- or multi-carrier SNORP process,
//! averages their PSDs and sets the result next to the closed-form theory.
//!
//! # Architecture
//!
//! - **Configuration**: [`SimulatorConfig`] with builder methods and a
//!   [`Scenario`] selecting the simulation path
//! - **Runner**: [`Simulator`] draws or fixes the seed, schedules repeats
//!   ([`ExecutionMode`]) and produces a [`SimulationReport`]
//! - **Archive**: [`Archive`] writes PSD tables, pulse counts and raw signals,
//!   and [`read_signal`] reads stored signals back
//! - **Occupancy**: [`occupancy_table`] compares a stored multi-carrier signal
//!   with the binomial steady state
//!
//! # Example
//!
//! ```no_run
//! use snorp_simulator::{Archive, OutputConfig, Scenario, Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(Scenario::multi(10, 1 << 16, 1e-2))
//!     .with_detachment_rates(0.0, 100.0)
//!     .with_repeats(10);
//! let simulator = Simulator::new(config)?;
//! let archive = Archive::new(OutputConfig::new("data"), simulator.config(), simulator.seed());
//! archive.create_dir()?;
//! let report = simulator.run_with_sink(&archive)?;
//! archive.write_psd(&report.curve)?;
//! report.print();
//! # Ok::<(), snorp_simulator::SimulatorError>(())
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod occupancy;
pub mod runner;

pub use archive::{read_signal, Archive, OutputConfig};
pub use config::{ExecutionMode, FrequencySelection, Scenario, SimulatorConfig};
pub use error::{ArchiveError, SimulatorError};
pub use occupancy::{occupancy_table, OccupancyRow};
pub use runner::{SignalRecord, SignalSink, SimulationReport, Simulator};
