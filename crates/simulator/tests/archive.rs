//! End-to-end runs writing to a temporary archive.

use snorp_simulator::{
    occupancy_table, read_signal, Archive, ExecutionMode, OutputConfig, Scenario, Simulator,
    SimulatorConfig,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_multi_carrier_run_writes_readable_archive() {
    let dir = TempDir::new().unwrap();
    let config = SimulatorConfig::new(Scenario::multi(20, 1 << 12, 1e-3))
        .with_detachment_rates(0.0, 1e3)
        .with_repeats(2)
        .with_seed(23567)
        .with_execution(ExecutionMode::Parallel);
    let simulator = Simulator::new(config).unwrap();
    let output = OutputConfig::new(dir.path()).with_signals(true);
    let archive = Archive::new(output, simulator.config(), simulator.seed());
    archive.create_dir().unwrap();

    let report = simulator.run_with_sink(&archive).unwrap();
    let psd_path = archive.write_psd(&report.curve).unwrap();
    assert_eq!(
        psd_path.file_name().unwrap().to_str().unwrap(),
        "poiss10000.upoiss0_1000.nc20.multi.seed23567.psd.csv"
    );

    let psd = fs::read_to_string(&psd_path).unwrap();
    assert_eq!(psd.lines().count(), report.curve.len());
    for line in psd.lines() {
        let fields: Vec<f64> = line.split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(fields.len(), 3);
    }

    for index in 0..2 {
        let signal = read_signal(archive.signal_path(index)).unwrap();
        assert_eq!(signal.len(), 1 << 12);
        assert!(signal.iter().all(|&c| (0.0..=20.0).contains(&c)));

        let table = occupancy_table(&signal, 20, 1.0, simulator.config().model.rates, 4.096);
        let total: f64 = table.iter().map(|row| row.empirical).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_single_carrier_run_writes_pulse_counts_and_levels() {
    let dir = TempDir::new().unwrap();
    let config = SimulatorConfig::new(Scenario::SingleCarrier {
        duration: 50.0,
        frequencies: Default::default(),
        signal_step: Some(0.1),
    })
    .with_detachment_rates(0.0, 10.0)
    .with_repeats(3)
    .with_seed(8);
    let simulator = Simulator::new(config).unwrap();
    let output = OutputConfig::new(dir.path())
        .with_signals(false)
        .with_pulse_counts();
    let archive = Archive::new(output, simulator.config(), simulator.seed());
    archive.create_dir().unwrap();

    let report = simulator.run_with_sink(&archive).unwrap();
    let counts_path = archive.write_pulse_counts(&report.pulse_counts).unwrap();
    let counts: Vec<u64> = fs::read_to_string(counts_path)
        .unwrap()
        .lines()
        .map(|line| line.parse().unwrap())
        .collect();
    assert_eq!(counts, report.pulse_counts);

    let levels = read_signal(archive.signal_path(1)).unwrap();
    assert_eq!(levels.len(), 500);
    assert!(levels.iter().all(|&level| level == 0.0 || level == 1.0));
}
