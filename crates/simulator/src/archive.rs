//! On-disk archive of simulation results.
//!
//! All files of one run share a base name derived from the model parameters
//! and the seed:
//!
//! ```text
//! {dir}/{name}.psd.csv            log10 f, log10 empirical, log10 theory
//! {dir}/{name}.n_pulses.csv       pulses per realization (single-carrier)
//! {dir}/{name}.{i}.series.csv     raw signal of realization i (optionally .gz)
//! ```

use crate::config::{Scenario, SimulatorConfig};
use crate::error::ArchiveError;
use crate::runner::{SignalRecord, SignalSink};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use snorp_types::PsdCurve;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where and what to write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    /// Archive directory.
    pub dir: PathBuf,
    /// Write the raw signal of every realization.
    pub write_signals: bool,
    /// Gzip raw signals (`.series.csv.gz`).
    pub compress_signals: bool,
    /// Write the per-realization pulse counts (single-carrier only).
    pub write_pulse_counts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            write_signals: false,
            compress_signals: false,
            write_pulse_counts: false,
        }
    }
}

impl OutputConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn with_signals(mut self, compress: bool) -> Self {
        self.write_signals = true;
        self.compress_signals = compress;
        self
    }

    pub fn with_pulse_counts(mut self) -> Self {
        self.write_pulse_counts = true;
        self
    }
}

/// File layout for one run.
#[derive(Clone, Debug)]
pub struct Archive {
    output: OutputConfig,
    name: String,
}

impl Archive {
    /// Archive for a run of `config` started from `seed`.
    pub fn new(output: OutputConfig, config: &SimulatorConfig, seed: u64) -> Self {
        let name = format!("{}.seed{}", model_info(config), seed);
        Self { output, name }
    }

    /// Base name shared by every file of the run.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn psd_path(&self) -> PathBuf {
        self.output.dir.join(format!("{}.psd.csv", self.name))
    }

    pub fn pulse_counts_path(&self) -> PathBuf {
        self.output.dir.join(format!("{}.n_pulses.csv", self.name))
    }

    /// Path of the raw signal of realization `index`, before any `.gz` suffix.
    pub fn signal_path(&self, index: usize) -> PathBuf {
        self.output
            .dir
            .join(format!("{}.{}.series.csv", self.name, index))
    }

    /// Create the archive directory if needed.
    pub fn create_dir(&self) -> Result<(), ArchiveError> {
        fs::create_dir_all(&self.output.dir).map_err(|e| ArchiveError::io(&self.output.dir, e))
    }

    /// Write the PSD comparison as log10 values.
    pub fn write_psd(&self, curve: &PsdCurve) -> Result<PathBuf, ArchiveError> {
        let path = self.psd_path();
        let lines = curve.rows().iter().map(|row| {
            format!(
                "{:.4},{:.4},{:.4}",
                row.frequency.log10(),
                row.empirical.log10(),
                row.theoretical.log10()
            )
        });
        write_lines(&path, lines, false)?;
        info!(path = %path.display(), rows = curve.len(), "Wrote PSD");
        Ok(path)
    }

    /// Write one pulse count per line.
    pub fn write_pulse_counts(&self, counts: &[u64]) -> Result<PathBuf, ArchiveError> {
        let path = self.pulse_counts_path();
        write_lines(&path, counts.iter().map(u64::to_string), false)?;
        info!(path = %path.display(), repeats = counts.len(), "Wrote pulse counts");
        Ok(path)
    }
}

impl SignalSink for Archive {
    fn wants_signals(&self) -> bool {
        self.output.write_signals
    }

    fn record(&self, index: usize, signal: SignalRecord<'_>) -> Result<(), ArchiveError> {
        let mut path = self.signal_path(index);
        if self.output.compress_signals {
            path = gz_path(&path);
        }
        match signal {
            SignalRecord::Counts(counts) => write_lines(
                &path,
                counts.iter().map(|c| c.to_string()),
                self.output.compress_signals,
            )?,
            SignalRecord::Levels(levels) => write_lines(
                &path,
                levels.iter().map(|(_, level)| format!("{:.4}", level)),
                self.output.compress_signals,
            )?,
        }
        debug!(index, path = %path.display(), "Wrote signal");
        Ok(())
    }
}

/// `poiss{λc·1e4}.upoiss{rmin·1e4}_{rmax}`, with `.nc{N}.multi` for the
/// multi-carrier path.
fn model_info(config: &SimulatorConfig) -> String {
    let model = &config.model;
    let mut info = format!(
        "poiss{:.0}.upoiss{:.0}_{:.0}",
        model.capture_rate * 1e4,
        model.rates.min() * 1e4,
        model.rates.max()
    );
    if let Scenario::MultiCarrier { n_carriers, .. } = config.scenario {
        info.push_str(&format!(".nc{}.multi", n_carriers));
    }
    info
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

fn write_lines(
    path: &Path,
    lines: impl Iterator<Item = String>,
    compress: bool,
) -> Result<(), ArchiveError> {
    let file = File::create(path).map_err(|e| ArchiveError::io(path, e))?;
    write_to(BufWriter::new(file), lines, compress).map_err(|e| ArchiveError::io(path, e))
}

fn write_to(
    mut writer: BufWriter<File>,
    lines: impl Iterator<Item = String>,
    compress: bool,
) -> std::io::Result<()> {
    if compress {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        write_all_lines(&mut encoder, lines)?;
        encoder.finish()?.flush()
    } else {
        write_all_lines(&mut writer, lines)?;
        writer.flush()
    }
}

fn write_all_lines(
    writer: &mut impl Write,
    lines: impl Iterator<Item = String>,
) -> std::io::Result<()> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

/// Read a stored signal, one value per line.
///
/// `<path>.gz` is tried first and `<path>` second. If neither exists the
/// error is [`ArchiveError::NotFound`].
pub fn read_signal(path: impl AsRef<Path>) -> Result<Vec<f64>, ArchiveError> {
    let plain = path.as_ref().to_path_buf();
    let compressed = gz_path(&plain);

    let (source, reader): (PathBuf, Box<dyn Read>) = match File::open(&compressed) {
        Ok(file) => (compressed, Box::new(GzDecoder::new(file))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => match File::open(&plain) {
            Ok(file) => (plain, Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArchiveError::NotFound { compressed, plain });
            }
            Err(e) => return Err(ArchiveError::io(plain, e)),
        },
        Err(e) => return Err(ArchiveError::io(compressed, e)),
    };

    let mut values = Vec::new();
    for (line_idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|e| ArchiveError::io(&source, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed.parse().map_err(|_| ArchiveError::Parse {
            path: source.clone(),
            line: line_idx + 1,
            value: trimmed.to_string(),
        })?;
        values.push(value);
    }
    debug!(path = %source.display(), len = values.len(), "Read signal");
    Ok(values)
}
