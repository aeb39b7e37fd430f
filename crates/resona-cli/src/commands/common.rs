//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::Args;
use resona_analysis::{AnalysisConfig, InterleavedBuffer, ResonantAnalyzer};
use resona_io::read_wav;
use std::path::{Path, PathBuf};

/// Analysis settings shared by `point` and `region`.
///
/// Values come from `--config` when given, then individual flags override
/// them.
#[derive(Args, Debug)]
pub struct AnalysisOptions {
    /// TOML file with analysis settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// FFT length (power of two, at least 4)
    #[arg(long)]
    pub fft_size: Option<usize>,

    /// Peak threshold in dB relative to the loudest bin (at most 0)
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: Option<f64>,

    /// Zero-based channel to analyze
    #[arg(long)]
    pub channel: Option<usize>,
}

impl AnalysisOptions {
    /// Resolve the effective configuration.
    pub fn config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(length) = self.fft_size {
            config.transform_length = length;
        }
        if let Some(db) = self.threshold {
            config.threshold_db = db;
        }
        if let Some(channel) = self.channel {
            config.channel = channel;
        }
        Ok(config)
    }

    /// Build an analyzer from the effective configuration.
    pub fn analyzer(&self) -> anyhow::Result<ResonantAnalyzer> {
        Ok(ResonantAnalyzer::new(self.config()?)?)
    }
}

/// Output format flags shared by `point` and `region`.
#[derive(Args, Debug)]
pub struct OutputOptions {
    /// Print a single line of space-separated values
    #[arg(long, conflicts_with = "json")]
    pub flat: bool,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

/// Load a WAV file as an analysis buffer.
pub fn load_buffer(path: &Path) -> anyhow::Result<InterleavedBuffer> {
    let (buffer, _) =
        read_wav(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(buffer)
}

/// Join values with single spaces.
pub fn flat_line(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A partial to synthesize: frequency, amplitude, decay per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialArg {
    pub frequency_hz: f64,
    pub amplitude: f64,
    pub decay_rate: f64,
}

/// Parse a `freq:amp:rate` string for clap's `value_parser`.
pub fn parse_partial(s: &str) -> Result<PartialArg, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [freq, amp, rate] = parts.as_slice() else {
        return Err(format!(
            "Invalid partial format: '{s}' (expected freq:amp:rate)"
        ));
    };

    let number = |field: &str, name: &str| -> Result<f64, String> {
        field
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("Invalid {name} '{field}' in partial '{s}'"))
    };

    let spec = PartialArg {
        frequency_hz: number(*freq, "frequency")?,
        amplitude: number(*amp, "amplitude")?,
        decay_rate: number(*rate, "decay rate")?,
    };
    if spec.frequency_hz <= 0.0 {
        return Err(format!("Frequency must be positive in partial '{s}'"));
    }
    if spec.decay_rate < 0.0 {
        return Err(format!("Decay rate must be non-negative in partial '{s}'"));
    }
    Ok(spec)
}
