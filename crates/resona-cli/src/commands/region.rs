//! Resonant model extraction for an attack/decay region.

use clap::Args;
use resona_analysis::{Partial, ResonantModel};
use serde::Serialize;
use std::path::PathBuf;

use super::common::{AnalysisOptions, OutputOptions, flat_line, load_buffer};

/// Fit decaying partials to the event between two cursors.
#[derive(Args)]
pub struct RegionArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Start of the search region in frames (clamped into the file)
    #[arg(allow_hyphen_values = true)]
    pub cursor1: i64,

    /// End of the region in frames; the last slice starts at or before it
    #[arg(allow_hyphen_values = true)]
    pub cursor2: i64,

    #[command(flatten)]
    pub analysis: AnalysisOptions,

    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct RegionReport<'a> {
    file: String,
    sample_rate: f64,
    transform_length: usize,
    onset_secs: f64,
    #[serde(flatten)]
    model: &'a ResonantModel,
}

/// Run the region command.
pub fn run(args: RegionArgs) -> anyhow::Result<()> {
    let buffer = load_buffer(&args.input)?;
    let mut analyzer = args.analysis.analyzer()?;
    let model = analyzer.analyze_region(&buffer, args.cursor1, args.cursor2)?;
    let sample_rate = buffer.sample_rate();

    if args.output.flat {
        println!("{}", flat_line(&model.to_flat()));
        return Ok(());
    }

    if args.output.json {
        let report = RegionReport {
            file: args.input.display().to_string(),
            sample_rate,
            transform_length: analyzer.transform_length(),
            onset_secs: model.onset as f64 / sample_rate,
            model: &model,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Region analysis: {}", args.input.display());
    println!(
        "Onset:  frame {} ({:.4}s)",
        model.onset,
        model.onset as f64 / sample_rate
    );
    println!("Slices: {:?}", model.offsets);
    println!(
        "FFT {} ({:.2} Hz/bin)",
        analyzer.transform_length(),
        analyzer.bin_width(sample_rate)
    );
    println!();

    if model.is_empty() {
        println!("No partials above threshold");
        return Ok(());
    }

    println!(
        "{:>4}  {:>14}  {:>9}  {:>11}  {:>8}",
        "#", "Frequency (Hz)", "Amplitude", "Decay (1/s)", "T60 (s)"
    );
    for (i, partial) in model.partials.iter().enumerate() {
        println!(
            "{:>4}  {:>14.2}  {:>9.4}  {:>11.2}  {:>8.3}",
            i + 1,
            partial.frequency_hz,
            partial.amplitude,
            partial.decay_rate,
            t60(partial)
        );
    }

    Ok(())
}

/// Time for a partial to fall by 60 dB.
fn t60(partial: &Partial) -> f64 {
    1000.0_f64.ln() / partial.decay_rate
}
