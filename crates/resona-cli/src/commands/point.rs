//! Single-window spectral peak listing.

use clap::Args;
use resona_analysis::SpectralPeak;
use resona_analysis::model::flatten_peaks;
use serde::Serialize;
use std::path::PathBuf;

use super::common::{AnalysisOptions, OutputOptions, flat_line, load_buffer};

/// List the refined spectral peaks of the window starting at a cursor.
#[derive(Args)]
pub struct PointArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// First frame of the analysis window
    #[arg(long, default_value = "0")]
    pub cursor: usize,

    #[command(flatten)]
    pub analysis: AnalysisOptions,

    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct PointReport<'a> {
    file: String,
    sample_rate: f64,
    transform_length: usize,
    cursor: usize,
    peaks: &'a [SpectralPeak],
}

/// Run the point command.
pub fn run(args: PointArgs) -> anyhow::Result<()> {
    let buffer = load_buffer(&args.input)?;
    let mut analyzer = args.analysis.analyzer()?;
    let peaks = analyzer.analyze_point(&buffer, args.cursor)?;

    if args.output.flat {
        println!("{}", flat_line(&flatten_peaks(&peaks)));
        return Ok(());
    }

    if args.output.json {
        let report = PointReport {
            file: args.input.display().to_string(),
            sample_rate: buffer.sample_rate(),
            transform_length: analyzer.transform_length(),
            cursor: args.cursor,
            peaks: &peaks,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let config = analyzer.config();
    println!(
        "Point analysis: {} at frame {}",
        args.input.display(),
        args.cursor
    );
    println!(
        "FFT {} ({:.2} Hz/bin), threshold {} dB, channel {}",
        analyzer.transform_length(),
        analyzer.bin_width(buffer.sample_rate()),
        config.threshold_db,
        config.channel.min(buffer.channels() - 1)
    );
    println!();

    if peaks.is_empty() {
        println!("No peaks above threshold");
        return Ok(());
    }

    println!("{:>4}  {:>14}  {:>9}", "#", "Frequency (Hz)", "Amplitude");
    for (i, peak) in peaks.iter().enumerate() {
        println!(
            "{:>4}  {:>14.2}  {:>9.4}",
            i + 1,
            peak.frequency_hz,
            peak.amplitude
        );
    }

    Ok(())
}
