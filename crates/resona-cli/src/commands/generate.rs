//! Test sound generation: sums of exponentially decaying partials.

use clap::Args;
use resona_io::{WavSpec, write_wav};
use std::f64::consts::PI;
use std::path::PathBuf;

use super::common::{PartialArg, parse_partial};

/// Write a struck-resonator test sound to a WAV file.
#[derive(Args)]
pub struct GenerateArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Partial as freq:amp:rate (Hz, linear amplitude, decay per second); repeatable
    #[arg(long = "partial", value_parser = parse_partial, required = true)]
    pub partials: Vec<PartialArg>,

    /// Total duration in seconds
    #[arg(long, default_value = "1.0")]
    pub duration: f64,

    /// Silent frames before the strike
    #[arg(long, default_value = "1000")]
    pub lead_in: usize,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    pub sample_rate: u32,

    /// Number of channels; every channel carries the same signal
    #[arg(long, default_value = "1")]
    pub channels: u16,

    /// Bit depth (32 writes float, 16 or 24 writes PCM)
    #[arg(long, default_value = "32")]
    pub bits: u16,
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if !(args.duration.is_finite() && args.duration > 0.0) {
        anyhow::bail!("duration must be positive, got {}", args.duration);
    }
    if args.channels == 0 {
        anyhow::bail!("channel count must be at least 1");
    }

    let frames = (args.duration * f64::from(args.sample_rate)).round() as usize;
    let mono = synthesize(&args.partials, f64::from(args.sample_rate), frames, args.lead_in);

    let channels = usize::from(args.channels);
    let samples: Vec<f32> = mono
        .iter()
        .flat_map(|&s| std::iter::repeat_n(s, channels))
        .collect();

    let spec = WavSpec {
        channels: args.channels,
        sample_rate: args.sample_rate,
        bits_per_sample: args.bits,
    };
    write_wav(&args.output, &samples, spec)?;

    println!(
        "Generated {} partial(s), {} frames, strike at frame {} -> {}",
        args.partials.len(),
        frames,
        args.lead_in.min(frames),
        args.output.display()
    );
    Ok(())
}

/// Sum of decaying sines, silent for the first `lead_in` frames.
///
/// Each partial contributes `amp · exp(-rate·t) · sin(2π·freq·t)` with `t`
/// measured from the end of the lead-in.
fn synthesize(
    partials: &[PartialArg],
    sample_rate: f64,
    frames: usize,
    lead_in: usize,
) -> Vec<f32> {
    (0..frames)
        .map(|n| {
            let Some(k) = n.checked_sub(lead_in) else {
                return 0.0;
            };
            let t = k as f64 / sample_rate;
            partials
                .iter()
                .map(|p| {
                    p.amplitude
                        * (-p.decay_rate * t).exp()
                        * (2.0 * PI * p.frequency_hz * t).sin()
                })
                .sum::<f64>() as f32
        })
        .collect()
}
