//! Analysis demo: point and region analysis of a synthetic bell strike.
//!
//! Run with: cargo run -p resona-analysis --example analysis_demo

use resona_analysis::{AnalysisConfig, InterleavedBuffer, ResonantAnalyzer};
use std::f64::consts::PI;

fn main() -> resona_analysis::Result<()> {
    let sample_rate = 48000.0;

    // --- Synthesize a strike: silence, then three decaying partials ---
    let partials = [(523.0, 1.0, 6.0), (1310.0, 0.6, 15.0), (2687.0, 0.3, 40.0)];
    let attack = 2000;
    let samples: Vec<f32> = (0..96000)
        .map(|n| {
            if n < attack {
                return 0.0;
            }
            let t = (n - attack) as f64 / sample_rate;
            partials
                .iter()
                .map(|&(f, a, r)| a * (-r * t).exp() * (2.0 * PI * f * t).sin())
                .sum::<f64>() as f32
        })
        .collect();
    let buffer = InterleavedBuffer::from_mono(samples, sample_rate)?;

    let mut analyzer = ResonantAnalyzer::new(AnalysisConfig::default())?;

    // --- Point analysis ---
    println!("=== Spectral peaks at frame 4000 ===\n");
    for peak in analyzer.analyze_point(&buffer, 4000)? {
        println!(
            "  {:>8.1} Hz  amp {:.3}",
            peak.frequency_hz, peak.amplitude
        );
    }

    // --- Region analysis ---
    println!("\n=== Resonant model of frames 0..40000 ===\n");
    let model = analyzer.analyze_region(&buffer, 0, 40000)?;
    println!("  onset at frame {}", model.onset);
    println!("  slices at {:?}\n", model.offsets);
    println!("  {:>10}  {:>8}  {:>10}", "freq (Hz)", "amp", "decay (/s)");
    for p in &model.partials {
        println!(
            "  {:>10.1}  {:>8.3}  {:>10.2}",
            p.frequency_hz, p.amplitude, p.decay_rate
        );
    }

    println!("\n  expected:");
    for (f, a, r) in partials {
        println!("  {f:>10.1}  {a:>8.3}  {r:>10.2}");
    }

    Ok(())
}
