//! Display WAV file metadata.

use clap::Args;
use resona_io::read_wav_info;

/// Display WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;

    println!("File:        {}", args.file.display());
    println!("Format:      {} {}-bit", info.format, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:   {}", format_bytes(file_size));

    // Region analysis needs one frame past the window
    match largest_region_length(info.num_frames) {
        Some(length) => println!(
            "Max FFT:     {} ({:.2} Hz/bin)",
            length,
            f64::from(info.sample_rate) / length as f64
        ),
        None => println!("Max FFT:     file too short for analysis"),
    }

    Ok(())
}

/// Largest usable transform length for region analysis of `frames` frames.
fn largest_region_length(frames: u64) -> Option<u64> {
    let available = frames.checked_sub(1)?;
    if available < 4 {
        return None;
    }
    Some(1 << available.ilog2())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
