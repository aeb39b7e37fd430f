//! WAV file I/O for Resona.
//!
//! This crate loads audio files into the interleaved sample buffers that
//! [`resona_analysis`] reads from, and writes synthetic test sounds back out.
//!
//! - **Reading**: [`read_wav`] keeps every channel; [`read_wav_info`] reads
//!   only the header
//! - **Writing**: [`write_wav`] stores interleaved samples as float or PCM
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use resona_analysis::{AnalysisConfig, ResonantAnalyzer};
//! use resona_io::read_wav;
//!
//! let (buffer, spec) = read_wav("strike.wav")?;
//! let mut analyzer = ResonantAnalyzer::new(AnalysisConfig::default())?;
//! let model = analyzer.analyze_region(&buffer, 0, spec.sample_rate as i64)?;
//! ```

mod wav;

pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file's sample format cannot be converted to f32.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The file holds no complete frame.
    #[error("WAV file contains no audio frames")]
    Empty,

    /// The decoded samples could not form an analysis buffer.
    #[error("Invalid buffer: {0}")]
    Buffer(#[from] resona_analysis::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
