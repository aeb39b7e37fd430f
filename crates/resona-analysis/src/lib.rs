//! Resona Analysis - resonant model extraction from sampled sounds
//!
//! Given a buffer and two cursors bracketing an attack and its decay, this
//! crate estimates a sparse sinusoidal-plus-decay model of the sound: a list
//! of partials, each with a frequency, an initial amplitude, and an
//! exponential decay rate.
//!
//! - [`window`] - Squared-sine taper
//! - [`transform`] - Transform slots, analysis slices, and the engine that owns them
//! - [`peaks`] - Local-maximum peak picking against a dB threshold
//! - [`refine`] - Log-parabolic fractional-bin frequency refinement
//! - [`onset`] - Attack location by peak absolute amplitude
//! - [`schedule`] - Placement of the five decay slices
//! - [`decay`] - Weighted exponential least-squares fitting
//! - [`model`] - Output types and model assembly
//! - [`store`] - Scoped read access to interleaved samples
//! - [`config`] - Analysis settings and their TOML format
//!
//! ## Pipeline
//!
//! 1. Find the loudest frame between the cursors (the onset).
//! 2. Place five windows from the onset to the second cursor.
//! 3. Window and transform each one.
//! 4. Pick peaks in the first spectrum and refine their frequencies.
//! 5. Fit each peak's magnitude across the five spectra to `A·exp(B·t)`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use resona_analysis::{AnalysisConfig, InterleavedBuffer, ResonantAnalyzer};
//!
//! let buffer = InterleavedBuffer::new(samples, channels, 48000.0)?;
//! let mut analyzer = ResonantAnalyzer::new(AnalysisConfig::default())?;
//!
//! // Single window: (frequency, amplitude) pairs
//! let peaks = analyzer.analyze_point(&buffer, 2048)?;
//!
//! // Attack/decay event: onset plus (frequency, amplitude, decay) triples
//! let model = analyzer.analyze_region(&buffer, 1000, 20000)?;
//! println!("onset at frame {}", model.onset);
//! ```

pub mod analyzer;
pub mod config;
pub mod decay;
pub mod error;
pub mod model;
pub mod onset;
pub mod peaks;
pub mod refine;
pub mod schedule;
pub mod store;
pub mod transform;
pub mod window;

// Re-export main types
pub use analyzer::ResonantAnalyzer;
pub use config::AnalysisConfig;
pub use decay::{ExpFit, exp_fit};
pub use error::{ConfigError, Error, Result};
pub use model::{Partial, ResonantModel, SpectralPeak};
pub use onset::{Onset, locate_onset};
pub use peaks::find_peaks;
pub use store::{FrameView, InterleavedBuffer, SampleStore};
pub use transform::{AnalysisSlice, NUM_SLICES, TransformEngine};
pub use window::Window;
