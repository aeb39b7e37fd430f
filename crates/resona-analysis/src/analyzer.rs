//! The analysis context: configuration, transform buffers, and last results.

use crate::config::{AnalysisConfig, validate_threshold};
use crate::error::{Error, Result};
use crate::model::{ResonantModel, SpectralPeak, assemble_partials, assemble_peaks};
use crate::onset::locate_onset;
use crate::peaks::find_peaks;
use crate::schedule::slice_offsets;
use crate::store::SampleStore;
use crate::transform::{AnalysisSlice, NUM_SLICES, TransformEngine};
use crate::window::Window;

/// Extracts spectral peaks and resonant models from a [`SampleStore`].
///
/// The analyzer owns every transform buffer. All operations take `&mut self`,
/// so one analysis or reconfiguration runs at a time and none can observe a
/// half-rebuilt engine.
///
/// # Example
///
/// ```rust,ignore
/// use resona_analysis::{AnalysisConfig, InterleavedBuffer, ResonantAnalyzer};
///
/// let buffer = InterleavedBuffer::from_mono(samples, 48000.0)?;
/// let mut analyzer = ResonantAnalyzer::new(AnalysisConfig::default())?;
///
/// let model = analyzer.analyze_region(&buffer, 1000, 5000)?;
/// for p in &model.partials {
///     println!("{:.1} Hz  amp {:.3}  decay {:.1}/s", p.frequency_hz, p.amplitude, p.decay_rate);
/// }
/// ```
#[derive(Debug)]
pub struct ResonantAnalyzer {
    config: AnalysisConfig,
    engine: TransformEngine,
    last_point: Vec<SpectralPeak>,
    last_model: Option<ResonantModel>,
}

impl ResonantAnalyzer {
    /// Validate `config` and allocate buffers and plans for it.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let engine = TransformEngine::new(config.transform_length)?;
        Ok(Self {
            config,
            engine,
            last_point: Vec::new(),
            last_model: None,
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Current transform length.
    pub fn transform_length(&self) -> usize {
        self.engine.length()
    }

    /// Width of one bin in Hz at `sample_rate`.
    pub fn bin_width(&self, sample_rate: f64) -> f64 {
        self.engine.bin_width(sample_rate)
    }

    /// Current taper.
    pub fn window(&self) -> &Window {
        self.engine.window()
    }

    /// Slice captured by the last point analysis.
    pub fn primary(&self) -> &AnalysisSlice {
        self.engine.primary()
    }

    /// Slices captured by the last region analysis.
    pub fn slices(&self) -> &[AnalysisSlice; NUM_SLICES] {
        self.engine.slices()
    }

    /// Result of the last successful point analysis.
    pub fn last_point(&self) -> &[SpectralPeak] {
        &self.last_point
    }

    /// Result of the last successful region analysis.
    pub fn last_model(&self) -> Option<&ResonantModel> {
        self.last_model.as_ref()
    }

    /// Change the transform length, rebuilding every buffer and plan.
    ///
    /// Fails with [`Error::InvalidConfiguration`] for lengths that are not a
    /// power of two of at least 4, leaving the previous length in effect.
    pub fn reconfigure_transform_length(&mut self, length: usize) -> Result<()> {
        self.engine.configure(length)?;
        self.config.transform_length = length;
        Ok(())
    }

    /// Set the peak threshold in dB relative to the loudest bin.
    pub fn set_threshold(&mut self, db: f64) -> Result<()> {
        validate_threshold(db)?;
        self.config.threshold_db = db;
        tracing::debug!(threshold_db = db, "threshold set");
        Ok(())
    }

    /// Select the zero-based channel to analyze.
    ///
    /// Indices past the buffer's last channel are clamped at analysis time.
    pub fn set_channel(&mut self, index: usize) {
        self.config.channel = index;
    }

    /// Refined spectral peaks of the window starting at `cursor`.
    ///
    /// The window must fit inside the buffer; otherwise the call fails with
    /// [`Error::OutOfRange`].
    pub fn analyze_point<S: SampleStore>(
        &mut self,
        store: &S,
        cursor: usize,
    ) -> Result<Vec<SpectralPeak>> {
        let config = &self.config;
        let engine = &mut self.engine;

        let peaks = store.read(|view| {
            let channel = effective_channel(config.channel, view.channels());
            let bin_width = engine.bin_width(view.sample_rate());

            let slice = engine.capture_primary(view, channel, cursor)?;
            let bins = find_peaks(slice.magnitude(), config.threshold_db);
            tracing::debug!(cursor, channel, peaks = bins.len(), "point analysis");
            Ok(assemble_peaks(slice, &bins, bin_width))
        })?;

        self.last_point.clone_from(&peaks);
        Ok(peaks)
    }

    /// Resonant model of the attack/decay event between two cursors.
    ///
    /// Both cursors are clamped into `[0, frames - 1 - N]`. The loudest frame
    /// in `[cursor1, cursor2)` becomes the onset, five slices are spread from
    /// the onset to `cursor2`, and each peak of the first slice is fitted with
    /// an exponential decay across all five.
    pub fn analyze_region<S: SampleStore>(
        &mut self,
        store: &S,
        cursor1: i64,
        cursor2: i64,
    ) -> Result<ResonantModel> {
        let config = &self.config;
        let engine = &mut self.engine;

        let model = store.read(|view| {
            let length = engine.length();
            let frames = view.frames();
            let Some(last) = frames.checked_sub(length + 1) else {
                return Err(Error::OutOfRange {
                    offset: 0,
                    length,
                    frames,
                });
            };

            let start = clamp_cursor(cursor1, last, "cursor1");
            let end = clamp_cursor(cursor2, last, "cursor2");
            if start > end {
                return Err(Error::InvalidRange { start, end });
            }

            let channel = effective_channel(config.channel, view.channels());
            let onset = locate_onset(view, channel, start, end);
            let offsets = slice_offsets(onset.index, end)?;
            tracing::debug!(
                onset = onset.index,
                onset_magnitude = onset.magnitude,
                ?offsets,
                "slice schedule"
            );

            let slices = engine.capture_slices(view, channel, &offsets)?;
            let bins = find_peaks(slices[0].magnitude(), config.threshold_db);
            let partials = assemble_partials(slices, &bins, view.sample_rate(), config);
            tracing::debug!(partials = partials.len(), "region analysis");

            Ok(ResonantModel {
                onset: onset.index,
                offsets,
                partials,
            })
        })?;

        self.last_model = Some(model.clone());
        Ok(model)
    }
}

/// Clamp a signed cursor into `[0, last]`, logging any adjustment.
fn clamp_cursor(cursor: i64, last: usize, name: &str) -> usize {
    let clamped = usize::try_from(cursor).unwrap_or(0).min(last);
    if i64::try_from(clamped).ok() != Some(cursor) {
        tracing::warn!(cursor, clamped, "{name} outside buffer, clamping");
    }
    clamped
}

/// Clamp a requested channel to the buffer's channel count.
fn effective_channel(requested: usize, channels: usize) -> usize {
    let last = channels.saturating_sub(1);
    if requested > last {
        tracing::warn!(requested, using = last, "channel not in buffer, clamping");
        last
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InterleavedBuffer;
    use std::f64::consts::PI;

    fn analyzer(length: usize) -> ResonantAnalyzer {
        ResonantAnalyzer::new(AnalysisConfig::default().with_transform_length(length)).unwrap()
    }

    #[test]
    fn test_clamp_cursor() {
        assert_eq!(clamp_cursor(-5, 100, "c"), 0);
        assert_eq!(clamp_cursor(50, 100, "c"), 50);
        assert_eq!(clamp_cursor(500, 100, "c"), 100);
        assert_eq!(clamp_cursor(i64::MAX, 100, "c"), 100);
    }

    #[test]
    fn test_effective_channel() {
        assert_eq!(effective_channel(0, 1), 0);
        assert_eq!(effective_channel(1, 2), 1);
        assert_eq!(effective_channel(5, 2), 1);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AnalysisConfig::default().with_threshold_db(3.0);
        assert!(matches!(
            ResonantAnalyzer::new(config),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_set_threshold_keeps_old_value_on_error() {
        let mut a = analyzer(256);
        a.set_threshold(-50.0).unwrap();
        assert!(a.set_threshold(1.0).is_err());
        assert_eq!(a.config().threshold_db, -50.0);
    }

    #[test]
    fn test_reconfigure_updates_config() {
        let mut a = analyzer(256);
        a.reconfigure_transform_length(1024).unwrap();
        assert_eq!(a.transform_length(), 1024);
        assert_eq!(a.config().transform_length, 1024);

        assert!(a.reconfigure_transform_length(1000).is_err());
        assert_eq!(a.config().transform_length, 1024);
    }

    #[test]
    fn test_point_records_last_result() {
        let length = 256;
        let samples = (0..1024)
            .map(|i| (2.0 * PI * 20.0 * i as f64 / length as f64).sin() as f32)
            .collect();
        let buffer = InterleavedBuffer::from_mono(samples, 48000.0).unwrap();
        let mut a = analyzer(length);

        let peaks = a.analyze_point(&buffer, 0).unwrap();
        assert_eq!(peaks.len(), 1);
        assert_eq!(a.last_point(), peaks.as_slice());
        assert!((peaks[0].frequency_hz - a.bin_width(48000.0) * 20.0).abs() < 1e-6);
        assert_eq!(peaks[0].amplitude, 1.0);
    }

    #[test]
    fn test_failed_call_keeps_last_result() {
        let buffer = InterleavedBuffer::silent(2048, 1, 48000.0).unwrap();
        let mut a = analyzer(256);
        let model = a.analyze_region(&buffer, 0, 1000).unwrap();

        assert!(a.analyze_region(&buffer, 1000, 0).is_err());
        assert_eq!(a.last_model(), Some(&model));
    }

    #[test]
    fn test_region_needs_one_window_of_runway() {
        let length = 256;
        let mut a = analyzer(length);

        let short = InterleavedBuffer::silent(length, 1, 48000.0).unwrap();
        assert!(matches!(
            a.analyze_region(&short, 0, 0),
            Err(Error::OutOfRange { .. })
        ));

        let exact = InterleavedBuffer::silent(length + 1, 1, 48000.0).unwrap();
        let model = a.analyze_region(&exact, 0, 10).unwrap();
        assert_eq!(model.offsets, [0; NUM_SLICES]);
    }
}
