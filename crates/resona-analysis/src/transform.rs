//! Transform slots and the engine that owns them.
//!
//! Every analysis window lives in an [`AnalysisSlice`], which exclusively owns
//! a [`TransformSlot`]: the real input buffer, the complex output buffer, and
//! the forward real-to-complex plan sized for them. Slots are never resized in
//! place. Changing the transform length builds a complete replacement
//! [`TransformEngine`] and swaps it in, so a plan can never outlive or
//! mismatch its buffers and a failed reconfiguration changes nothing.

use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;

use crate::error::{Error, Result};
use crate::store::FrameView;
use crate::window::Window;

/// Number of analysis slices used for decay fitting.
pub const NUM_SLICES: usize = 5;

/// Default transform length.
pub const DEFAULT_TRANSFORM_LENGTH: usize = 4096;

/// Check that `length` is a usable transform length.
///
/// Lengths must be powers of two of at least 4; anything shorter has no
/// interior half-spectrum bin to report as a peak.
pub fn validate_transform_length(length: usize) -> Result<()> {
    if length == 0 || !length.is_power_of_two() {
        return Err(Error::InvalidConfiguration(format!(
            "transform length must be a positive power of two, got {length}"
        )));
    }
    if length < 4 {
        return Err(Error::InvalidConfiguration(format!(
            "transform length must be at least 4, got {length}"
        )));
    }
    Ok(())
}

/// Buffers and plan for one forward real-to-complex transform.
pub struct TransformSlot {
    plan: Arc<dyn RealToComplex<f64>>,
    input: Vec<f64>,
    work: Vec<f64>,
    spectrum: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl TransformSlot {
    fn new(plan: Arc<dyn RealToComplex<f64>>) -> Self {
        Self {
            input: plan.make_input_vec(),
            work: plan.make_input_vec(),
            spectrum: plan.make_output_vec(),
            scratch: plan.make_scratch_vec(),
            plan,
        }
    }

    /// Transform length.
    pub fn len(&self) -> usize {
        self.plan.len()
    }

    /// Always `false`; slots are at least four samples long.
    pub fn is_empty(&self) -> bool {
        self.plan.len() == 0
    }

    /// Time-domain input.
    pub fn input(&self) -> &[f64] {
        &self.input
    }

    /// Complex half spectrum, `len()/2 + 1` bins.
    pub fn spectrum(&self) -> &[Complex<f64>] {
        &self.spectrum
    }

    /// Run the forward transform over the current input.
    ///
    /// The input is preserved; the transform consumes a working copy.
    pub fn execute(&mut self) -> Result<()> {
        self.work.copy_from_slice(&self.input);
        self.plan
            .process_with_scratch(&mut self.work, &mut self.spectrum, &mut self.scratch)?;
        Ok(())
    }
}

impl std::fmt::Debug for TransformSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformSlot")
            .field("len", &self.len())
            .field("bins", &self.spectrum.len())
            .finish_non_exhaustive()
    }
}

/// One short-time analysis window: offset, windowed samples, and spectrum.
#[derive(Debug)]
pub struct AnalysisSlice {
    offset: usize,
    slot: TransformSlot,
    magnitude: Vec<f64>,
    phase: Vec<f64>,
    sum_magnitude: f64,
    peak_magnitude: f64,
}

impl AnalysisSlice {
    fn new(plan: Arc<dyn RealToComplex<f64>>) -> Self {
        let slot = TransformSlot::new(plan);
        let bins = slot.spectrum.len();
        Self {
            offset: 0,
            slot,
            magnitude: vec![0.0; bins],
            phase: vec![0.0; bins],
            sum_magnitude: 0.0,
            peak_magnitude: 0.0,
        }
    }

    /// First source frame of the most recent capture.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Transform length.
    pub fn transform_length(&self) -> usize {
        self.slot.len()
    }

    /// Windowed time-domain samples.
    pub fn time_samples(&self) -> &[f64] {
        self.slot.input()
    }

    /// Complex half spectrum.
    pub fn spectrum(&self) -> &[Complex<f64>] {
        self.slot.spectrum()
    }

    /// Magnitude of each bin.
    pub fn magnitude(&self) -> &[f64] {
        &self.magnitude
    }

    /// Phase of each bin in radians.
    pub fn phase(&self) -> &[f64] {
        &self.phase
    }

    /// Sum of all bin magnitudes.
    pub fn sum_magnitude(&self) -> f64 {
        self.sum_magnitude
    }

    /// Largest bin magnitude.
    pub fn peak_magnitude(&self) -> f64 {
        self.peak_magnitude
    }

    /// Extract, window, and transform the frame starting at `offset`.
    ///
    /// On error the slice keeps whatever it held before the call.
    fn capture(
        &mut self,
        view: &FrameView<'_>,
        channel: usize,
        offset: usize,
        window: &Window,
    ) -> Result<()> {
        view.copy_channel(channel, offset, &mut self.slot.input)?;
        window.apply(&mut self.slot.input);
        self.slot.execute()?;
        self.offset = offset;

        self.sum_magnitude = 0.0;
        self.peak_magnitude = 0.0;
        for ((c, mag), phase) in self
            .slot
            .spectrum
            .iter()
            .zip(self.magnitude.iter_mut())
            .zip(self.phase.iter_mut())
        {
            *mag = c.norm();
            *phase = c.arg();
            self.sum_magnitude += *mag;
            self.peak_magnitude = self.peak_magnitude.max(*mag);
        }
        Ok(())
    }
}

/// Owner of the window, the primary slice, and the five decay slices.
#[derive(Debug)]
pub struct TransformEngine {
    length: usize,
    window: Window,
    primary: AnalysisSlice,
    slices: [AnalysisSlice; NUM_SLICES],
}

impl TransformEngine {
    /// Plan transforms and allocate every buffer for `length`.
    pub fn new(length: usize) -> Result<Self> {
        validate_transform_length(length)?;

        let mut planner = RealFftPlanner::<f64>::new();
        let plan = planner.plan_fft_forward(length);

        Ok(Self {
            length,
            window: Window::new(length),
            primary: AnalysisSlice::new(Arc::clone(&plan)),
            slices: std::array::from_fn(|_| AnalysisSlice::new(Arc::clone(&plan))),
        })
    }

    /// Rebuild for a new transform length.
    ///
    /// The replacement is fully built before it is swapped in; an invalid
    /// length leaves the engine untouched. Same length is a no-op.
    pub fn configure(&mut self, length: usize) -> Result<()> {
        if length == self.length {
            return Ok(());
        }
        let rebuilt = Self::new(length)?;
        tracing::info!(from = self.length, to = length, "transform length changed");
        *self = rebuilt;
        Ok(())
    }

    /// Transform length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of spectrum bins (`length/2 + 1`).
    pub fn num_bins(&self) -> usize {
        self.length / 2 + 1
    }

    /// Width of one bin in Hz.
    pub fn bin_width(&self, sample_rate: f64) -> f64 {
        sample_rate / self.length as f64
    }

    /// Current taper.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Slice used by single-cursor analysis.
    pub fn primary(&self) -> &AnalysisSlice {
        &self.primary
    }

    /// The five decay slices, in capture order.
    pub fn slices(&self) -> &[AnalysisSlice; NUM_SLICES] {
        &self.slices
    }

    /// Capture the primary slice at `offset`.
    pub fn capture_primary(
        &mut self,
        view: &FrameView<'_>,
        channel: usize,
        offset: usize,
    ) -> Result<&AnalysisSlice> {
        self.primary.capture(view, channel, offset, &self.window)?;
        Ok(&self.primary)
    }

    /// Capture each decay slice at its offset.
    ///
    /// Every window is bounds-checked before anything is transformed, so an
    /// out-of-range schedule leaves all five slices unchanged.
    pub fn capture_slices(
        &mut self,
        view: &FrameView<'_>,
        channel: usize,
        offsets: &[usize; NUM_SLICES],
    ) -> Result<&[AnalysisSlice; NUM_SLICES]> {
        let frames = view.frames();
        if let Some(&offset) = offsets
            .iter()
            .find(|&&o| o.checked_add(self.length).is_none_or(|end| end > frames))
        {
            return Err(Error::OutOfRange {
                offset,
                length: self.length,
                frames,
            });
        }

        for (slice, &offset) in self.slices.iter_mut().zip(offsets) {
            slice.capture(view, channel, offset, &self.window)?;
        }
        Ok(&self.slices)
    }
}
