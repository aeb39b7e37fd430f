//! Read access to interleaved sample storage.
//!
//! The analyzer never owns audio. It borrows a [`FrameView`] for the duration
//! of one call through [`SampleStore::read`], which acquires whatever lock the
//! store needs, runs the analysis closure, and releases the lock on every exit
//! path, including early errors.

use std::sync::{Arc, RwLock, TryLockError};

use crate::error::{Error, Result};

/// Borrowed, read-only view of interleaved samples.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    samples: &'a [f32],
    channels: usize,
    sample_rate: f64,
}

impl<'a> FrameView<'a> {
    /// Wrap interleaved `samples` holding `channels` channels.
    ///
    /// A trailing partial frame is ignored. `channels` must be at least one.
    pub fn new(samples: &'a [f32], channels: usize, sample_rate: f64) -> Self {
        debug_assert!(channels >= 1);
        Self {
            samples,
            channels: channels.max(1),
            sample_rate,
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of complete frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Sample at `frame` on `channel`, or `None` when out of bounds.
    pub fn sample(&self, frame: usize, channel: usize) -> Option<f32> {
        if channel >= self.channels || frame >= self.frames() {
            return None;
        }
        self.samples.get(frame * self.channels + channel).copied()
    }

    /// Copy `out.len()` consecutive frames of `channel`, starting at `offset`.
    ///
    /// Fails with [`Error::OutOfRange`] instead of reading past the last frame.
    pub fn copy_channel(&self, channel: usize, offset: usize, out: &mut [f64]) -> Result<()> {
        let length = out.len();
        let frames = self.frames();
        if offset.checked_add(length).is_none_or(|end| end > frames) {
            return Err(Error::OutOfRange {
                offset,
                length,
                frames,
            });
        }
        let channel = channel.min(self.channels - 1);

        let start = offset * self.channels + channel;
        for (dst, src) in out
            .iter_mut()
            .zip(self.samples[start..].iter().step_by(self.channels))
        {
            *dst = f64::from(*src);
        }
        Ok(())
    }
}

/// A source of interleaved samples with scoped, fallible read access.
pub trait SampleStore {
    /// Acquire read access, run `f` on the view, and release access.
    ///
    /// Fails with [`Error::BufferUnavailable`] without calling `f` when the
    /// samples cannot be acquired.
    fn read<R>(&self, f: impl FnOnce(&FrameView<'_>) -> Result<R>) -> Result<R>;
}

/// Owned interleaved sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct InterleavedBuffer {
    samples: Vec<f32>,
    channels: usize,
    sample_rate: f64,
}

impl InterleavedBuffer {
    /// Create a buffer from interleaved samples.
    ///
    /// A trailing partial frame is dropped.
    pub fn new(mut samples: Vec<f32>, channels: usize, sample_rate: f64) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidConfiguration(
                "channel count must be at least 1".into(),
            ));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }
        samples.truncate(samples.len() - samples.len() % channels);
        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    /// Create a single-channel buffer.
    pub fn from_mono(samples: Vec<f32>, sample_rate: f64) -> Result<Self> {
        Self::new(samples, 1, sample_rate)
    }

    /// Create a silent buffer of `frames` frames.
    pub fn silent(frames: usize, channels: usize, sample_rate: f64) -> Result<Self> {
        Self::new(vec![0.0; frames * channels.max(1)], channels, sample_rate)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Mutable interleaved samples.
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Borrow as a [`FrameView`].
    pub fn view(&self) -> FrameView<'_> {
        FrameView::new(&self.samples, self.channels, self.sample_rate)
    }
}

impl SampleStore for InterleavedBuffer {
    fn read<R>(&self, f: impl FnOnce(&FrameView<'_>) -> Result<R>) -> Result<R> {
        f(&self.view())
    }
}

impl<S: SampleStore> SampleStore for RwLock<S> {
    fn read<R>(&self, f: impl FnOnce(&FrameView<'_>) -> Result<R>) -> Result<R> {
        let guard = match self.try_read() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                return Err(Error::BufferUnavailable(
                    "buffer is locked for writing".into(),
                ));
            }
            Err(TryLockError::Poisoned(_)) => {
                return Err(Error::BufferUnavailable("buffer lock is poisoned".into()));
            }
        };
        guard.read(f)
    }
}

impl<S: SampleStore> SampleStore for Option<S> {
    fn read<R>(&self, f: impl FnOnce(&FrameView<'_>) -> Result<R>) -> Result<R> {
        match self {
            Some(store) => store.read(f),
            None => Err(Error::BufferUnavailable("no buffer set".into())),
        }
    }
}

impl<S: SampleStore> SampleStore for Arc<S> {
    fn read<R>(&self, f: impl FnOnce(&FrameView<'_>) -> Result<R>) -> Result<R> {
        self.as_ref().read(f)
    }
}
