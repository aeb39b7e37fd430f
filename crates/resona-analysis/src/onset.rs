//! Attack location by peak absolute amplitude.

use crate::store::FrameView;

/// Loudest frame found in a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onset {
    /// Frame index of the loudest sample.
    pub index: usize,
    /// Absolute amplitude at `index`.
    pub magnitude: f32,
}

/// Scan frames `[start, end)` of `channel` for the largest absolute sample.
///
/// Ties keep the earliest frame. An empty region, or one that starts past the
/// end of the buffer, returns `start` with magnitude zero. Frames beyond the
/// buffer are not scanned.
pub fn locate_onset(view: &FrameView<'_>, channel: usize, start: usize, end: usize) -> Onset {
    let mut onset = Onset {
        index: start,
        magnitude: 0.0,
    };

    for frame in start..end.min(view.frames()) {
        let Some(sample) = view.sample(frame, channel) else {
            break;
        };
        let magnitude = sample.abs();
        if magnitude > onset.magnitude {
            onset = Onset {
                index: frame,
                magnitude,
            };
        }
    }
    onset
}
