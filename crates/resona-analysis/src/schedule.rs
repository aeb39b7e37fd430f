//! Placement of the decay slices between onset and terminal cursor.

use crate::error::{Error, Result};
use crate::transform::NUM_SLICES;

/// Evenly spaced slice offsets from `onset` to `terminal`.
///
/// The step is `(terminal - onset) / 4` with integer division, so the last
/// offset lands on `terminal` only when the span divides evenly. Spans shorter
/// than four frames give a zero step and every slice aliases `onset`.
pub fn slice_offsets(onset: usize, terminal: usize) -> Result<[usize; NUM_SLICES]> {
    if onset > terminal {
        return Err(Error::InvalidRange {
            start: onset,
            end: terminal,
        });
    }
    let step = (terminal - onset) / (NUM_SLICES - 1);
    Ok(std::array::from_fn(|k| onset + k * step))
}

/// Offsets of each slice relative to the first, as fit abscissae.
pub fn relative_offsets(offsets: &[usize; NUM_SLICES]) -> [f64; NUM_SLICES] {
    let origin = offsets[0];
    offsets.map(|o| o.saturating_sub(origin) as f64)
}
