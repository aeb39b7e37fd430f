//! Fractional-bin frequency refinement.

/// Log-parabolic offset of the true peak from integer bin `bin`.
///
/// Fits a parabola through the natural-log magnitudes of `bin - 1`, `bin`, and
/// `bin + 1` and returns the offset of its vertex:
///
/// ```text
/// δ = ln(m[i+1] / m[i-1]) / (2·ln(m[i]² / (m[i-1]·m[i+1])))
/// ```
///
/// For a strict local maximum with non-zero neighbours the result lies in
/// `(-0.5, 0.5)`. A zero neighbour, a degenerate curvature, or a bin without
/// both neighbours yields a non-finite value; callers decide the fallback.
pub fn fractional_offset(magnitude: &[f64], bin: usize) -> f64 {
    if bin == 0 || bin + 1 >= magnitude.len() {
        return f64::NAN;
    }
    let left = magnitude[bin - 1];
    let center = magnitude[bin];
    let right = magnitude[bin + 1];

    (right / left).ln() / (2.0 * (center * center / (left * right)).ln())
}

/// Continuous bin position of the peak at `bin`, possibly non-finite.
pub fn refined_bin(magnitude: &[f64], bin: usize) -> f64 {
    bin as f64 + fractional_offset(magnitude, bin)
}

/// Frequency in Hz of the peak at `bin`.
///
/// Falls back to the integer bin's frequency when the refinement is not
/// finite, so the result is always finite for finite inputs.
pub fn refined_frequency(magnitude: &[f64], bin: usize, bin_width: f64) -> f64 {
    let position = refined_bin(magnitude, bin);
    if position.is_finite() {
        position * bin_width
    } else {
        tracing::warn!(bin, "fractional-bin refinement not finite, using bin centre");
        bin as f64 * bin_width
    }
}
