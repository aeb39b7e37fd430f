//! Squared-sine tapering window.

use std::f64::consts::PI;

/// Precomputed squared-sine (periodic Hann) window.
///
/// Coefficients are `w[i] = sin(π·i/N)²` for `i` in `[0, N)`. The window
/// starts at exactly zero and peaks at one in the middle of the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    coeffs: Vec<f64>,
}

impl Window {
    /// Generate a window of `size` coefficients.
    pub fn new(size: usize) -> Self {
        let n = size as f64;
        let coeffs = (0..size)
            .map(|i| {
                let s = (PI * i as f64 / n).sin();
                s * s
            })
            .collect();
        Self { coeffs }
    }

    /// Number of coefficients.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Returns `true` for a zero-length window.
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Window coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Multiply `buffer` in place by the window.
    ///
    /// Only the overlapping prefix is touched when lengths differ.
    pub fn apply(&self, buffer: &mut [f64]) {
        for (sample, &w) in buffer.iter_mut().zip(&self.coeffs) {
            *sample *= w;
        }
    }
}
