//! Weighted exponential least-squares fitting.
//!
//! Fits `y = A·exp(B·x)` by regressing `ln(y)` on `x` with each point weighted
//! by `y` itself (Guo's weighting of Caruana's algorithm), which keeps small,
//! noisy tail values from dominating the fit. The first and last points get an
//! additional bias weight to anchor the ends of the trajectory.

use crate::schedule::relative_offsets;
use crate::transform::{AnalysisSlice, NUM_SLICES};

/// Small constant added to trajectory magnitudes and to the fit determinant.
pub const EPSILON: f64 = 1e-4;

/// Default endpoint bias weight.
pub const DEFAULT_BIAS_WEIGHT: f64 = 10.0;

/// Result of an exponential fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpFit {
    /// Amplitude `A` at `x = 0`.
    pub amplitude: f64,
    /// Rate `B` per unit of `x`; negative for a decay.
    pub rate: f64,
}

/// Fit `y = A·exp(B·x)` to the points `(x[k], y[k])`.
///
/// `y` values must be positive. Points beyond the shorter of the two slices
/// are ignored. The determinant is offset by [`EPSILON`], so coincident `x`
/// values produce `A = 1, B = 0` rather than a division by zero; other
/// degenerate data may still produce non-finite output, which callers must
/// check.
pub fn exp_fit(x: &[f64], y: &[f64], bias_weight: f64) -> ExpFit {
    let n = x.len().min(y.len());

    let mut s_y = 0.0;
    let mut s_xy = 0.0;
    let mut s_x2y = 0.0;
    let mut s_ylny = 0.0;
    let mut s_xylny = 0.0;

    for (k, (&xk, &yk)) in x.iter().zip(y).enumerate() {
        let w = if k == 0 || k == n - 1 { bias_weight } else { 1.0 };
        let wy = w * yk;
        let wylny = wy * yk.ln();

        s_y += wy;
        s_xy += xk * wy;
        s_x2y += xk * xk * wy;
        s_ylny += wylny;
        s_xylny += xk * wylny;
    }

    let den = s_y * s_x2y - s_xy * s_xy + EPSILON;

    ExpFit {
        amplitude: ((s_x2y * s_ylny - s_xy * s_xylny) / den).exp(),
        rate: (s_y * s_xylny - s_xy * s_ylny) / den,
    }
}

/// Fit the decay of `bin` across the analysis slices.
///
/// Abscissae are the slice offsets relative to the first slice, in frames, so
/// the returned rate is per frame.
pub fn fit_peak(slices: &[AnalysisSlice; NUM_SLICES], bin: usize, bias_weight: f64) -> ExpFit {
    let offsets = slices.each_ref().map(AnalysisSlice::offset);
    let x = relative_offsets(&offsets);
    let y = trajectory(slices.iter().map(AnalysisSlice::magnitude), bin);
    exp_fit(&x, &y, bias_weight)
}

/// Amplitude trajectory of `bin` across `magnitudes`, offset by [`EPSILON`].
pub fn trajectory<'a>(magnitudes: impl IntoIterator<Item = &'a [f64]>, bin: usize) -> Vec<f64> {
    magnitudes
        .into_iter()
        .map(|m| m.get(bin).copied().unwrap_or(0.0) + EPSILON)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_known_decay() {
        let x: [f64; 5] = [0.0, 100.0, 200.0, 300.0, 400.0];
        let y: Vec<f64> = x.iter().map(|&v| 5.0 * (-0.01 * v).exp()).collect();

        let fit = exp_fit(&x, &y, DEFAULT_BIAS_WEIGHT);
        assert!((fit.amplitude - 5.0).abs() / 5.0 < 0.01, "A = {}", fit.amplitude);
        assert!((fit.rate + 0.01).abs() / 0.01 < 0.01, "B = {}", fit.rate);
    }

    #[test]
    fn test_recovers_growth() {
        let x: [f64; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|&v| 0.5 * (0.3 * v).exp()).collect();

        let fit = exp_fit(&x, &y, 1.0);
        assert!((fit.amplitude - 0.5).abs() < 1e-3);
        assert!((fit.rate - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_coincident_offsets_stay_finite() {
        let x = [0.0; 5];
        let y = [3.0, 3.0, 3.0, 3.0, 3.0];

        let fit = exp_fit(&x, &y, DEFAULT_BIAS_WEIGHT);
        assert_eq!(fit.amplitude, 1.0);
        assert_eq!(fit.rate, 0.0);
    }

    #[test]
    fn test_bias_pulls_fit_toward_endpoints() {
        // Middle point is an outlier; a heavy bias should nearly ignore it.
        let x = [0.0, 50.0, 100.0];
        let y = [1.0, 2.0, (-1.0_f64).exp()];

        let biased = exp_fit(&x, &y, 1000.0);
        let expected = -1.0 / 100.0;
        assert!((biased.rate - expected).abs() < 1e-4, "B = {}", biased.rate);

        let unbiased = exp_fit(&x, &y, 1.0);
        assert!((unbiased.rate - expected).abs() > (biased.rate - expected).abs());
    }

    #[test]
    fn test_trajectory_adds_epsilon() {
        let a = [0.0, 2.0];
        let b = [0.0, 1.0];
        let t = trajectory([&a[..], &b[..]], 1);
        assert_eq!(t, vec![2.0 + EPSILON, 1.0 + EPSILON]);
    }
}
