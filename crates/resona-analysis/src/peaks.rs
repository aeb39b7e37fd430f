//! Spectral peak picking.

/// Default acceptance threshold in dB relative to the spectrum maximum.
pub const DEFAULT_THRESHOLD_DB: f64 = -32.0;

/// Find local maxima in a half spectrum that lie within `threshold_db` of the
/// spectrum's maximum.
///
/// `magnitude` holds `N/2 + 1` bins (DC through Nyquist). Only bins of the
/// half spectrum `[0, N/2)` that have both neighbours inside it are
/// considered, so bin 0 and bin `N/2 - 1` are never reported. A bin is a peak
/// when it is strictly greater than both neighbours and
/// `20·log10(mag / max) > threshold_db`.
///
/// Returns bin indices in ascending order. A silent spectrum yields no peaks.
pub fn find_peaks(magnitude: &[f64], threshold_db: f64) -> Vec<usize> {
    let max = magnitude.iter().copied().fold(0.0_f64, f64::max);
    if !(max > 0.0 && max.is_finite()) {
        return Vec::new();
    }

    let half = magnitude.len().saturating_sub(1);
    if half < 3 {
        return Vec::new();
    }

    (1..half - 1)
        .filter(|&i| {
            let mag = magnitude[i];
            mag > magnitude[i - 1] && mag > magnitude[i + 1] && ratio_db(mag, max) > threshold_db
        })
        .collect()
}

/// Level of `magnitude` relative to `reference` in dB.
pub fn ratio_db(magnitude: f64, reference: f64) -> f64 {
    20.0 * (magnitude / reference).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_peak() {
        let mag = [0.0, 1.0, 5.0, 1.0, 0.5, 0.0];
        assert_eq!(find_peaks(&mag, -32.0), vec![2]);
    }

    #[test]
    fn test_threshold_rejects_quiet_peaks() {
        // Second peak is 40 dB down
        let mag = [0.0, 100.0, 1.0, 2.0, 1.0, 0.5, 0.0];
        assert_eq!(find_peaks(&mag, -32.0), vec![1]);
        assert_eq!(find_peaks(&mag, -60.0), vec![1, 3]);
    }

    #[test]
    fn test_plateau_is_not_a_peak() {
        let mag = [0.0, 2.0, 2.0, 1.0, 0.0];
        assert!(find_peaks(&mag, -90.0).is_empty());
    }

    #[test]
    fn test_edges_never_reported() {
        // Maximum at DC and at the last half-spectrum bin
        let mag = [10.0, 1.0, 2.0, 1.0, 9.0, 0.0];
        assert_eq!(find_peaks(&mag, -90.0), vec![2]);
    }

    #[test]
    fn test_nyquist_counts_toward_maximum_only() {
        // Bin 5 (Nyquist) sets the reference but is never a candidate
        let mag = [0.0, 0.0, 1.0, 0.0, 0.0, 100.0];
        assert!(find_peaks(&mag, -20.0).is_empty());
        assert_eq!(find_peaks(&mag, -50.0), vec![2]);
    }

    #[test]
    fn test_silence_yields_nothing() {
        assert!(find_peaks(&[0.0; 2049], -32.0).is_empty());
    }

    #[test]
    fn test_tiny_spectra() {
        assert!(find_peaks(&[], -32.0).is_empty());
        assert!(find_peaks(&[1.0, 2.0, 1.0], -32.0).is_empty());
    }

    #[test]
    fn test_ratio_db() {
        assert!((ratio_db(1.0, 10.0) + 20.0).abs() < 1e-12);
        assert_eq!(ratio_db(3.0, 3.0), 0.0);
    }
}
