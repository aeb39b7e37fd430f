//! Resonant model types and assembly.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::decay::{ExpFit, fit_peak};
use crate::refine::refined_frequency;
use crate::transform::{AnalysisSlice, NUM_SLICES};

/// A refined spectral peak from single-cursor analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralPeak {
    /// Refined frequency in Hz.
    pub frequency_hz: f64,
    /// Peak magnitude relative to the loudest bin (0..=1).
    pub amplitude: f64,
}

/// One decaying sinusoidal component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Partial {
    /// Refined frequency in Hz.
    pub frequency_hz: f64,
    /// Fitted initial amplitude relative to the loudest bin of the first slice.
    pub amplitude: f64,
    /// Exponential decay rate per second, always positive.
    pub decay_rate: f64,
}

/// Output of region analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonantModel {
    /// Frame of the detected attack.
    pub onset: usize,
    /// First frame of each analysis slice.
    pub offsets: [usize; NUM_SLICES],
    /// Partials in ascending frequency-bin order.
    pub partials: Vec<Partial>,
}

impl ResonantModel {
    /// Number of partials.
    pub fn len(&self) -> usize {
        self.partials.len()
    }

    /// Returns `true` when no partial was found.
    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    /// Flat `frequency, amplitude, decay_rate` triples.
    pub fn to_flat(&self) -> Vec<f64> {
        self.partials
            .iter()
            .flat_map(|p| [p.frequency_hz, p.amplitude, p.decay_rate])
            .collect()
    }
}

/// Flat `frequency, amplitude` pairs.
pub fn flatten_peaks(peaks: &[SpectralPeak]) -> Vec<f64> {
    peaks
        .iter()
        .flat_map(|p| [p.frequency_hz, p.amplitude])
        .collect()
}

/// Refine each peak of `slice` into a [`SpectralPeak`].
pub fn assemble_peaks(slice: &AnalysisSlice, peaks: &[usize], bin_width: f64) -> Vec<SpectralPeak> {
    let magnitude = slice.magnitude();
    let reference = slice.peak_magnitude();
    peaks
        .iter()
        .map(|&bin| SpectralPeak {
            frequency_hz: refined_frequency(magnitude, bin, bin_width),
            amplitude: magnitude[bin] / reference,
        })
        .collect()
}

/// Build a [`Partial`] for each peak found in the first slice.
pub fn assemble_partials(
    slices: &[AnalysisSlice; NUM_SLICES],
    peaks: &[usize],
    sample_rate: f64,
    config: &AnalysisConfig,
) -> Vec<Partial> {
    let first = &slices[0];
    let bin_width = sample_rate / first.transform_length() as f64;

    peaks
        .iter()
        .map(|&bin| {
            let fit = fit_peak(slices, bin, config.bias_weight);
            let frequency_hz = refined_frequency(first.magnitude(), bin, bin_width);
            sanitize(
                frequency_hz,
                fit,
                first.peak_magnitude(),
                sample_rate,
                config,
            )
        })
        .collect()
}

/// Normalize a fit into a [`Partial`], replacing non-finite results.
///
/// The decay rate is reported as a magnitude, floored at
/// `config.decay_floor`. A non-finite amplitude or rate yields a silent
/// partial with `config.fallback_decay`.
pub fn sanitize(
    frequency_hz: f64,
    fit: ExpFit,
    reference_magnitude: f64,
    sample_rate: f64,
    config: &AnalysisConfig,
) -> Partial {
    let amplitude = fit.amplitude / reference_magnitude;
    let decay_rate = (fit.rate * sample_rate).abs().max(config.decay_floor);

    if amplitude.is_finite() && decay_rate.is_finite() {
        Partial {
            frequency_hz,
            amplitude,
            decay_rate,
        }
    } else {
        tracing::warn!(
            frequency_hz,
            amplitude,
            decay_rate,
            "non-finite decay fit, substituting silent partial"
        );
        Partial {
            frequency_hz,
            amplitude: 0.0,
            decay_rate: config.fallback_decay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(amplitude: f64, rate: f64) -> ExpFit {
        ExpFit { amplitude, rate }
    }

    #[test]
    fn test_normalizes_and_scales_rate() {
        let config = AnalysisConfig::default();
        let p = sanitize(440.0, fit(50.0, -0.001), 100.0, 48000.0, &config);
        assert_eq!(p.frequency_hz, 440.0);
        assert_eq!(p.amplitude, 0.5);
        assert!((p.decay_rate - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_is_positive_and_floored() {
        let config = AnalysisConfig::default();
        let growing = sanitize(100.0, fit(1.0, 0.001), 1.0, 48000.0, &config);
        assert!((growing.decay_rate - 48.0).abs() < 1e-9);

        let flat = sanitize(100.0, fit(1.0, 1e-7), 1.0, 48000.0, &config);
        assert_eq!(flat.decay_rate, 2.0);
    }

    #[test]
    fn test_non_finite_amplitude_falls_back() {
        let config = AnalysisConfig::default();
        let p = sanitize(100.0, fit(f64::INFINITY, -0.001), 1.0, 48000.0, &config);
        assert_eq!(p.amplitude, 0.0);
        assert_eq!(p.decay_rate, 10.0);

        let nan = sanitize(100.0, fit(f64::NAN, f64::NAN), 1.0, 48000.0, &config);
        assert_eq!(nan.amplitude, 0.0);
        assert_eq!(nan.decay_rate, 10.0);
    }

    #[test]
    fn test_zero_reference_falls_back() {
        let config = AnalysisConfig::default();
        let p = sanitize(100.0, fit(0.0, -0.001), 0.0, 48000.0, &config);
        assert_eq!(p.amplitude, 0.0);
        assert_eq!(p.decay_rate, 10.0);
    }

    #[test]
    fn test_flat_layouts() {
        let model = ResonantModel {
            onset: 12,
            offsets: [12; NUM_SLICES],
            partials: vec![
                Partial {
                    frequency_hz: 100.0,
                    amplitude: 1.0,
                    decay_rate: 3.0,
                },
                Partial {
                    frequency_hz: 200.0,
                    amplitude: 0.5,
                    decay_rate: 6.0,
                },
            ],
        };
        assert_eq!(model.to_flat(), vec![100.0, 1.0, 3.0, 200.0, 0.5, 6.0]);

        let peaks = [SpectralPeak {
            frequency_hz: 440.0,
            amplitude: 1.0,
        }];
        assert_eq!(flatten_peaks(&peaks), vec![440.0, 1.0]);
    }
}
