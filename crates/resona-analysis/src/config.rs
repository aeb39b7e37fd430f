//! Analysis configuration and its TOML file format.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::decay::DEFAULT_BIAS_WEIGHT;
use crate::error::{ConfigError, Error, Result};
use crate::peaks::DEFAULT_THRESHOLD_DB;
use crate::transform::{DEFAULT_TRANSFORM_LENGTH, validate_transform_length};

/// Default floor for reported decay rates, per second.
pub const DEFAULT_DECAY_FLOOR: f64 = 2.0;

/// Decay rate reported for partials whose fit was not finite.
pub const DEFAULT_FALLBACK_DECAY: f64 = 10.0;

/// Settings for a [`ResonantAnalyzer`](crate::ResonantAnalyzer).
///
/// # TOML Format
///
/// Every field is optional:
///
/// ```toml
/// transform_length = 4096
/// threshold_db = -32.0
/// channel = 0
/// bias_weight = 10.0
/// decay_floor = 2.0
/// fallback_decay = 10.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// FFT length in frames; a power of two of at least 4.
    pub transform_length: usize,

    /// Peak acceptance threshold in dB relative to the loudest bin (≤ 0).
    pub threshold_db: f64,

    /// Zero-based channel to analyze; clamped to the buffer's channels.
    pub channel: usize,

    /// Weight of the first and last slice in the decay fit.
    pub bias_weight: f64,

    /// Smallest decay rate reported, per second.
    pub decay_floor: f64,

    /// Decay rate substituted when a fit is not finite.
    pub fallback_decay: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            transform_length: DEFAULT_TRANSFORM_LENGTH,
            threshold_db: DEFAULT_THRESHOLD_DB,
            channel: 0,
            bias_weight: DEFAULT_BIAS_WEIGHT,
            decay_floor: DEFAULT_DECAY_FLOOR,
            fallback_decay: DEFAULT_FALLBACK_DECAY,
        }
    }
}

impl AnalysisConfig {
    /// Set the transform length.
    pub fn with_transform_length(mut self, length: usize) -> Self {
        self.transform_length = length;
        self
    }

    /// Set the peak threshold.
    pub fn with_threshold_db(mut self, db: f64) -> Self {
        self.threshold_db = db;
        self
    }

    /// Set the analyzed channel.
    pub fn with_channel(mut self, channel: usize) -> Self {
        self.channel = channel;
        self
    }

    /// Set the endpoint bias weight.
    pub fn with_bias_weight(mut self, weight: f64) -> Self {
        self.bias_weight = weight;
        self
    }

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        validate_transform_length(self.transform_length)?;
        validate_threshold(self.threshold_db)?;
        if !(self.bias_weight.is_finite() && self.bias_weight > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "bias weight must be positive, got {}",
                self.bias_weight
            )));
        }
        if !(self.decay_floor.is_finite() && self.decay_floor >= 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "decay floor must be non-negative, got {}",
                self.decay_floor
            )));
        }
        if !(self.fallback_decay.is_finite() && self.fallback_decay >= 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "fallback decay must be non-negative, got {}",
                self.fallback_decay
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(s: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> std::result::Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Save as a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> std::result::Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }
}

/// Check a peak threshold: finite and not above 0 dB.
pub fn validate_threshold(db: f64) -> Result<()> {
    if db.is_finite() && db <= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration(format!(
            "threshold must be a non-positive dB value relative to the peak, got {db}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.transform_length, 4096);
        assert_eq!(config.threshold_db, -32.0);
        assert_eq!(config.channel, 0);
        assert_eq!(config.bias_weight, 10.0);
        assert_eq!(config.decay_floor, 2.0);
        assert_eq!(config.fallback_decay, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AnalysisConfig::from_toml("transform_length = 1024\nchannel = 1\n").unwrap();
        assert_eq!(config.transform_length, 1024);
        assert_eq!(config.channel, 1);
        assert_eq!(config.threshold_db, -32.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AnalysisConfig::from_toml("transform_length = 3000").is_err());
        assert!(AnalysisConfig::from_toml("threshold_db = 6.0").is_err());
        assert!(AnalysisConfig::from_toml("bias_weight = 0.0").is_err());
        assert!(AnalysisConfig::from_toml("decay_floor = -1.0").is_err());
        assert!(matches!(
            AnalysisConfig::from_toml("transform_length = \"big\""),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_threshold_validation() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(-90.0).is_ok());
        assert!(validate_threshold(0.1).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
        assert!(validate_threshold(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let config = AnalysisConfig::default()
            .with_transform_length(2048)
            .with_threshold_db(-40.0)
            .with_channel(1)
            .with_bias_weight(5.0);

        let file = NamedTempFile::new().unwrap();
        config.save(file.path()).unwrap();
        let loaded = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = AnalysisConfig::load("/nonexistent/resona.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
