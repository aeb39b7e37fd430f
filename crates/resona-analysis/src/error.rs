//! Error types for analysis and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by analysis operations.
///
/// Every error is local to the call that produced it: a failed call leaves
/// the analyzer's configuration and buffers exactly as they were.
#[derive(Debug, Error)]
pub enum Error {
    /// The sample store could not be acquired for reading.
    #[error("sample buffer unavailable: {0}")]
    BufferUnavailable(String),

    /// A configuration value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The cursor pair does not describe a usable region.
    #[error("invalid range: cursor1 ({start}) is after cursor2 ({end})")]
    InvalidRange {
        /// First cursor after clamping.
        start: usize,
        /// Second cursor after clamping.
        end: usize,
    },

    /// An analysis window would read past the end of the buffer.
    #[error("window at frame {offset} of length {length} exceeds buffer of {frames} frames")]
    OutOfRange {
        /// First frame of the window.
        offset: usize,
        /// Window length in frames.
        length: usize,
        /// Frames available in the buffer.
        frames: usize,
    },

    /// The transform rejected its buffers.
    #[error("transform failed: {0}")]
    Transform(#[from] realfft::FftError),
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or saving an [`AnalysisConfig`](crate::AnalysisConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The file parsed but holds an unusable value.
    #[error(transparent)]
    Invalid(#[from] Error),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn invalid_range_display() {
        let err = Error::InvalidRange { start: 10, end: 4 };
        assert_eq!(
            err.to_string(),
            "invalid range: cursor1 (10) is after cursor2 (4)"
        );
    }

    #[test]
    fn out_of_range_display() {
        let err = Error::OutOfRange {
            offset: 100,
            length: 4096,
            frames: 2000,
        };
        let msg = err.to_string();
        assert!(msg.contains("frame 100"), "got: {msg}");
        assert!(msg.contains("2000 frames"), "got: {msg}");
    }

    #[test]
    fn read_file_factory_keeps_path_and_source() {
        let err = ConfigError::read_file("/a/b.toml", mock_io_err());
        assert!(
            matches!(err, ConfigError::ReadFile { ref path, .. } if path == std::path::Path::new("/a/b.toml"))
        );
        assert!(err.source().is_some());
        assert!(err.to_string().contains("failed to read file"));
    }

    #[test]
    fn write_file_factory_keeps_path() {
        let err = ConfigError::write_file("/out.toml", mock_io_err());
        assert!(err.to_string().contains("/out.toml"));
    }

    #[test]
    fn invalid_wraps_analysis_error_transparently() {
        let err = ConfigError::from(Error::InvalidConfiguration("bad".into()));
        assert_eq!(err.to_string(), "invalid configuration: bad");
    }
}
