//! Stream directory configuration.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced while validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No configuration directory was provided.
    #[error("missing configuration directory")]
    MissingDirectory,
}

/// Configuration for a stream-producing process.
///
/// The only required setting is the directory streams are written under.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory stream files are written under.
    pub dir: PathBuf,
}

impl Config {
    /// Create a configuration with the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Check that a directory path was provided.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDirectory`] when the path is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingDirectory);
        }
        Ok(())
    }

    /// Path of a stream file under the configured directory.
    #[must_use]
    pub fn stream_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// The configured directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dir_rejected() {
        assert_eq!(Config::new("").validate(), Err(ConfigError::MissingDirectory));
    }

    #[test]
    fn test_stream_path_joins() {
        let config = Config::new("/var/data");
        assert!(config.validate().is_ok());
        assert_eq!(config.stream_path("events.scd"), PathBuf::from("/var/data/events.scd"));
    }
}
