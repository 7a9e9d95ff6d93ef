//! Error types for configuration resolution.
//!
//! A missing configuration file found during discovery is not an error and never
//! surfaces here; every variant below aborts resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML.
    #[error("failed to parse configuration file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The configuration file parsed, but its top level is not a mapping.
    #[error("configuration file {} must contain a mapping at the top level", path.display())]
    NotAMapping { path: PathBuf },

    /// File values do not fit the typed configuration structure.
    #[error("configuration values do not match the expected structure")]
    Merge(#[source] serde_json::Error),
}

impl ConfigError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

/// Result type for configuration resolution.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_file_not_found_mentions_path() {
        let err = ConfigError::FileNotFound {
            path: PathBuf::from("/etc/panda/config.yml"),
        };
        assert!(err.to_string().contains("/etc/panda/config.yml"));
    }

    #[test]
    fn test_read_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::read("config.yml", io);
        assert!(err.to_string().contains("config.yml"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let yaml_err = serde_yaml::from_str::<serde_json::Value>("a: [1, 2").unwrap_err();
        let err = ConfigError::parse("config/config.yml", yaml_err);
        assert!(err.to_string().contains("config/config.yml"));
        assert!(err.source().is_some());
    }
}
