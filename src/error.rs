//! Error types
//!
//! Two families: [`DataError`] for the dataset boundary and [`ConfigError`]
//! for settings. Neither is raised by the aggregation functions, which treat
//! an empty dataset as a valid input.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a [`Dataset`](crate::Dataset) from a file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("unreadable data file: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_path() {
        let err = DataError::NotFound {
            path: PathBuf::from("SpotifyFeatures.csv"),
        };
        assert_eq!(err.to_string(), "file not found: SpotifyFeatures.csv");
    }

    #[test]
    fn test_missing_columns_message_lists_all() {
        let err = DataError::MissingColumns(vec!["genre".into(), "popularity".into()]);
        assert_eq!(
            err.to_string(),
            "missing required column(s): genre, popularity"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DataError = io.into();
        assert!(matches!(err, DataError::Io(_)));
    }
}
