//! Error types for YAML parsing.

use collage_layout::LayoutError;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for configuration parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Config file could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A template failed validation
    #[error("Template error: {0}")]
    Template(#[from] LayoutError),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Error message
        message: String,
    },
}
