//! # Error Types
//!
//! Structured errors for the foundational layer. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.

use std::path::PathBuf;

use thiserror::Error;

/// A product record failed model validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A required text field was empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A price was negative or not a finite number.
    #[error("{field} must be a non-negative number, got {value}")]
    InvalidPrice {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value, rendered for the message.
        value: String,
    },

    /// A currency code did not match `^[A-Z]{3}$`.
    #[error("currency must be a 3-letter uppercase ISO 4217 code, got {0:?}")]
    InvalidCurrency(String),

    /// `updated_at` is not a recognizable timestamp.
    #[error("updated_at is not a valid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// An availability value could not be normalized.
    #[error("availability must be one of in_stock, out_of_stock, preorder; got {0:?}")]
    InvalidAvailability(String),
}

/// Loading `llmindex.yaml` failed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The config file exists but could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for the expected shape.
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The config could not be rendered as YAML.
    #[error("failed to encode config for {}: {source}", path.display())]
    Encode {
        /// Destination path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The config file could not be written.
    #[error("failed to write config {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in signed documents.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
