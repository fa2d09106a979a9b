//! # Error Types
//!
//! Whole-file failures only. A single bad product row is not an error: it
//! lands in [`ImportOutcome::rejected`](crate::import::ImportOutcome) and
//! the import carries on.

use std::path::PathBuf;

use thiserror::Error;

/// A product source could not be read at all.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Input file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV header row could not be parsed.
    #[error("invalid CSV {}: {source}", path.display())]
    Csv {
        /// Input file.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// The JSON input is not valid JSON.
    #[error("invalid JSON {}: {source}", path.display())]
    Json {
        /// Input file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The JSON input parsed, but its top level is not an array.
    #[error("Expected JSON array, got {found}")]
    NotAnArray {
        /// JSON type found at the top level.
        found: &'static str,
    },
}

/// Writing generated artifacts failed.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Creating a directory or writing a file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A document could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
