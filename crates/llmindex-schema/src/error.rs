//! # Schema Errors
//!
//! Failures of the schema layer itself. Defects in the documents being
//! validated are never errors here: they are data in a
//! [`ValidationResult`](crate::ValidationResult).

use thiserror::Error;

/// The schema machinery could not produce a validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// An embedded schema document is not valid JSON.
    #[error("schema '{schema_name}' is not valid JSON: {reason}")]
    InvalidDocument {
        /// Schema file name.
        schema_name: String,
        /// Parser message.
        reason: String,
    },

    /// A named sub-definition is missing from the governing schema.
    #[error("{definition} schema not found in definitions")]
    SchemaNotFound {
        /// The definition that was looked up.
        definition: String,
    },

    /// The schema could not be compiled into a validator.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuild {
        /// Schema name.
        schema_name: String,
        /// Compiler message.
        reason: String,
    },
}
