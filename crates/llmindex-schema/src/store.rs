//! # Schema Store
//!
//! The versioned manifest schemas are compiled into the binary with
//! `include_str!`; nothing is read from disk or the network at runtime.
//!
//! ## Version Dispatch
//!
//! A manifest's `version` tag selects one [`SchemaVersion`]. Tags outside
//! the closed set fall back to [`SchemaVersion::FALLBACK`] (the earliest
//! version) and produce a warning instead of a hard failure. The caller is
//! responsible for coercing the document's `version` to the fallback tag
//! before validating, so the fallback schema's own `const` does not report
//! a spurious error.
//!
//! ## Schema Resolution
//!
//! Each embedded document carries a `$id` of the form
//! `https://openllmindex.org/schemas/llmindex-<version>.schema.json`.
//! Internal `$ref`s (`#/definitions/<name>`) are resolved by the
//! `jsonschema` crate natively; any other reference is served from the
//! embedded set by [`LocalSchemaRetriever`], which never goes to the
//! network.

use std::collections::HashMap;
use std::fmt;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;

use crate::error::SchemaError;

const SCHEMA_V0_1: &str = include_str!("../schemas/llmindex-0.1.schema.json");
const SCHEMA_V0_2: &str = include_str!("../schemas/llmindex-0.2.schema.json");

/// Name of the feed-line sub-schema under `definitions`.
pub const PRODUCT_LINE_DEFINITION: &str = "product_line";

/// A manifest schema version this build understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaVersion {
    /// `"0.1"`: the base manifest.
    V0_1,
    /// `"0.2"`: adds `feed_updated_at`, `languages`, `localized_endpoints`.
    V0_2,
}

impl SchemaVersion {
    /// Every supported version, oldest first.
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::V0_1, SchemaVersion::V0_2];

    /// The schema used when a manifest's version is missing or unknown.
    pub const FALLBACK: SchemaVersion = SchemaVersion::V0_1;

    /// The `version` tag as written in manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V0_1 => "0.1",
            Self::V0_2 => "0.2",
        }
    }

    /// Look up a version by its exact tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == tag)
    }

    fn source(&self) -> &'static str {
        match self {
            Self::V0_1 => SCHEMA_V0_1,
            Self::V0_2 => SCHEMA_V0_2,
        }
    }

    fn file_name(&self) -> String {
        format!("llmindex-{}.schema.json", self.as_str())
    }

    /// Parse the embedded schema document for this version.
    pub fn document(&self) -> Result<SchemaDocument, SchemaError> {
        let value: Value = serde_json::from_str(self.source()).map_err(|e| {
            SchemaError::InvalidDocument {
                schema_name: self.file_name(),
                reason: e.to_string(),
            }
        })?;
        Ok(SchemaDocument { name: self.file_name(), version: Some(*self), value })
    }
}

impl fmt::Display for SchemaVersion {
    /// `llmindex v0.1`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "llmindex v{}", self.as_str())
    }
}

/// A parsed JSON Schema, either a whole manifest schema or one of its
/// definitions.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    name: String,
    version: Option<SchemaVersion>,
    value: Value,
}

impl SchemaDocument {
    /// Wrap an arbitrary schema value.
    pub fn from_value(name: impl Into<String>, value: Value) -> Self {
        Self { name: name.into(), version: None, value }
    }

    /// Identifier used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The manifest version this document governs, if it is a manifest schema.
    pub fn version(&self) -> Option<SchemaVersion> {
        self.version
    }

    /// The raw schema JSON.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Extract `definitions.<name>` as a standalone schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaNotFound`] if the definition is absent
    /// or not an object.
    pub fn definition(&self, name: &str) -> Result<SchemaDocument, SchemaError> {
        match self.value.get("definitions").and_then(|d| d.get(name)) {
            Some(def @ Value::Object(_)) => Ok(SchemaDocument {
                name: format!("{}#/definitions/{name}", self.name),
                version: None,
                value: def.clone(),
            }),
            _ => Err(SchemaError::SchemaNotFound { definition: name.to_string() }),
        }
    }

    /// Compile a Draft-07 validator. `format` keywords are annotations
    /// only; the draft's default of asserting them is switched off.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidatorBuild`] if the schema itself is
    /// invalid.
    pub fn compile(&self) -> Result<Validator, SchemaError> {
        jsonschema::options()
            .with_draft(jsonschema::Draft::Draft7)
            .should_validate_formats(false)
            .with_retriever(LocalSchemaRetriever::embedded())
            .build(&self.value)
            .map_err(|e| SchemaError::ValidatorBuild {
                schema_name: self.name.clone(),
                reason: e.to_string(),
            })
    }
}

/// Select the schema governing a manifest's declared version.
///
/// Returns the document and, when the fallback was taken, the warning to
/// surface to the user.
///
/// # Errors
///
/// Only if an embedded document fails to parse.
pub fn schema_for_version(
    version: Option<&str>,
) -> Result<(SchemaDocument, Option<String>), SchemaError> {
    match version {
        Some(tag) => match SchemaVersion::from_tag(tag) {
            Some(v) => Ok((v.document()?, None)),
            None if tag.is_empty() => fallback(missing_version_warning()),
            None => fallback(format!(
                "Unknown manifest version '{tag}', validating against {} schema",
                SchemaVersion::FALLBACK
            )),
        },
        None => fallback(missing_version_warning()),
    }
}

fn missing_version_warning() -> String {
    format!(
        "Missing or unknown manifest version, validating against {} schema",
        SchemaVersion::FALLBACK
    )
}

fn fallback(warning: String) -> Result<(SchemaDocument, Option<String>), SchemaError> {
    Ok((SchemaVersion::FALLBACK.document()?, Some(warning)))
}

/// The feed-line schema, taken from the fallback manifest schema.
///
/// Every supported version carries an identical `product_line`.
pub fn product_line_schema() -> Result<SchemaDocument, SchemaError> {
    SchemaVersion::FALLBACK.document()?.definition(PRODUCT_LINE_DEFINITION)
}

/// Serves `$ref` targets from the embedded schema set.
///
/// Unknown URIs are refused rather than fetched.
struct LocalSchemaRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl LocalSchemaRetriever {
    fn embedded() -> Self {
        let mut schemas_by_uri = HashMap::new();
        for version in SchemaVersion::ALL {
            if let Ok(value) = serde_json::from_str::<Value>(version.source()) {
                if let Some(id) = value.get("$id").and_then(Value::as_str) {
                    schemas_by_uri.insert(id.to_string(), value.clone());
                }
                schemas_by_uri.insert(version.file_name(), value);
            }
        }
        Self { schemas_by_uri }
    }
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        self.schemas_by_uri
            .get(filename)
            .cloned()
            .ok_or_else(|| format!("schema not embedded: {uri_str}").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_versions_select_without_warning() {
        for v in SchemaVersion::ALL {
            let (doc, warning) = schema_for_version(Some(v.as_str())).unwrap();
            assert_eq!(doc.version(), Some(v));
            assert!(warning.is_none());
        }
    }

    #[test]
    fn unknown_version_falls_back_with_warning() {
        let (doc, warning) = schema_for_version(Some("9.9")).unwrap();
        assert_eq!(doc.version(), Some(SchemaVersion::V0_1));
        assert_eq!(
            warning.as_deref(),
            Some("Unknown manifest version '9.9', validating against llmindex v0.1 schema")
        );
    }

    #[test]
    fn missing_and_empty_versions_fall_back() {
        let expected =
            Some("Missing or unknown manifest version, validating against llmindex v0.1 schema");
        assert_eq!(schema_for_version(None).unwrap().1.as_deref(), expected);
        assert_eq!(schema_for_version(Some("")).unwrap().1.as_deref(), expected);
    }

    #[test]
    fn embedded_schemas_compile() {
        for v in SchemaVersion::ALL {
            v.document().unwrap().compile().unwrap();
        }
        product_line_schema().unwrap().compile().unwrap();
    }

    #[test]
    fn every_version_shares_the_product_line() {
        let a = SchemaVersion::V0_1.document().unwrap().definition("product_line").unwrap();
        let b = SchemaVersion::V0_2.document().unwrap().definition("product_line").unwrap();
        assert_eq!(a.value(), b.value());
    }

    #[test]
    fn missing_definition_is_schema_not_found() {
        let doc = SchemaDocument::from_value("bare", json!({"type": "object"}));
        let err = doc.definition("product_line").unwrap_err();
        assert_eq!(err.to_string(), "product_line schema not found in definitions");
    }

    #[test]
    fn version_const_rejects_other_tag() {
        let validator = SchemaVersion::V0_2.document().unwrap().compile().unwrap();
        assert!(!validator.is_valid(&json!({"version": "0.1"})));
    }

    #[test]
    fn remote_refs_are_refused() {
        let doc = SchemaDocument::from_value(
            "remote",
            json!({"$ref": "https://elsewhere.example/other.schema.json"}),
        );
        assert!(matches!(doc.compile(), Err(SchemaError::ValidatorBuild { .. })));
    }
}
