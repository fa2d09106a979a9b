//! # llmindex-schema — Manifest & Feed Validation
//!
//! Validates `/.well-known/llmindex.json` manifests and `products.jsonl`
//! feeds against the versioned llmindex JSON Schemas plus the semantic
//! rules a schema cannot express.
//!
//! ## Components
//!
//! - [`store`] — embedded schema documents, version dispatch with
//!   fallback, and the `product_line` sub-schema.
//! - [`manifest`] — [`validate_manifest`]: schema conformance, then HTTPS,
//!   endpoint host, access-control, localization and feed-freshness rules.
//! - [`feed`] — [`validate_feed`]: one schema check per JSONL line.
//! - [`combined`] — [`validate_all`]: manifest plus explicit or
//!   auto-discovered feed in one report.
//! - [`result`] — [`ValidationResult`], the accumulator all of them return.
//!
//! ## Error Policy
//!
//! Validation never returns `Err`. A missing file, malformed JSON or a
//! missing embedded definition is recorded as an error string in the
//! result, so callers handle one shape. [`SchemaError`] surfaces only from
//! the lower-level [`store`] API.
//!
//! ## Crate Policy
//!
//! - Depends only on `llmindex-core` internally.
//! - Read-only: nothing in this crate writes to disk.
//! - Message strings are part of the public contract; tests pin them.
//! - No shared state between calls, so validations may run concurrently.

pub mod combined;
pub mod error;
pub mod feed;
pub mod manifest;
pub mod result;
pub mod store;
pub mod violation;

pub use combined::{discover_feed, validate_all};
pub use error::SchemaError;
pub use feed::{validate_feed, validate_feed_text};
pub use manifest::{validate_manifest, validate_manifest_at, validate_manifest_value};
pub use result::ValidationResult;
pub use store::{product_line_schema, schema_for_version, SchemaDocument, SchemaVersion};
pub use violation::{PathSegment, Violation};
