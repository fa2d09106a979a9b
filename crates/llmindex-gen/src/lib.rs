//! # llmindex-gen — Artifact Generation
//!
//! Turns a product catalog and a [`SiteConfig`](llmindex_core::SiteConfig)
//! into the static files a site publishes: the manifest, four Markdown
//! pages, and the JSONL product feed.
//!
//! - [`import`] — CSV, JSON, and Shopify export importers.
//! - [`generate`] — manifest, page, and feed writers, plus
//!   [`build_artifacts`] which runs all three.
//!
//! ## Crate Policy
//!
//! - Generated manifests and feeds validate with zero errors under
//!   `llmindex-schema`; the integration tests hold this contract.
//! - Importers skip bad rows instead of failing the whole file.

pub mod error;
pub mod generate;
pub mod import;

pub use error::{GenerateError, ImportError};
pub use generate::{build_artifacts, GeneratedArtifacts};
pub use import::{
    import_csv, import_json, import_shopify_csv, ImportOutcome, ProductSource, ShopifyOptions,
};
