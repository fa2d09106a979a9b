//! # llmindex-core — Foundational Types
//!
//! Shared building blocks for the llmindex workspace. Every other crate
//! depends on `llmindex-core`; it depends on nothing internal.
//!
//! ## Contents
//!
//! - [`model`] — `Product`, `PriceRange`, `Availability`: one line of the
//!   `products.jsonl` feed, with validated construction through
//!   [`ProductDraft`].
//! - [`manifest`] — the typed `/.well-known/llmindex.json` document as the
//!   generator emits it.
//! - [`config`] — `llmindex.yaml` loading and the resolved [`SiteConfig`].
//! - [`temporal`] — lenient RFC 3339 parsing and the `YYYY-MM-DDTHH:MM:SSZ`
//!   rendering used for every generated timestamp.
//! - [`canonical`] — `CanonicalBytes`, the only input accepted for signing.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `llmindex-*` crates.
//! - No `.unwrap()` outside tests.
//! - Validators work on raw `serde_json::Value`; the typed models here are
//!   for producing documents, not for checking them.

pub mod canonical;
pub mod config;
pub mod error;
pub mod manifest;
pub mod model;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use config::{load_yaml_config, write_yaml_config, SiteConfig, YamlConfig};
pub use error::{CanonicalizationError, ConfigError, ModelError};
pub use manifest::{
    AccessControl, CommercialUse, Endpoints, Entity, Feeds, Manifest, ManifestSig, Verify,
    VerifyMethod,
};
pub use model::{Availability, PriceRange, Product, ProductDraft};
pub use temporal::{format_rfc3339, now_rfc3339, parse_timestamp_lenient};
