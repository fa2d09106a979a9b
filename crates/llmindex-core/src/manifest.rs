//! # Manifest Document
//!
//! The typed `/.well-known/llmindex.json` document. The generator builds a
//! [`Manifest`] and serializes it; the validator never deserializes into
//! it, because a malformed manifest must still produce a full report.
//!
//! Field declaration order is the emitted key order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The organization a manifest describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Display name.
    pub name: String,
    /// HTTPS origin of the site.
    pub canonical_url: String,
}

/// The four content endpoints every manifest carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub products: String,
    pub policies: String,
    pub faq: String,
    pub about: String,
}

impl Endpoints {
    /// Standard endpoint layout under `<base>/llm/`.
    pub fn under(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            products: format!("{base}/llm/products"),
            policies: format!("{base}/llm/policies"),
            faq: format!("{base}/llm/faq"),
            about: format!("{base}/llm/about"),
        }
    }
}

/// Machine-readable feed locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feeds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products_jsonl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products_jsonl_delta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offers_json: Option<String>,
}

/// How domain ownership is proven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyMethod {
    /// A TXT record at `_llmindex-challenge.<host>`.
    DnsTxt,
    /// A file at `/.well-known/llmindex-proof.txt`.
    HttpFile,
}

/// Domain-verification claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verify {
    pub method: VerifyMethod,
    pub value: String,
}

/// Detached signature envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSig {
    /// Always `EdDSA` for signatures this workspace produces.
    pub alg: String,
    /// Key identifier.
    pub kid: String,
    /// JWS compact serialization.
    pub jws: String,
}

/// Commercial-use stance advertised to agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommercialUse {
    Allowed,
    NonCommercial,
    ContactRequired,
}

/// Agent access policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessControl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny: Option<Vec<String>>,
    /// `<n>/<second|minute|hour|day|month>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_attribution: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commercial_use: Option<CommercialUse>,
}

/// The `/.well-known/llmindex.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub updated_at: String,
    /// v0.2 only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_updated_at: Option<String>,
    pub entity: Entity,
    pub language: String,
    /// v0.2 only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    pub topics: Vec<String>,
    pub endpoints: Endpoints,
    /// v0.2 only. Language tag to endpoint name to URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_endpoints: Option<BTreeMap<String, BTreeMap<String, String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feeds: Option<Feeds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify: Option<Verify>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<ManifestSig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control: Option<AccessControl>,
}
