//! `/.well-known/llmindex.json`

use std::path::Path;

use llmindex_core::{Endpoints, Entity, Feeds, Manifest, SiteConfig};
use llmindex_schema::SchemaVersion;

use super::write_text;
use crate::error::GenerateError;

/// Build the manifest for `config`.
///
/// `feeds.products_jsonl` is set only when `has_feed`. A v0.2 manifest
/// with a feed also carries `feed_updated_at = now`.
pub fn generate_manifest(
    config: &SiteConfig,
    version: SchemaVersion,
    has_feed: bool,
    now: &str,
) -> Manifest {
    let base = config.base_url();
    let feeds = has_feed.then(|| Feeds {
        products_jsonl: Some(format!("{base}/llm/feed/products.jsonl")),
        ..Feeds::default()
    });
    let feed_updated_at =
        (has_feed && version >= SchemaVersion::V0_2).then(|| now.to_string());

    Manifest {
        version: version.as_str().to_string(),
        updated_at: now.to_string(),
        feed_updated_at,
        entity: Entity {
            name: config.name.clone(),
            canonical_url: config.canonical_url.clone(),
        },
        language: config.language.clone(),
        languages: None,
        topics: config.topics.clone(),
        endpoints: Endpoints::under(base),
        localized_endpoints: None,
        feeds,
        verify: None,
        sig: None,
        license: None,
        access_control: config.access_control.clone(),
    }
}

/// Write the manifest pretty-printed with a trailing newline, creating
/// parent directories.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<(), GenerateError> {
    let mut text = serde_json::to_string_pretty(manifest)?;
    text.push('\n');
    write_text(path, &text)
}
