//! # Artifact Generators
//!
//! Output layout under the output directory:
//!
//! ```text
//! .well-known/llmindex.json
//! llm/products.md
//! llm/policies.md
//! llm/faq.md
//! llm/about.md
//! llm/feed/products.jsonl      (only when there are products)
//! ```

pub mod feed;
pub mod manifest;
pub mod pages;

use std::path::{Path, PathBuf};

use llmindex_core::{now_rfc3339, Product, SiteConfig};
use llmindex_schema::SchemaVersion;
use tracing::info;

use crate::error::GenerateError;

pub use feed::{render_feed, write_feed};
pub use manifest::{generate_manifest, write_manifest};
pub use pages::write_pages;

/// Paths written by [`build_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    pub manifest: PathBuf,
    pub pages: Vec<PathBuf>,
    pub feed: Option<PathBuf>,
}

impl GeneratedArtifacts {
    /// Every written path, manifest first.
    pub fn paths(&self) -> Vec<&Path> {
        std::iter::once(self.manifest.as_path())
            .chain(self.pages.iter().map(PathBuf::as_path))
            .chain(self.feed.as_deref())
            .collect()
    }

    /// Number of files written.
    pub fn len(&self) -> usize {
        1 + self.pages.len() + usize::from(self.feed.is_some())
    }

    /// Always false: the manifest is always written.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Write the manifest, the four pages, and (when `products` is non-empty)
/// the feed under `out_dir`.
pub fn build_artifacts(
    config: &SiteConfig,
    products: &[Product],
    out_dir: &Path,
    version: SchemaVersion,
) -> Result<GeneratedArtifacts, GenerateError> {
    let now = now_rfc3339();
    let has_feed = !products.is_empty();

    let manifest = generate_manifest(config, version, has_feed, &now);
    let manifest_path = out_dir.join(".well-known").join("llmindex.json");
    write_manifest(&manifest, &manifest_path)?;

    let pages = write_pages(products, config, out_dir)?;
    let feed = if has_feed { Some(write_feed(products, out_dir)?) } else { None };

    let artifacts = GeneratedArtifacts { manifest: manifest_path, pages, feed };
    info!(files = artifacts.len(), out_dir = %out_dir.display(), "generated llmindex artifacts");
    Ok(artifacts)
}

pub(crate) fn write_text(path: &Path, content: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| GenerateError::Write { path: parent.to_path_buf(), source: e })?;
    }
    std::fs::write(path, content)
        .map_err(|e| GenerateError::Write { path: path.to_path_buf(), source: e })?;
    info!(path = %path.display(), "wrote");
    Ok(())
}
