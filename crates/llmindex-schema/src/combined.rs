//! # Combined Validation
//!
//! One report for a manifest and its feed. When no feed is named, the
//! conventional generator layout is searched:
//!
//! ```text
//! <site>/.well-known/llmindex.json
//! <site>/llm/feed/products.jsonl
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::feed::validate_feed;
use crate::manifest::validate_manifest;
use crate::result::ValidationResult;

/// Validate a manifest and, if given or discoverable, its feed.
pub fn validate_all(manifest_path: impl AsRef<Path>, feed_path: Option<&Path>) -> ValidationResult {
    let manifest_path = manifest_path.as_ref();
    let mut combined = ValidationResult::new();
    combined.merge(validate_manifest(manifest_path));

    match feed_path {
        Some(feed) => combined.merge(validate_feed(feed)),
        None => {
            if let Some(feed) = discover_feed(manifest_path) {
                debug!(feed = %feed.display(), "auto-detected feed");
                combined.add_warning(format!("Auto-detected feed: {}", feed.display()));
                combined.merge(validate_feed(&feed));
            }
        }
    }

    combined
}

/// The conventional feed location for a manifest, if a file exists there.
pub fn discover_feed(manifest_path: &Path) -> Option<PathBuf> {
    let absolute = std::fs::canonicalize(manifest_path).ok().or_else(|| {
        std::env::current_dir().ok().map(|cwd| cwd.join(manifest_path))
    })?;
    let candidate = absolute
        .parent()?
        .parent()?
        .join("llm")
        .join("feed")
        .join("products.jsonl");
    candidate.exists().then_some(candidate)
}
