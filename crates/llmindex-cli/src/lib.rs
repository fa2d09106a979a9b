//! # llmindex-cli — Command-Line Interface
//!
//! The `llmindex` binary. Each subcommand lives in its own module with a
//! clap `Args` struct and a `run_*` handler returning the process exit code.
//!
//! ## Subcommands
//!
//! - `llmindex validate` — manifest and feed validation report.
//! - `llmindex generate` — import products and write all artifacts.
//! - `llmindex init` — write a starter `llmindex.yaml`.
//! - `llmindex status` — one-screen manifest summary.
//! - `llmindex sign` — Ed25519 keygen, manifest signing, verification.
//! - `llmindex verify` — DNS TXT / HTTP proof-file challenge values, and
//!   `verify check` to fetch and compare the published value.
//! - `llmindex watch` — rebuild artifacts when the config or input changes.
//!
//! ## Crate Policy
//!
//! - Handlers delegate to the library crates; no validation, generation,
//!   or signing logic lives here.
//! - Reports go to stdout; logs go to stderr through `tracing`.

pub mod generate;
pub mod init;
pub mod signing;
pub mod status;
pub mod validate;
pub mod verify;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

/// Where `status` and `verify` look for a manifest when none is given,
/// relative to the working directory.
pub const DEFAULT_MANIFEST_CANDIDATES: [&str; 3] = [
    ".well-known/llmindex.json",
    "dist/.well-known/llmindex.json",
    "llmindex.json",
];

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "llmindex.yaml";

/// First existing default manifest under `base`.
pub fn default_manifest_path(base: &Path) -> Option<PathBuf> {
    DEFAULT_MANIFEST_CANDIDATES
        .iter()
        .map(|c| base.join(c))
        .find(|p| p.exists())
}

/// Read a manifest as raw JSON.
pub fn load_manifest_value(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Manifest not found: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in manifest: {}", path.display()))
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_prefers_well_known() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(default_manifest_path(dir.path()), None);

        std::fs::write(dir.path().join("llmindex.json"), "{}").unwrap();
        assert_eq!(default_manifest_path(dir.path()), Some(dir.path().join("llmindex.json")));

        std::fs::create_dir_all(dir.path().join("dist/.well-known")).unwrap();
        std::fs::write(dir.path().join("dist/.well-known/llmindex.json"), "{}").unwrap();
        assert_eq!(
            default_manifest_path(dir.path()),
            Some(dir.path().join("dist/.well-known/llmindex.json"))
        );

        std::fs::create_dir_all(dir.path().join(".well-known")).unwrap();
        std::fs::write(dir.path().join(".well-known/llmindex.json"), "{}").unwrap();
        assert_eq!(
            default_manifest_path(dir.path()),
            Some(dir.path().join(".well-known/llmindex.json"))
        );
    }

    #[test]
    fn load_manifest_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        std::fs::write(&path, "{oops").unwrap();
        let err = load_manifest_value(&path).unwrap_err();
        assert!(format!("{err:#}").starts_with("Invalid JSON in manifest: "));
    }
}
