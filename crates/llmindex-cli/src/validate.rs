//! # Validate Subcommand
//!
//! Runs the combined manifest + feed validation and prints the report.
//! Exit code 1 iff the result is invalid.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};

use llmindex_schema::{validate_all, SchemaVersion, ValidationResult};

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for `llmindex validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the llmindex.json manifest.
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Path to a products.jsonl feed (auto-detected if omitted).
    #[arg(long, short)]
    pub feed: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let result = validate_all(&args.manifest, args.feed.as_deref());
    tracing::debug!(
        errors = result.errors().len(),
        warnings = result.warnings().len(),
        "validation finished"
    );

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&args.manifest, &result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(if result.is_valid() { 0 } else { 1 })
}

/// Human-readable report: warnings, errors, then a verdict line.
pub fn render_text(manifest: &Path, result: &ValidationResult) -> String {
    let mut out = format!("Validating: {}\n", manifest.display());
    for w in result.warnings() {
        out.push_str(&format!("  ! {w}\n"));
    }
    for e in result.errors() {
        out.push_str(&format!("  ✗ {e}\n"));
    }
    if result.is_valid() {
        out.push_str(&format!(
            "Valid! Manifest passes {} schema.\n",
            declared_version(manifest)
        ));
    } else {
        out.push_str(&format!("\nInvalid. {} error(s) found.\n", result.errors().len()));
    }
    out
}

/// The schema version a manifest was validated against.
fn declared_version(manifest: &Path) -> SchemaVersion {
    crate::load_manifest_value(manifest)
        .ok()
        .and_then(|v| v.get("version").and_then(|t| t.as_str()).and_then(SchemaVersion::from_tag))
        .unwrap_or(SchemaVersion::FALLBACK)
}
