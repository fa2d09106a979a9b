//! # Status Subcommand
//!
//! One-screen summary of a manifest. Fields are read from raw JSON so a
//! partially broken manifest still gets a summary.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;

const VERIFY_PREVIEW_CHARS: usize = 40;
const MISSING: &str = "—";

/// Arguments for `llmindex status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Path to llmindex.json. Defaults to .well-known/llmindex.json,
    /// dist/.well-known/llmindex.json, or llmindex.json in the current directory.
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

/// Execute the status subcommand.
pub fn run_status(args: &StatusArgs) -> Result<u8> {
    let path = match &args.manifest {
        Some(p) => p.clone(),
        None => match crate::default_manifest_path(&crate::current_dir()) {
            Some(p) => p,
            None => {
                println!("No manifest found. Run 'llmindex generate' first.");
                return Ok(1);
            }
        },
    };

    let data = crate::load_manifest_value(&path)?;
    println!("llmindex status — {}", path.display());
    for (field, value) in summarize(&data) {
        println!("  {field:<13} {value}");
    }
    Ok(0)
}

/// `(label, value)` rows for a manifest.
pub fn summarize(data: &Value) -> Vec<(&'static str, String)> {
    let endpoints = data
        .get("endpoints")
        .and_then(Value::as_object)
        .map_or(0, |m| m.len());

    vec![
        ("Site", display(data.pointer("/entity/name"))),
        ("Spec Version", display(data.get("version"))),
        ("Endpoints", endpoints.to_string()),
        ("Updated At", display(data.get("updated_at"))),
        ("Verify", verify_status(data.get("verify"))),
    ]
}

fn display(value: Option<&Value>) -> String {
    match value {
        None => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn verify_status(verify: Option<&Value>) -> String {
    let method = verify.and_then(|v| v.get("method")).filter(|v| truthy(v));
    let value = verify.and_then(|v| v.get("value")).filter(|v| truthy(v));
    let (Some(method), Some(value)) = (method, value) else {
        return "Not configured".to_string();
    };

    let value = display(Some(value));
    let preview: String = value.chars().take(VERIFY_PREVIEW_CHARS).collect();
    let ellipsis = if value.chars().count() > VERIFY_PREVIEW_CHARS { "…" } else { "" };
    format!("{} ({preview}{ellipsis})", display(Some(method)))
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
