//! # Init Subcommand
//!
//! Writes a starter `llmindex.yaml` for `llmindex generate --config`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use llmindex_core::{write_yaml_config, YamlConfig};

/// Arguments for `llmindex init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Entity/brand name.
    #[arg(long)]
    pub site_name: String,

    /// Canonical HTTPS URL of the site.
    #[arg(long)]
    pub base_url: String,

    /// Primary language (BCP-47).
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Topic (repeatable, or comma-separated).
    #[arg(long = "topic", short = 't', value_delimiter = ',')]
    pub topics: Vec<String>,

    /// Where to write the config.
    #[arg(long, default_value = crate::DEFAULT_CONFIG_FILE)]
    pub path: PathBuf,

    /// Overwrite an existing config.
    #[arg(long)]
    pub force: bool,
}

/// Execute the init subcommand.
pub fn run_init(args: &InitArgs) -> Result<u8> {
    if args.path.exists() && !args.force {
        println!(
            "{} already exists. Re-run with --force to overwrite.",
            args.path.display()
        );
        println!("Aborted.");
        return Ok(1);
    }

    let mut topics: Vec<String> = args
        .topics
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if topics.is_empty() {
        topics.push("general".to_string());
    }

    let config = YamlConfig {
        site_name: Some(args.site_name.trim().to_string()),
        base_url: Some(args.base_url.trim().to_string()),
        language: Some(args.language.trim().to_string()),
        topics: Some(topics),
        access_control: None,
    };
    write_yaml_config(&args.path, &config)?;

    println!("✓ Created {}", args.path.display());
    println!("\nNext: llmindex generate --config {}", args.path.display());
    Ok(0)
}
