//! # Generate Subcommand
//!
//! Resolves the site settings from flags and `llmindex.yaml` (flags win),
//! imports products from at most one source, and writes the manifest,
//! pages, and feed. With no product source only the manifest and pages
//! are written.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;

use llmindex_core::{load_yaml_config, Product, SiteConfig, YamlConfig};
use llmindex_gen::{build_artifacts, ProductSource, ShopifyOptions};
use llmindex_schema::SchemaVersion;

/// Arguments for `llmindex generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to llmindex.yaml (site_name, base_url, language, topics, access_control).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Entity/brand name (overrides config site_name).
    #[arg(long, short)]
    pub site: Option<String>,

    /// Canonical HTTPS URL of the site (overrides config base_url).
    #[arg(long, short)]
    pub url: Option<String>,

    /// Products CSV file.
    #[arg(long, short = 'i')]
    pub input_csv: Option<PathBuf>,

    /// Products JSON file (array of objects).
    #[arg(long)]
    pub input_json: Option<PathBuf>,

    /// Shopify product export CSV.
    #[arg(long)]
    pub input_shopify_csv: Option<PathBuf>,

    /// Output directory.
    #[arg(long, short, default_value = "dist")]
    pub output_dir: PathBuf,

    /// Primary language, BCP-47 (overrides config language).
    #[arg(long, short)]
    pub language: Option<String>,

    /// Topic (repeatable; overrides config topics).
    #[arg(long = "topic", short = 't')]
    pub topics: Vec<String>,

    /// Base URL for endpoints (defaults to --url).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Currency for Shopify prices.
    #[arg(long, default_value = "USD")]
    pub currency: String,

    /// Manifest version to emit.
    #[arg(long, default_value = "0.1", value_parser = parse_manifest_version)]
    pub manifest_version: SchemaVersion,
}

pub(crate) fn parse_manifest_version(tag: &str) -> Result<SchemaVersion, String> {
    SchemaVersion::from_tag(tag).ok_or_else(|| {
        let known: Vec<&str> = SchemaVersion::ALL.iter().map(|v| v.as_str()).collect();
        format!("unknown manifest version {tag:?} (expected one of: {})", known.join(", "))
    })
}

/// Execute the generate subcommand.
pub fn run_generate(args: &GenerateArgs) -> Result<u8> {
    let yaml = match &args.config {
        Some(path) => load_yaml_config(path)?,
        None => YamlConfig::default(),
    };
    let config = resolve_site_config(args, &yaml)?;
    let source = resolve_source(args, &config)?;

    println!("Generating llmindex artifacts for {}", config.name);
    println!(
        "  Source: {}",
        source.as_ref().map_or("(none)".to_string(), |s| s.path().display().to_string())
    );
    println!("  Output: {}", args.output_dir.display());

    let products: Vec<Product> = match &source {
        None => {
            println!("  ! No product input provided. Generating manifest + pages only.");
            Vec::new()
        }
        Some(source) => {
            let outcome = source.import()?;
            println!("  Imported: {} products", outcome.products.len());
            if !outcome.rejected.is_empty() {
                println!("  Skipped: {} rows", outcome.rejected.len());
            }
            if outcome.products.is_empty() {
                println!("Warning: No products imported. Generating without feed.");
            }
            outcome.products
        }
    };

    let artifacts =
        build_artifacts(&config, &products, &args.output_dir, args.manifest_version)?;
    for path in artifacts.paths() {
        println!("  ✓ {}", path.display());
    }
    println!(
        "\nDone! Generated {} files in {}/",
        artifacts.len(),
        args.output_dir.display()
    );
    Ok(0)
}

/// Merge flags over config values and apply defaults.
pub fn resolve_site_config(args: &GenerateArgs, yaml: &YamlConfig) -> Result<SiteConfig> {
    let site = pick(args.site.as_deref(), yaml.site_name.as_deref());
    let url = pick(args.url.as_deref(), yaml.base_url.as_deref());

    let Some(site) = site else {
        bail!("Missing site name. Provide --site or set site_name in --config.");
    };
    let Some(url) = url else {
        bail!("Missing site URL. Provide --url or set base_url in --config.");
    };

    let mut config = SiteConfig::new(site, url);
    if let Some(lang) = pick(args.language.as_deref(), yaml.language.as_deref()) {
        config.language = lang;
    }
    if !args.topics.is_empty() {
        config.topics = args.topics.clone();
    } else if let Some(topics) = yaml.topics.as_ref().filter(|t| !t.is_empty()) {
        config.topics = topics.clone();
    }
    config.base_url = args.base_url.clone();
    config.access_control = yaml.access_control.clone();
    Ok(config)
}

/// Pick the single product source, checking it exists and that the site
/// URL is HTTPS.
pub fn resolve_source(args: &GenerateArgs, config: &SiteConfig) -> Result<Option<ProductSource>> {
    let provided: Vec<&Path> = [&args.input_csv, &args.input_json, &args.input_shopify_csv]
        .into_iter()
        .flatten()
        .map(PathBuf::as_path)
        .collect();
    if provided.len() > 1 {
        bail!("Provide only one input source");
    }
    if let Some(path) = provided.first() {
        if !path.exists() {
            bail!("Input file not found: {}", path.display());
        }
    }
    if !config.canonical_url.starts_with("https://") {
        bail!("--url must be an HTTPS URL");
    }

    let source = if let Some(p) = &args.input_csv {
        Some(ProductSource::Csv(p.clone()))
    } else if let Some(p) = &args.input_json {
        Some(ProductSource::Json(p.clone()))
    } else {
        args.input_shopify_csv.as_ref().map(|p| {
            let opts = ShopifyOptions::new(config.canonical_url.clone())
                .with_currency(args.currency.clone());
            ProductSource::ShopifyCsv(p.clone(), opts)
        })
    };
    Ok(source)
}

/// First non-blank value, trimmed.
fn pick(flag: Option<&str>, config: Option<&str>) -> Option<String> {
    flag.or(config)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
