//! # Watch Subcommand
//!
//! Builds the artifacts from `llmindex.yaml` once, then rebuilds them each
//! time the config or the product input next to it changes. Runs until
//! interrupted.
//!
//! The product input is discovered beside the config (see
//! [`INPUT_CANDIDATES`]) on every build, so adding `products.csv` to a
//! watched directory starts producing a feed without a restart.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

use anyhow::{bail, Context, Result};
use clap::Args;
use notify::{Event, EventKind, RecursiveMode, Watcher};

use llmindex_core::{load_yaml_config, Product, SiteConfig};
use llmindex_gen::{build_artifacts, GeneratedArtifacts, ProductSource, ShopifyOptions};
use llmindex_schema::SchemaVersion;

use crate::generate::parse_manifest_version;

/// Arguments for `llmindex watch`.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Path to llmindex.yaml.
    #[arg(long, default_value = crate::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output directory.
    #[arg(long, short, default_value = "dist")]
    pub output_dir: PathBuf,

    /// Currency for Shopify prices.
    #[arg(long, default_value = "USD")]
    pub currency: String,

    /// Manifest version to emit.
    #[arg(long, default_value = "0.1", value_parser = parse_manifest_version)]
    pub manifest_version: SchemaVersion,
}

#[derive(Clone, Copy)]
enum InputKind {
    Csv,
    Json,
    ShopifyCsv,
}

/// Product inputs looked for beside the config, first match wins.
pub const INPUT_CANDIDATES: [&str; 5] = [
    "products.csv",
    "products.json",
    "shopify_products.csv",
    "data/products.csv",
    "data/products.json",
];

const INPUT_KINDS: [InputKind; 5] =
    [InputKind::Csv, InputKind::Json, InputKind::ShopifyCsv, InputKind::Csv, InputKind::Json];

/// File suffixes that trigger a rebuild even when not watched by name.
const TRIGGER_SUFFIXES: [&str; 4] = ["yaml", "yml", "csv", "json"];

/// A running watch: the config it rebuilds from and where output goes.
#[derive(Debug)]
pub struct WatchSession {
    config: PathBuf,
    output_dir: PathBuf,
    currency: String,
    manifest_version: SchemaVersion,
    watched: Vec<PathBuf>,
}

impl WatchSession {
    /// Fails when the config file does not exist.
    pub fn new(args: &WatchArgs) -> Result<Self> {
        if !args.config.is_file() {
            bail!("Config file not found: {}", args.config.display());
        }
        let config = absolute(&args.config);
        let mut watched = vec![config.clone()];
        if let Some(input) = discover_input_path(&config) {
            watched.push(absolute(&input));
        }
        Ok(Self {
            config,
            output_dir: args.output_dir.clone(),
            currency: args.currency.clone(),
            manifest_version: args.manifest_version,
            watched,
        })
    }

    /// Files watched by name: the config, then the discovered input.
    pub fn watched_paths(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Parent directories of the watched files, deduplicated.
    pub fn watch_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for path in &self.watched {
            if let Some(dir) = path.parent() {
                if !dirs.iter().any(|d| d == dir) {
                    dirs.push(dir.to_path_buf());
                }
            }
        }
        dirs
    }

    /// Whether a change to `path` should trigger a rebuild. Output files
    /// never do.
    pub fn is_relevant(&self, path: &Path) -> bool {
        let path = absolute(path);
        if path.starts_with(absolute(&self.output_dir)) {
            return false;
        }
        if self.watched.contains(&path) {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| TRIGGER_SUFFIXES.contains(&e))
    }

    /// Re-read the config, re-import products, and write every artifact.
    pub fn rebuild(&self) -> Result<GeneratedArtifacts> {
        let yaml = load_yaml_config(&self.config).context("Config error")?;

        let site = yaml.site_name.as_deref().map(str::trim).unwrap_or_default();
        let url = yaml.base_url.as_deref().map(str::trim).unwrap_or_default();
        if site.is_empty() {
            bail!("Missing site_name in config");
        }
        if url.is_empty() {
            bail!("Missing base_url in config");
        }

        let mut config = SiteConfig::new(site, url);
        if let Some(lang) = yaml.language.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            config.language = lang.to_string();
        }
        if let Some(topics) = yaml.topics.filter(|t| !t.is_empty()) {
            config.topics = topics;
        }
        config.access_control = yaml.access_control;

        let source = resolve_input_source(&self.config, url, &self.currency);
        let products: Vec<Product> = match source {
            Some(source) => {
                tracing::debug!(input = %source.path().display(), "importing products");
                source.import()?.products
            }
            None => Vec::new(),
        };
        Ok(build_artifacts(&config, &products, &self.output_dir, self.manifest_version)?)
    }
}

/// First existing product input beside `config`.
pub fn discover_input_path(config: &Path) -> Option<PathBuf> {
    let dir = config.parent().unwrap_or(Path::new("."));
    INPUT_CANDIDATES.iter().map(|c| dir.join(c)).find(|p| p.is_file())
}

/// The importer for the first existing product input beside `config`.
pub fn resolve_input_source(
    config: &Path,
    base_url: &str,
    currency: &str,
) -> Option<ProductSource> {
    let dir = config.parent().unwrap_or(Path::new("."));
    INPUT_CANDIDATES
        .iter()
        .zip(INPUT_KINDS)
        .map(|(c, kind)| (dir.join(c), kind))
        .find(|(p, _)| p.is_file())
        .map(|(path, kind)| match kind {
            InputKind::Csv => ProductSource::Csv(path),
            InputKind::Json => ProductSource::Json(path),
            InputKind::ShopifyCsv => ProductSource::ShopifyCsv(
                path,
                ShopifyOptions::new(base_url.to_string()).with_currency(currency.to_string()),
            ),
        })
}

/// Execute the watch subcommand. Returns only on a watcher error.
pub fn run_watch(args: &WatchArgs) -> Result<u8> {
    let session = WatchSession::new(args)?;

    println!("llmindex watch — monitoring for changes");
    println!("  Config: {}", args.config.display());
    println!("  Output: {}", args.output_dir.display());
    println!("  Watching: {} path(s)", session.watched_paths().len());
    for path in session.watched_paths() {
        println!("    - {}", path.display());
    }

    println!("\nInitial build...");
    match session.rebuild() {
        Ok(artifacts) => report_built(&artifacts, "Built"),
        Err(e) => println!("Build failed: {e:#}"),
    }

    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(tx).context("failed to start file watcher")?;
    for dir in session.watch_dirs() {
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", dir.display()))?;
    }

    println!("\nWatching for changes... (Ctrl+C to stop)\n");
    watch_events(&session, &rx)?;
    Ok(0)
}

/// Rebuild once per batch of relevant events until the channel closes.
/// Returns the number of rebuilds attempted.
pub fn watch_events(
    session: &WatchSession,
    rx: &Receiver<notify::Result<Event>>,
) -> Result<usize> {
    let mut rebuilds = 0;
    while let Ok(event) = rx.recv() {
        let event = event.context("file watcher error")?;
        if matches!(event.kind, EventKind::Access(_)) {
            continue;
        }
        let relevant: Vec<&PathBuf> =
            event.paths.iter().filter(|p| session.is_relevant(p)).collect();
        if relevant.is_empty() {
            continue;
        }
        for path in relevant {
            println!("  → {}: {}", change_label(&event.kind), path.display());
        }

        println!("Rebuilding...");
        rebuilds += 1;
        match session.rebuild() {
            Ok(artifacts) => {
                report_built(&artifacts, "Rebuilt");
                println!();
            }
            Err(e) => println!("Rebuild failed: {e:#}\n"),
        }
    }
    Ok(rebuilds)
}

fn report_built(artifacts: &GeneratedArtifacts, verb: &str) {
    for path in artifacts.paths() {
        println!("  ✓ {}", path.display());
    }
    println!("{verb} {} files.", artifacts.len());
}

fn change_label(kind: &EventKind) -> &'static str {
    match kind {
        EventKind::Create(_) => "added",
        EventKind::Modify(_) => "modified",
        EventKind::Remove(_) => "deleted",
        _ => "changed",
    }
}

/// Canonical form when the path exists, otherwise joined onto the
/// working directory.
fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            crate::current_dir().join(path)
        }
    })
}
