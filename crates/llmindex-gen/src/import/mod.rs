//! # Product Importers
//!
//! Three sources produce the same [`ImportOutcome`]:
//!
//! - [`csv`]: a flat products CSV with one column per feed field.
//! - [`json`]: a JSON array of product objects.
//! - [`shopify`]: a Shopify product export, one row per variant.
//!
//! Rows that fail model validation are skipped, recorded in
//! [`ImportOutcome::rejected`], and logged at `warn`.

pub mod csv;
pub mod json;
pub mod shopify;

use std::path::{Path, PathBuf};

use llmindex_core::Product;
use tracing::warn;

use crate::error::ImportError;

pub use self::csv::import_csv;
pub use self::json::import_json;
pub use self::shopify::{import_shopify_csv, ShopifyOptions};

/// Products accepted from one source, plus a message per rejected row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOutcome {
    pub products: Vec<Product>,
    pub rejected: Vec<String>,
}

impl ImportOutcome {
    fn accept(&mut self, product: Product) {
        self.products.push(product);
    }

    fn reject(&mut self, message: String) {
        warn!("{message}");
        self.rejected.push(message);
    }
}

/// Which importer to run on an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSource {
    Csv(PathBuf),
    Json(PathBuf),
    ShopifyCsv(PathBuf, ShopifyOptions),
}

impl ProductSource {
    /// The input file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Csv(p) | Self::Json(p) | Self::ShopifyCsv(p, _) => p,
        }
    }

    /// Run the matching importer.
    pub fn import(&self) -> Result<ImportOutcome, ImportError> {
        match self {
            Self::Csv(p) => import_csv(p),
            Self::Json(p) => import_json(p),
            Self::ShopifyCsv(p, opts) => import_shopify_csv(p, opts),
        }
    }
}

fn read_input(path: &Path) -> Result<String, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ImportError::NotFound(path.to_path_buf())
        } else {
            ImportError::Read { path: path.to_path_buf(), source: e }
        }
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Parse a price cell. Empty means no price.
fn parse_price(raw: Option<&str>) -> Result<Option<f64>, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("price is not a number: {s:?}")),
    }
}
