//! Shopify product export CSV.
//!
//! Shopify writes one row per variant; only the first row of each `Handle`
//! is used. Product URLs are rebuilt as `<base>/products/<handle>` and
//! prices take the configured currency, since the export carries none.

use std::collections::HashSet;
use std::path::Path;

use llmindex_core::{now_rfc3339, ProductDraft};
use serde::Deserialize;
use tracing::debug;

use super::{parse_price, read_input, ImportOutcome};
use crate::error::ImportError;

/// Settings the export itself does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopifyOptions {
    /// Storefront URL the product paths hang off.
    pub base_url: String,
    /// Currency applied to `Variant Price`.
    pub currency: String,
}

impl ShopifyOptions {
    /// Options with the default currency `USD`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), currency: "USD".to_string() }
    }

    /// Override the currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShopifyRow {
    #[serde(rename = "Handle")]
    handle: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Variant SKU")]
    sku: Option<String>,
    #[serde(rename = "Variant Price")]
    price: Option<String>,
    #[serde(rename = "Vendor")]
    vendor: Option<String>,
    #[serde(rename = "Type")]
    product_type: Option<String>,
    #[serde(rename = "Image Src")]
    image_src: Option<String>,
    #[serde(rename = "Status")]
    status: Option<String>,
    #[serde(rename = "Published")]
    published: Option<String>,
}

impl ShopifyRow {
    fn is_unavailable(&self) -> bool {
        let draft = self
            .status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("draft"));
        let unpublished = self
            .published
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("false"));
        draft || unpublished
    }

    fn into_draft(self, handle: &str, opts: &ShopifyOptions) -> Result<ProductDraft, String> {
        let price = parse_price(self.price.as_deref())?;
        let availability = if self.is_unavailable() { "out_of_stock" } else { "in_stock" };
        let id = self
            .sku
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| handle.to_string());

        Ok(ProductDraft {
            id,
            title: self.title.unwrap_or_default(),
            url: format!("{}/products/{handle}", opts.base_url.trim_end_matches('/')),
            availability: availability.to_string(),
            updated_at: now_rfc3339(),
            image_url: self.image_src,
            price,
            currency: price.map(|_| opts.currency.clone()),
            price_range: None,
            brand: self.vendor,
            category: self.product_type,
        })
    }
}

/// Import a Shopify product export.
pub fn import_shopify_csv(path: &Path, opts: &ShopifyOptions) -> Result<ImportOutcome, ImportError> {
    let text = read_input(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    reader
        .headers()
        .map_err(|e| ImportError::Csv { path: path.to_path_buf(), source: e })?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut outcome = ImportOutcome::default();
    for (idx, row) in reader.deserialize::<ShopifyRow>().enumerate() {
        let row_num = idx + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                outcome.reject(format!("Row {row_num}: {e}"));
                continue;
            }
        };

        let Some(handle) = row.handle.as_deref().map(str::trim).filter(|h| !h.is_empty()) else {
            outcome.reject(format!("Row {row_num}: missing Handle"));
            continue;
        };
        let handle = handle.to_string();
        if seen.contains(&handle) {
            continue;
        }
        if row.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
            outcome.reject(format!("Row {row_num}: missing Title"));
            continue;
        }

        match row
            .into_draft(&handle, opts)
            .and_then(|d| d.build().map_err(|e| e.to_string()))
        {
            Ok(product) => {
                seen.insert(handle);
                outcome.accept(product);
            }
            Err(reason) => outcome.reject(format!("Row {row_num}: {reason}")),
        }
    }

    debug!(
        path = %path.display(),
        imported = outcome.products.len(),
        rejected = outcome.rejected.len(),
        "imported Shopify export"
    );
    Ok(outcome)
}
