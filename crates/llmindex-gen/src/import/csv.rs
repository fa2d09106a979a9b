//! Flat products CSV.
//!
//! Columns: `id,title,url,image_url,price,currency,availability,brand,
//! category,updated_at`. Column order does not matter and unknown columns
//! are ignored. The header is row 1, so the first product is row 2.

use std::path::Path;

use llmindex_core::{now_rfc3339, ProductDraft};
use serde::Deserialize;
use tracing::debug;

use super::{parse_price, read_input, ImportOutcome};
use crate::error::ImportError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    id: Option<String>,
    title: Option<String>,
    url: Option<String>,
    image_url: Option<String>,
    price: Option<String>,
    currency: Option<String>,
    availability: Option<String>,
    brand: Option<String>,
    category: Option<String>,
    updated_at: Option<String>,
}

impl CsvRow {
    fn into_draft(self) -> Result<ProductDraft, String> {
        let price = parse_price(self.price.as_deref())?;
        let updated_at = self
            .updated_at
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(now_rfc3339);
        let availability = self
            .availability
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "in_stock".to_string());

        Ok(ProductDraft {
            id: self.id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            availability,
            updated_at,
            image_url: self.image_url,
            price,
            currency: self.currency,
            price_range: None,
            brand: self.brand,
            category: self.category,
        })
    }
}

/// Import a products CSV. A UTF-8 byte-order mark is tolerated.
pub fn import_csv(path: &Path) -> Result<ImportOutcome, ImportError> {
    let text = read_input(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    reader
        .headers()
        .map_err(|e| ImportError::Csv { path: path.to_path_buf(), source: e })?;

    let mut outcome = ImportOutcome::default();
    for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row_num = idx + 2;
        let built = row
            .map_err(|e| e.to_string())
            .and_then(CsvRow::into_draft)
            .and_then(|draft| draft.build().map_err(|e| e.to_string()));
        match built {
            Ok(product) => outcome.accept(product),
            Err(reason) => outcome.reject(format!("Row {row_num}: {reason}")),
        }
    }

    debug!(
        path = %path.display(),
        imported = outcome.products.len(),
        rejected = outcome.rejected.len(),
        "imported products CSV"
    );
    Ok(outcome)
}
