//! JSON array of product objects.
//!
//! Items use the feed's field names. Missing or empty `updated_at` becomes
//! now, missing or empty `availability` becomes `in_stock`, and prices may
//! be numbers or numeric strings. Unknown keys are ignored.

use std::path::Path;

use llmindex_core::{now_rfc3339, PriceRange, ProductDraft};
use serde_json::{Map, Value};
use tracing::debug;

use super::{parse_price, read_input, ImportOutcome};
use crate::error::ImportError;

/// Import a JSON array of products.
pub fn import_json(path: &Path) -> Result<ImportOutcome, ImportError> {
    let text = read_input(path)?;
    let data: Value = serde_json::from_str(&text)
        .map_err(|e| ImportError::Json { path: path.to_path_buf(), source: e })?;
    let items = match data {
        Value::Array(items) => items,
        other => return Err(ImportError::NotAnArray { found: type_name(&other) }),
    };

    let mut outcome = ImportOutcome::default();
    for (i, item) in items.iter().enumerate() {
        let Value::Object(obj) = item else {
            outcome.reject(format!("Item {i}: expected object, got {}", type_name(item)));
            continue;
        };
        let built = draft_from_object(obj).and_then(|d| d.build().map_err(|e| e.to_string()));
        match built {
            Ok(product) => outcome.accept(product),
            Err(reason) => outcome.reject(format!("Item {i}: {reason}")),
        }
    }

    debug!(
        path = %path.display(),
        imported = outcome.products.len(),
        rejected = outcome.rejected.len(),
        "imported products JSON"
    );
    Ok(outcome)
}

fn draft_from_object(obj: &Map<String, Value>) -> Result<ProductDraft, String> {
    let updated_at = text(obj, "updated_at")?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(now_rfc3339);
    let availability = text(obj, "availability")?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "in_stock".to_string());

    let price = match obj.get("price") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_price(Some(s))?,
        Some(other) => return Err(format!("price must be a number, got {}", type_name(other))),
    };

    let price_range = match obj.get("price_range") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            serde_json::from_value::<PriceRange>(v.clone())
                .map_err(|e| format!("invalid price_range: {e}"))?,
        ),
    };

    Ok(ProductDraft {
        id: text(obj, "id")?.unwrap_or_default(),
        title: text(obj, "title")?.unwrap_or_default(),
        url: text(obj, "url")?.unwrap_or_default(),
        availability,
        updated_at,
        image_url: text(obj, "image_url")?,
        price,
        currency: text(obj, "currency")?,
        price_range,
        brand: text(obj, "brand")?,
        category: text(obj, "category")?,
    })
}

/// A string field; absent and `null` are `None`, other types are rejected.
fn text(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(format!("{key} must be a string, got {}", type_name(other))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
