//! # Feed Validator
//!
//! Line-by-line validation of `products.jsonl` against the `product_line`
//! definition. A bad line is reported and skipped; it never stops the
//! lines after it from being checked.

use std::path::Path;

use jsonschema::Validator;
use serde_json::Value;
use tracing::debug;

use crate::result::ValidationResult;
use crate::store::product_line_schema;
use crate::violation::collect_violations;

/// Validate the feed file at `path`.
pub fn validate_feed(path: impl AsRef<Path>) -> ValidationResult {
    let path = path.as_ref();
    if !path.exists() {
        return ValidationResult::failed(format!("File not found: {}", path.display()));
    }

    let validator = match product_line_schema().and_then(|s| s.compile()) {
        Ok(v) => v,
        Err(e) => return ValidationResult::failed(e.to_string()),
    };

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return ValidationResult::failed(format!("Cannot read {}: {e}", path.display())),
    };

    debug!(path = %path.display(), "validating feed");
    validate_feed_text(&text, &validator)
}

/// Validate feed content already in memory.
///
/// On success the result carries one informational warning,
/// `Validated <N> product lines`, where `N` counts every line between the
/// first and last non-blank ones.
pub fn validate_feed_text(text: &str, validator: &Validator) -> ValidationResult {
    let mut result = ValidationResult::new();

    let lines: Vec<&str> = text.trim().split('\n').collect();
    if lines.len() == 1 && lines[0].trim().is_empty() {
        result.add_error("Feed file is empty");
        return result;
    }

    for (i, line) in lines.iter().enumerate() {
        let n = i + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let obj: Value = match serde_json::from_str(line) {
            Ok(obj) => obj,
            Err(e) => {
                result.add_error(format!("Line {n}: Invalid JSON — {e}"));
                continue;
            }
        };

        for violation in collect_violations(validator, &obj) {
            result.add_error(format!("Line {n}: {violation}"));
        }
    }

    if result.is_valid() {
        result.add_warning(format!("Validated {} product lines", lines.len()));
    }
    result
}
