//! # Product Model
//!
//! A `Product` is one line of `products.jsonl`. Importers never build a
//! `Product` directly: they fill a [`ProductDraft`] from whatever shape the
//! source has and call [`ProductDraft::build`], which applies the same rules
//! the feed schema enforces. A product that builds will validate.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::temporal::{format_rfc3339, parse_timestamp_lenient};

/// Stock status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Available for immediate purchase.
    InStock,
    /// Not currently available.
    OutOfStock,
    /// Orderable ahead of release.
    Preorder,
}

impl Availability {
    /// The wire value used in the feed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::OutOfStock => "out_of_stock",
            Self::Preorder => "preorder",
        }
    }

    /// Human label used on the products page.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::OutOfStock => "Out of Stock",
            Self::Preorder => "Pre-order",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = ModelError;

    /// Accepts the wire values plus the spellings common in spreadsheet
    /// exports ("In Stock", "pre-order", ...), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in_stock" | "in stock" => Ok(Self::InStock),
            "out_of_stock" | "out of stock" => Ok(Self::OutOfStock),
            "preorder" | "pre-order" | "pre order" => Ok(Self::Preorder),
            _ => Err(ModelError::InvalidAvailability(s.trim().to_string())),
        }
    }
}

/// Price bounds for products sold at variable prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest price.
    pub min: f64,
    /// Highest price.
    pub max: f64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// A validated catalog item.
///
/// Field order is the feed's line layout: required fields first, then
/// optional ones. On a feed line `price` and `currency` are either both
/// present or both absent; see [`Product::for_feed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub url: String,
    pub availability: Availability,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Unvalidated product fields as an importer collected them.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub id: String,
    pub title: String,
    pub url: String,
    pub availability: String,
    pub updated_at: String,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub price_range: Option<PriceRange>,
    pub brand: Option<String>,
    pub category: Option<String>,
}

impl ProductDraft {
    /// Validate the draft and produce a `Product`.
    ///
    /// A price without a currency (or the reverse) is kept on the product
    /// but dropped from the feed line; see [`Product::priced`].
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] naming the first field that fails.
    pub fn build(self) -> Result<Product, ModelError> {
        let id = non_empty("id", self.id)?;
        let title = non_empty("title", self.title)?;
        let url = non_empty("url", self.url)?;
        let updated_at = normalize_timestamp(&self.updated_at)?;
        let availability: Availability = self.availability.parse()?;

        if let Some(price) = self.price {
            check_price("price", price)?;
        }
        let currency = self.currency.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        if let Some(ref c) = currency {
            check_currency(c)?;
        }
        if let Some(ref range) = self.price_range {
            check_price("price_range.min", range.min)?;
            check_price("price_range.max", range.max)?;
            check_currency(&range.currency)?;
        }

        Ok(Product {
            id,
            title,
            url,
            availability,
            updated_at,
            image_url: optional(self.image_url),
            price: self.price,
            currency,
            price_range: self.price_range,
            brand: optional(self.brand),
            category: optional(self.category),
        })
    }
}

impl Product {
    /// `(price, currency)` when both are known.
    pub fn priced(&self) -> Option<(f64, &str)> {
        match (self.price, self.currency.as_deref()) {
            (Some(p), Some(c)) => Some((p, c)),
            _ => None,
        }
    }

    /// The product as it appears on a feed line: an unpaired price or
    /// currency is omitted.
    pub fn for_feed(&self) -> Product {
        let mut line = self.clone();
        if line.priced().is_none() {
            line.price = None;
            line.currency = None;
        }
        line
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// RFC 3339 input is kept verbatim; other lenient forms are rewritten as
/// `YYYY-MM-DDTHH:MM:SSZ`.
fn normalize_timestamp(value: &str) -> Result<String, ModelError> {
    let value = value.trim();
    if DateTime::parse_from_rfc3339(value).is_ok() {
        return Ok(value.to_string());
    }
    parse_timestamp_lenient(value)
        .map(|dt| format_rfc3339(&dt))
        .ok_or_else(|| ModelError::InvalidTimestamp(value.to_string()))
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_price(field: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidPrice { field, value: value.to_string() })
    }
}

fn check_currency(code: &str) -> Result<(), ModelError> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ModelError::InvalidCurrency(code.to_string()))
    }
}
