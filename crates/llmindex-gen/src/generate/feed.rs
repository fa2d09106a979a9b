//! `llm/feed/products.jsonl`: one compact JSON object per product.

use std::path::{Path, PathBuf};

use llmindex_core::Product;

use super::write_text;
use crate::error::GenerateError;

/// Render the feed. Every line ends with `\n`; no products renders `""`.
pub fn render_feed(products: &[Product]) -> Result<String, GenerateError> {
    let mut out = String::new();
    for p in products {
        out.push_str(&serde_json::to_string(&p.for_feed())?);
        out.push('\n');
    }
    Ok(out)
}

/// Write the feed under `<out_dir>/llm/feed/`.
pub fn write_feed(products: &[Product], out_dir: &Path) -> Result<PathBuf, GenerateError> {
    let path = out_dir.join("llm").join("feed").join("products.jsonl");
    write_text(&path, &render_feed(products)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use llmindex_core::ProductDraft;

    fn draft(id: &str) -> ProductDraft {
        ProductDraft {
            id: id.into(),
            title: "Thing".into(),
            url: format!("https://shop.example/{id}"),
            availability: "in_stock".into(),
            updated_at: "2026-01-01T00:00:00Z".into(),
            ..ProductDraft::default()
        }
    }

    #[test]
    fn one_line_per_product() {
        let products = vec![draft("a").build().unwrap(), draft("b").build().unwrap()];
        let text = render_feed(&products).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));
        assert!(text.starts_with(r#"{"id":"a","title":"Thing","url":"https://shop.example/a","availability":"in_stock","updated_at":"2026-01-01T00:00:00Z"}"#));
    }

    #[test]
    fn empty_feed_is_empty_string() {
        assert_eq!(render_feed(&[]).unwrap(), "");
    }

    #[test]
    fn unpaired_price_is_dropped() {
        let mut d = draft("p");
        d.price = Some(3.0);
        let text = render_feed(&[d.build().unwrap()]).unwrap();
        assert!(!text.contains("price"));
    }

    #[test]
    fn paired_price_is_kept() {
        let mut d = draft("p");
        d.price = Some(3.5);
        d.currency = Some("GBP".into());
        let text = render_feed(&[d.build().unwrap()]).unwrap();
        assert!(text.contains(r#""price":3.5,"currency":"GBP""#));
    }
}
