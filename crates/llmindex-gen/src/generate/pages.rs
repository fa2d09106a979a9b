//! Markdown pages under `llm/`.
//!
//! `products.md` lists the catalog by category. The other three pages are
//! fixed templates filled with the site's name, URL, language, and topics.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use llmindex_core::{Product, SiteConfig};

use super::write_text;
use crate::error::GenerateError;

const UNCATEGORIZED: &str = "Other";

/// `products.md`: categories sorted by name, products in input order.
pub fn products_page(products: &[Product], config: &SiteConfig) -> String {
    let mut by_category: BTreeMap<&str, Vec<&Product>> = BTreeMap::new();
    for p in products {
        by_category
            .entry(p.category.as_deref().unwrap_or(UNCATEGORIZED))
            .or_default()
            .push(p);
    }

    let mut lines = vec![format!("# {} — Products\n", config.name)];
    for (category, items) in by_category {
        lines.push(format!("\n## {category}\n"));
        for p in items {
            let price = match p.priced() {
                Some((amount, currency)) => format!("{currency} {amount:.2}"),
                None => "Price on request".to_string(),
            };
            lines.push(format!(
                "- **[{}]({})** — {price} ({})",
                p.title,
                p.url,
                p.availability.label()
            ));
        }
    }
    lines.join("\n") + "\n"
}

pub fn policies_page(config: &SiteConfig) -> String {
    format!(
        "\
# {name} — Policies

## Shipping Policy

We ship to all domestic addresses. International shipping is available for select regions.

- **Standard shipping**: 5–7 business days
- **Express shipping**: 2–3 business days
- **Free shipping**: On orders over $50

## Return Policy

We accept returns within 30 days of purchase. Items must be unused and in original packaging.

- Refunds are processed within 5–10 business days
- Return shipping is the responsibility of the customer
- Defective items are eligible for free return shipping

## Warranty

All products come with a 1-year manufacturer warranty covering defects in materials and workmanship.

## Payment Methods

We accept the following payment methods:

- Credit/Debit cards (Visa, Mastercard, Amex)
- PayPal
- Apple Pay / Google Pay
",
        name = config.name
    )
}

pub fn faq_page(config: &SiteConfig) -> String {
    format!(
        "\
# {name} — FAQ

## Orders & Shipping

**Q: How long does shipping take?**
A: Standard shipping takes 5–7 business days. Express shipping takes 2–3 business days.

**Q: Do you ship internationally?**
A: Yes, we ship to select international destinations. Shipping costs and delivery times vary by
location.

**Q: How can I track my order?**
A: Once your order ships, you will receive a tracking number via email.

## Returns & Exchanges

**Q: What is your return policy?**
A: We accept returns within 30 days of purchase for unused items in original packaging.

**Q: How do I start a return?**
A: Contact our support team with your order number and reason for return.

## Products

**Q: Are your products covered by warranty?**
A: Yes, all products come with a 1-year manufacturer warranty.

**Q: Where are your products made?**
A: Our products are designed in-house and manufactured by trusted partners worldwide.
",
        name = config.name
    )
}

pub fn about_page(config: &SiteConfig) -> String {
    format!(
        "\
# About {name}

## Our Story

{name} is dedicated to providing high-quality products for our customers.

## Contact

- **Website**: {url}
- **Email**: support@{domain}

## Language

Primary language: {language}

## Topics

{topics}
",
        name = config.name,
        url = config.canonical_url,
        domain = config.domain(),
        language = config.language,
        topics = config.topics.join(", "),
    )
}

/// Write all four pages to `<out_dir>/llm/`, returning their paths in the
/// order products, policies, faq, about.
pub fn write_pages(
    products: &[Product],
    config: &SiteConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, GenerateError> {
    let dir = out_dir.join("llm");
    let pages = [
        ("products.md", products_page(products, config)),
        ("policies.md", policies_page(config)),
        ("faq.md", faq_page(config)),
        ("about.md", about_page(config)),
    ];

    let mut written = Vec::with_capacity(pages.len());
    for (file, content) in pages {
        let path = dir.join(file);
        write_text(&path, &content)?;
        written.push(path);
    }
    Ok(written)
}
