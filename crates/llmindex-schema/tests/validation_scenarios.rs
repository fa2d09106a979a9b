//! # Manifest & Feed Validation Scenarios
//!
//! End-to-end checks through the file-based entry points:
//! - Version fallback with a missing `version`
//! - HTTPS enforcement on `entity.canonical_url`
//! - Feed lines missing required fields
//! - Feed freshness relative to the current time
//! - Feed auto-discovery from the manifest location

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use llmindex_schema::{validate_all, validate_feed, validate_manifest};
use serde_json::{json, Value};

fn base_manifest() -> Value {
    json!({
        "version": "0.1",
        "updated_at": "2026-01-01T00:00:00Z",
        "entity": {"name": "Test Shop", "canonical_url": "https://example.com"},
        "language": "en",
        "topics": ["electronics"],
        "endpoints": {
            "products": "https://example.com/llm/products",
            "policies": "https://example.com/llm/policies",
            "faq": "https://example.com/llm/faq",
            "about": "https://example.com/llm/about"
        }
    })
}

fn write_json(path: &Path, value: &Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Lay out `<root>/.well-known/llmindex.json`, returning its path.
fn site_manifest(root: &Path, value: &Value) -> PathBuf {
    let path = root.join(".well-known").join("llmindex.json");
    write_json(&path, value);
    path
}

fn product_line(id: &str) -> String {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "url": format!("https://example.com/p/{id}"),
        "price": 19.99,
        "currency": "USD",
        "availability": "in_stock",
        "updated_at": "2026-01-01T00:00:00Z"
    })
    .to_string()
}

// =========================================================================
// Manifest
// =========================================================================

#[test]
fn scenario_a_missing_version_falls_back_and_stays_valid() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = base_manifest();
    doc.as_object_mut().unwrap().remove("version");
    let path = dir.path().join("llmindex.json");
    write_json(&path, &doc);

    let r = validate_manifest(&path);
    assert!(r.is_valid(), "{:?}", r.errors());
    assert!(r.errors().is_empty());
    assert!(r.warnings().contains(
        &"Missing or unknown manifest version, validating against llmindex v0.1 schema".to_string()
    ));
}

#[test]
fn scenario_b_http_canonical_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = base_manifest();
    doc["entity"]["canonical_url"] = json!("http://example.com");
    let path = dir.path().join("llmindex.json");
    write_json(&path, &doc);

    let r = validate_manifest(&path);
    assert!(!r.is_valid());
    assert!(r
        .errors()
        .iter()
        .any(|e| e.contains("entity.canonical_url must be HTTPS, got: http://example.com")));
}

#[test]
fn scenario_d_feed_freshness_window() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("llmindex.json");
    let stamp = |days: i64| {
        (Utc::now() - Duration::days(days)).format("%Y-%m-%dT%H:%M:%SZ").to_string()
    };

    let mut doc = base_manifest();
    doc["version"] = json!("0.2");
    doc["feed_updated_at"] = json!(stamp(8));
    write_json(&path, &doc);
    let r = validate_manifest(&path);
    assert!(r.warnings().iter().any(|w| w.contains("feed_updated_at is older than 7 days")));
    assert!(r.is_valid());

    doc["feed_updated_at"] = json!(stamp(1));
    write_json(&path, &doc);
    let r = validate_manifest(&path);
    assert!(!r.warnings().iter().any(|w| w.contains("feed_updated_at")));
}

#[test]
fn missing_manifest_short_circuits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let r = validate_manifest(&path);
    assert_eq!(r.errors(), [format!("File not found: {}", path.display())]);
    assert!(r.warnings().is_empty());
}

#[test]
fn invalid_json_short_circuits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("llmindex.json");
    std::fs::write(&path, "{not json").unwrap();
    let r = validate_manifest(&path);
    assert_eq!(r.errors().len(), 1);
    assert!(r.errors()[0].starts_with("Invalid JSON: "));
    assert!(r.warnings().is_empty());
}

#[test]
fn validating_twice_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = base_manifest();
    doc["version"] = json!("3.0");
    doc["extra"] = json!(true);
    doc["access_control"] = json!({"allow": ["A", "B"], "deny": ["B", "*"]});
    let path = dir.path().join("llmindex.json");
    write_json(&path, &doc);

    let first = validate_manifest(&path);
    let second = validate_manifest(&path);
    assert_eq!(first, second);
    assert!(!first.is_valid());
}

// =========================================================================
// Feed
// =========================================================================

#[test]
fn scenario_c_feed_line_missing_required_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.jsonl");
    std::fs::write(&path, "{\"id\": \"1\"}\n").unwrap();

    let r = validate_feed(&path);
    assert!(!r.is_valid());
    for field in ["title", "url", "availability", "updated_at"] {
        assert!(
            r.errors().iter().any(|e| e.contains("Line 1") && e.contains(field)),
            "missing error for {field}: {:?}",
            r.errors()
        );
    }
}

#[test]
fn empty_feed_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.jsonl");
    std::fs::write(&path, "").unwrap();
    assert_eq!(validate_feed(&path).errors(), ["Feed file is empty"]);
}

#[test]
fn malformed_lines_are_each_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.jsonl");
    let content = format!("{}\n{{broken\n{}\n[oops\n", product_line("1"), product_line("2"));
    std::fs::write(&path, content).unwrap();

    let r = validate_feed(&path);
    assert!(!r.is_valid());
    assert_eq!(r.errors().len(), 2, "{:?}", r.errors());
    assert!(r.errors()[0].starts_with("Line 2: Invalid JSON — "));
    assert!(r.errors()[1].starts_with("Line 4: Invalid JSON — "));
}

// =========================================================================
// Combined
// =========================================================================

#[test]
fn scenario_e_feed_is_auto_discovered() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = site_manifest(dir.path(), &base_manifest());
    let feed_dir = dir.path().join("llm").join("feed");
    std::fs::create_dir_all(&feed_dir).unwrap();
    std::fs::write(feed_dir.join("products.jsonl"), "{\"id\": \"1\"}\n").unwrap();

    let r = validate_all(&manifest, None);
    assert!(!r.is_valid());
    assert!(r
        .warnings()
        .iter()
        .any(|w| w.starts_with("Auto-detected feed: ") && w.ends_with("products.jsonl")));
    assert!(r.errors().iter().any(|e| e.starts_with("Line 1: ")));
}

#[test]
fn explicit_feed_is_merged() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = site_manifest(dir.path(), &base_manifest());
    let feed = dir.path().join("custom.jsonl");
    std::fs::write(&feed, format!("{}\n{}\n", product_line("1"), product_line("2"))).unwrap();

    let r = validate_all(&manifest, Some(&feed));
    assert!(r.is_valid(), "{:?}", r.errors());
    assert_eq!(r.warnings(), ["Validated 2 product lines"]);
}

#[test]
fn no_feed_means_manifest_only() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = site_manifest(dir.path(), &base_manifest());
    let r = validate_all(&manifest, None);
    assert!(r.is_valid());
    assert!(r.warnings().is_empty());
}

#[test]
fn invalid_manifest_and_valid_feed_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = base_manifest();
    doc["entity"]["canonical_url"] = json!("http://example.com");
    let manifest = site_manifest(dir.path(), &doc);
    let feed_dir = dir.path().join("llm").join("feed");
    std::fs::create_dir_all(&feed_dir).unwrap();
    std::fs::write(feed_dir.join("products.jsonl"), product_line("1")).unwrap();

    let r = validate_all(&manifest, None);
    assert!(!r.is_valid());
    assert!(r.warnings().iter().any(|w| w == "Validated 1 product lines"));
}
