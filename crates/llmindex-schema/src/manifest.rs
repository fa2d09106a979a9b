//! # Manifest Validator
//!
//! Checks a `/.well-known/llmindex.json` document in two layers:
//!
//! 1. **Structure**: the JSON Schema selected by the document's `version`.
//!    Every violation becomes one `Schema: <path> — <message>` error.
//! 2. **Business rules**: cross-field semantics the schema cannot express.
//!    Only an `http://` canonical URL is an error; the rest are warnings.
//!
//! Only an unreadable or unparseable file stops validation early. Every
//! other check runs independently of the others.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use llmindex_core::parse_timestamp_lenient;
use serde_json::{Map, Value};
use tracing::debug;

use crate::result::ValidationResult;
use crate::store::schema_for_version;
use crate::violation::collect_violations;

/// Age beyond which `feed_updated_at` is reported as stale.
pub const FEED_STALE_AFTER_DAYS: i64 = 7;

/// Validate the manifest file at `path`.
pub fn validate_manifest(path: impl AsRef<Path>) -> ValidationResult {
    validate_manifest_at(path, Utc::now())
}

/// Validate the manifest file at `path`, judging feed freshness against
/// `now`.
pub fn validate_manifest_at(path: impl AsRef<Path>, now: DateTime<Utc>) -> ValidationResult {
    let path = path.as_ref();
    if !path.exists() {
        return ValidationResult::failed(format!("File not found: {}", path.display()));
    }

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return ValidationResult::failed(format!("Cannot read {}: {e}", path.display()))
        }
    };

    let data: Value = match serde_json::from_slice(&bytes) {
        Ok(data) => data,
        Err(e) => return ValidationResult::failed(format!("Invalid JSON: {e}")),
    };

    debug!(path = %path.display(), "validating manifest");
    validate_manifest_value(&data, now)
}

/// Validate an already-parsed manifest document.
pub fn validate_manifest_value(data: &Value, now: DateTime<Utc>) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_structure(data, &mut result);

    if let Value::Object(doc) = data {
        let canonical = doc
            .get("entity")
            .and_then(|e| e.get("canonical_url"))
            .and_then(Value::as_str)
            .unwrap_or("");

        check_https(canonical, &mut result);
        if !canonical.is_empty() {
            if let Some(Value::Object(endpoints)) = doc.get("endpoints") {
                check_hosts(canonical, endpoints, "endpoints", &mut result);
            }
        }
        if let Some(Value::Object(ac)) = doc.get("access_control") {
            check_access_control(ac, &mut result);
        }
        check_localization(doc, canonical, &mut result);
        check_feed_freshness(doc, now, &mut result);
    }

    result
}

fn check_structure(data: &Value, result: &mut ValidationResult) {
    let declared = data.get("version").and_then(Value::as_str);
    let (schema, warning) = match schema_for_version(declared) {
        Ok(selection) => selection,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };
    if let Some(warning) = warning {
        result.add_warning(warning);
    }

    let validator = match schema.compile() {
        Ok(v) => v,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };

    // On fallback the document is checked as if it declared the fallback
    // tag; messages above already name the original value.
    let coerced;
    let instance = match (data, schema.version()) {
        (Value::Object(doc), Some(version)) if declared != Some(version.as_str()) => {
            let mut doc = doc.clone();
            doc.insert("version".to_string(), Value::String(version.as_str().to_string()));
            coerced = Value::Object(doc);
            &coerced
        }
        _ => data,
    };

    for violation in collect_violations(&validator, instance) {
        result.add_error(format!("Schema: {violation}"));
    }
}

fn check_https(canonical: &str, result: &mut ValidationResult) {
    if !canonical.is_empty() && !canonical.starts_with("https://") {
        result.add_error(format!("entity.canonical_url must be HTTPS, got: {canonical}"));
    }
}

fn host_of(raw: &str) -> Option<String> {
    url::Url::parse(raw).ok()?.host_str().map(str::to_string)
}

/// Warn for every URL in `urls` whose host differs from the canonical
/// URL's. Skipped entirely when the canonical URL has no host; non-string
/// and host-less entries are ignored.
fn check_hosts(canonical: &str, urls: &Map<String, Value>, prefix: &str, result: &mut ValidationResult) {
    let Some(expected) = host_of(canonical) else {
        return;
    };
    for (name, url) in urls {
        let Some(actual) = url.as_str().and_then(host_of) else {
            continue;
        };
        if actual != expected {
            result.add_warning(format!(
                "{prefix}.{name} host ({actual}) differs from canonical ({expected})"
            ));
        }
    }
}

fn string_entries(value: Option<&Value>) -> Vec<&str> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn check_access_control(ac: &Map<String, Value>, result: &mut ValidationResult) {
    let allow = string_entries(ac.get("allow"));
    let deny = string_entries(ac.get("deny"));

    if deny.contains(&"*") {
        result.add_warning("access_control.deny contains '*' which will block all AI agents");
    }

    if !allow.is_empty() && !deny.is_empty() {
        let allowed: BTreeSet<&str> = allow.iter().copied().collect();
        let denied: BTreeSet<&str> = deny.iter().copied().collect();
        for entry in allowed.intersection(&denied).filter(|e| **e != "*") {
            result.add_warning(format!(
                "access_control: '{entry}' appears in both allow and deny; deny takes precedence"
            ));
        }
    }

    if ac.get("commercial_use").and_then(Value::as_str) == Some("contact-required")
        && allow == ["*"]
    {
        result.add_warning(
            "access_control.commercial_use is 'contact-required' but allow=['*']; \
             consider restricting allow or adding contact information to about page",
        );
    }
}

fn check_localization(doc: &Map<String, Value>, canonical: &str, result: &mut ValidationResult) {
    let languages = doc.get("languages").and_then(Value::as_array);
    let localized = doc.get("localized_endpoints").and_then(Value::as_object);

    match (languages, localized) {
        (Some(_), None) | (None, Some(_)) => {
            result.add_warning("languages and localized_endpoints should be provided together");
        }
        (Some(languages), Some(localized)) => {
            let declared: BTreeSet<&str> = languages.iter().filter_map(Value::as_str).collect();
            for (lang, endpoints) in localized {
                if !declared.contains(lang.as_str()) {
                    result.add_warning(format!(
                        "localized_endpoints includes '{lang}' which is not present in languages"
                    ));
                }
                if canonical.is_empty() {
                    continue;
                }
                if let Value::Object(endpoints) = endpoints {
                    let prefix = format!("localized_endpoints.{lang}");
                    check_hosts(canonical, endpoints, &prefix, result);
                }
            }
        }
        (None, None) => {}
    }
}

/// Unparseable timestamps are skipped silently. `format: date-time` is
/// not asserted, so they produce no schema error either.
fn check_feed_freshness(doc: &Map<String, Value>, now: DateTime<Utc>, result: &mut ValidationResult) {
    let Some(raw) = doc.get("feed_updated_at").and_then(Value::as_str) else {
        return;
    };
    if let Some(stamp) = parse_timestamp_lenient(raw) {
        if now - stamp > Duration::days(FEED_STALE_AFTER_DAYS) {
            result.add_warning("feed_updated_at is older than 7 days");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn base(version: &str) -> Value {
        json!({
            "version": version,
            "updated_at": "2026-01-01T00:00:00Z",
            "entity": {"name": "Shop", "canonical_url": "https://shop.example"},
            "language": "en",
            "topics": ["general"],
            "endpoints": {
                "products": "https://shop.example/llm/products",
                "policies": "https://shop.example/llm/policies",
                "faq": "https://shop.example/llm/faq",
                "about": "https://shop.example/llm/about"
            }
        })
    }

    fn with(mut doc: Value, key: &str, value: Value) -> Value {
        doc[key] = value;
        doc
    }

    #[test]
    fn minimal_manifests_are_clean() {
        for v in ["0.1", "0.2"] {
            let r = validate_manifest_value(&base(v), now());
            assert!(r.is_valid(), "{v}: {:?}", r.errors());
            assert!(r.warnings().is_empty(), "{v}: {:?}", r.warnings());
        }
    }

    #[test]
    fn non_string_version_is_treated_as_missing() {
        // A numeric version takes the fallback like an absent one and is
        // coerced, so it does not trip the schema's `const`.
        let r = validate_manifest_value(&with(base("0.1"), "version", json!(2)), now());
        assert!(r.is_valid(), "{:?}", r.errors());
        assert_eq!(
            r.warnings(),
            ["Missing or unknown manifest version, validating against llmindex v0.1 schema"]
        );
    }

    #[test]
    fn unknown_version_is_coerced_and_warned() {
        let r = validate_manifest_value(&base("7.0"), now());
        assert!(r.is_valid(), "{:?}", r.errors());
        assert_eq!(
            r.warnings(),
            ["Unknown manifest version '7.0', validating against llmindex v0.1 schema"]
        );
    }

    #[test]
    fn unknown_top_level_key_is_error() {
        let r = validate_manifest_value(&with(base("0.1"), "extra", json!(1)), now());
        assert!(!r.is_valid());
        assert!(r.errors()[0].starts_with("Schema: (root) — "), "{:?}", r.errors());
        assert!(r.errors()[0].contains("extra"));
    }

    #[test]
    fn v02_fields_are_rejected_by_v01() {
        let doc = with(base("0.1"), "feed_updated_at", json!("2026-02-28T00:00:00Z"));
        assert!(!validate_manifest_value(&doc, now()).is_valid());
        let doc = with(base("0.2"), "feed_updated_at", json!("2026-02-28T00:00:00Z"));
        assert!(validate_manifest_value(&doc, now()).is_valid());
    }

    #[test]
    fn schema_errors_use_dotted_paths_in_order() {
        let mut doc = base("0.1");
        doc["topics"] = json!([]);
        doc["entity"]["name"] = json!("");
        let r = validate_manifest_value(&doc, now());
        let errors = r.errors();
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors[0].starts_with("Schema: entity.name — "));
        assert!(errors[1].starts_with("Schema: topics — "));
    }

    #[test]
    fn http_canonical_is_an_error() {
        let mut doc = base("0.1");
        doc["entity"]["canonical_url"] = json!("http://shop.example");
        let r = validate_manifest_value(&doc, now());
        assert!(!r.is_valid());
        assert!(r
            .errors()
            .contains(&"entity.canonical_url must be HTTPS, got: http://shop.example".to_string()));
    }

    #[test]
    fn endpoint_host_mismatch_is_warning() {
        let mut doc = base("0.1");
        doc["endpoints"]["faq"] = json!("https://help.other.example/faq");
        let r = validate_manifest_value(&doc, now());
        assert!(r.is_valid());
        assert_eq!(
            r.warnings(),
            ["endpoints.faq host (help.other.example) differs from canonical (shop.example)"]
        );
    }

    #[test]
    fn host_check_skipped_without_canonical_host() {
        let mut doc = base("0.1");
        doc["entity"]["canonical_url"] = json!("not-a-url");
        doc["endpoints"]["faq"] = json!("https://elsewhere.example/faq");
        let r = validate_manifest_value(&doc, now());
        assert!(!r.warnings().iter().any(|w| w.contains("differs from canonical")));
    }

    #[test]
    fn deny_wildcard_warns_without_invalidating() {
        let doc = with(base("0.1"), "access_control", json!({"deny": ["*"]}));
        let r = validate_manifest_value(&doc, now());
        assert!(r.is_valid());
        assert_eq!(r.warnings(), ["access_control.deny contains '*' which will block all AI agents"]);
    }

    #[test]
    fn overlap_warns_once_per_entry_sorted() {
        let doc = with(
            base("0.1"),
            "access_control",
            json!({"allow": ["ZetaBot", "GPTBot", "*"], "deny": ["GPTBot", "ZetaBot", "*"]}),
        );
        let r = validate_manifest_value(&doc, now());
        assert_eq!(
            r.warnings(),
            [
                "access_control.deny contains '*' which will block all AI agents",
                "access_control: 'GPTBot' appears in both allow and deny; deny takes precedence",
                "access_control: 'ZetaBot' appears in both allow and deny; deny takes precedence",
            ]
        );
    }

    #[test]
    fn contact_required_with_open_allow_warns() {
        let doc = with(
            base("0.1"),
            "access_control",
            json!({"allow": ["*"], "commercial_use": "contact-required"}),
        );
        let r = validate_manifest_value(&doc, now());
        assert!(r.is_valid());
        assert_eq!(r.warnings().len(), 1);
        assert!(r.warnings()[0].starts_with("access_control.commercial_use is 'contact-required'"));
    }

    #[test]
    fn bad_rate_limit_and_commercial_use_are_schema_errors() {
        let doc = with(base("0.1"), "access_control", json!({"rate_limit": "1000-per-day"}));
        let r = validate_manifest_value(&doc, now());
        assert!(r.errors().iter().any(|e| e.starts_with("Schema: access_control.rate_limit")));

        let doc = with(base("0.1"), "access_control", json!({"commercial_use": "unknown-value"}));
        let r = validate_manifest_value(&doc, now());
        assert!(r.errors().iter().any(|e| e.contains("commercial_use")));
    }

    #[test]
    fn languages_without_localized_endpoints_warns() {
        let doc = with(base("0.2"), "languages", json!(["en", "zh-CN"]));
        let r = validate_manifest_value(&doc, now());
        assert!(r.is_valid(), "{:?}", r.errors());
        assert_eq!(r.warnings(), ["languages and localized_endpoints should be provided together"]);
    }

    #[test]
    fn localized_checks_undeclared_language_and_hosts() {
        let mut doc = with(base("0.2"), "languages", json!(["en"]));
        doc["localized_endpoints"] = json!({
            "zh-CN": {"products": "https://cn.shop.example/llm/products"}
        });
        let r = validate_manifest_value(&doc, now());
        assert!(r.is_valid(), "{:?}", r.errors());
        assert_eq!(
            r.warnings(),
            [
                "localized_endpoints includes 'zh-CN' which is not present in languages",
                "localized_endpoints.zh-CN.products host (cn.shop.example) differs from canonical (shop.example)",
            ]
        );
    }

    #[test]
    fn stale_feed_timestamp_warns() {
        let stale = format!("{}", (now() - Duration::days(8)).format("%Y-%m-%dT%H:%M:%SZ"));
        let fresh = format!("{}", (now() - Duration::days(1)).format("%Y-%m-%dT%H:%M:%SZ"));

        let r = validate_manifest_value(&with(base("0.2"), "feed_updated_at", json!(stale)), now());
        assert_eq!(r.warnings(), ["feed_updated_at is older than 7 days"]);

        let r = validate_manifest_value(&with(base("0.2"), "feed_updated_at", json!(fresh)), now());
        assert!(r.warnings().is_empty());
    }

    #[test]
    fn naive_feed_timestamp_is_utc() {
        let doc = with(base("0.2"), "feed_updated_at", json!("2026-02-20T12:00:00"));
        let r = validate_manifest_value(&doc, now());
        assert!(r.is_valid(), "{:?}", r.errors());
        assert!(r.errors().is_empty());
        assert_eq!(r.warnings(), ["feed_updated_at is older than 7 days"]);
    }

    #[test]
    fn unparseable_feed_timestamp_adds_no_warning() {
        let doc = with(base("0.2"), "feed_updated_at", json!("last tuesday"));
        let r = validate_manifest_value(&doc, now());
        assert!(r.is_valid(), "{:?}", r.errors());
        assert!(r.errors().is_empty());
        assert!(r.warnings().is_empty());
    }

    #[test]
    fn format_keywords_are_not_asserted() {
        let mut doc = base("0.1");
        doc["updated_at"] = json!("2026-01-01");
        doc["endpoints"]["faq"] = json!("/llm/faq");
        let r = validate_manifest_value(&doc, now());
        assert!(r.is_valid(), "{:?}", r.errors());
    }

    #[test]
    fn non_object_document_gets_schema_error_only() {
        let r = validate_manifest_value(&json!([1, 2]), now());
        assert!(!r.is_valid());
        assert!(r.errors().iter().all(|e| e.starts_with("Schema: (root) — ")));
    }
}
