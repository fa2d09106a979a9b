//! # Domain-Verification Challenges
//!
//! A site proves control of its domain by publishing a value derived from
//! its base URL, either as a DNS TXT record at
//! `_llmindex-challenge.<host>` or as the body of
//! `/.well-known/llmindex-proof.txt`.

use url::Url;

use crate::error::ChallengeError;
use crate::sha256::sha256_hex_str;

/// Prefix of every challenge value.
pub const CHALLENGE_PREFIX: &str = "llmindex-verify=";

/// Label prepended to the host for the DNS TXT record.
pub const DNS_RECORD_LABEL: &str = "_llmindex-challenge";

/// Site-relative path of the HTTP proof file.
pub const HTTP_PROOF_PATH: &str = "/.well-known/llmindex-proof.txt";

/// Strip surrounding whitespace and trailing slashes.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// `llmindex-verify=` followed by the first 32 hex digits of the SHA-256
/// of the normalized URL.
pub fn challenge_value(url: &str) -> String {
    let digest = sha256_hex_str(&normalize_base_url(url));
    format!("{CHALLENGE_PREFIX}{}", &digest[..32])
}

/// Everything a site owner needs to publish for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainChallenge {
    /// Normalized HTTPS base URL.
    pub base_url: String,
    /// Host parsed from the base URL.
    pub host: String,
    /// Value to publish.
    pub value: String,
}

impl DomainChallenge {
    /// Build the challenge for an HTTPS site URL.
    pub fn for_url(url: &str) -> Result<Self, ChallengeError> {
        let base_url = normalize_base_url(url);
        if !base_url.starts_with("https://") {
            return Err(ChallengeError::NotHttps(base_url));
        }
        let host = Url::parse(&base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ChallengeError::NoHost(base_url.clone()))?;
        let value = challenge_value(&base_url);
        Ok(Self { base_url, host, value })
    }

    /// `_llmindex-challenge.<host>`
    pub fn dns_record_name(&self) -> String {
        format!("{DNS_RECORD_LABEL}.{}", self.host)
    }

    /// Absolute URL of the HTTP proof file.
    pub fn proof_url(&self) -> String {
        format!("{}{HTTP_PROOF_PATH}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn value_shape() {
        let v = challenge_value("https://example.com");
        assert!(v.starts_with(CHALLENGE_PREFIX));
        let hex = &v[CHALLENGE_PREFIX.len()..];
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn value_is_prefix_of_url_digest() {
        let full = sha256_hex_str("https://example.com");
        assert_eq!(challenge_value("https://example.com"), format!("llmindex-verify={}", &full[..32]));
    }

    #[test]
    fn normalization_ignores_trailing_slash_and_whitespace() {
        assert_eq!(
            challenge_value("  https://example.com/ "),
            challenge_value("https://example.com")
        );
    }

    #[test]
    fn challenge_for_https_url() {
        let c = DomainChallenge::for_url("https://shop.example.com/").unwrap();
        assert_eq!(c.base_url, "https://shop.example.com");
        assert_eq!(c.dns_record_name(), "_llmindex-challenge.shop.example.com");
        assert_eq!(c.proof_url(), "https://shop.example.com/.well-known/llmindex-proof.txt");
        assert_eq!(c.value, challenge_value("https://shop.example.com"));
    }

    #[test]
    fn http_url_rejected() {
        let err = DomainChallenge::for_url("http://example.com").unwrap_err();
        assert_eq!(err.to_string(), "URL must be HTTPS, got: http://example.com");
    }

    #[test]
    fn hostless_url_rejected() {
        let err = DomainChallenge::for_url("https://").unwrap_err();
        assert!(matches!(err, ChallengeError::NoHost(_)));
    }

    proptest! {
        #[test]
        fn trailing_slashes_never_matter(host in "[a-z]{1,12}\\.[a-z]{2,4}", slashes in 0usize..4) {
            let base = format!("https://{host}");
            let padded = format!("{base}{}", "/".repeat(slashes));
            prop_assert_eq!(challenge_value(&padded), challenge_value(&base));
        }
    }
}
