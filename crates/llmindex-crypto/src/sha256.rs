//! # SHA-256 Helpers
//!
//! Manifest digests are computed from `CanonicalBytes` only, so the hash
//! embedded in a JWS always covers the canonical form.

use llmindex_core::CanonicalBytes;
use sha2::{Digest, Sha256};

/// SHA-256 of canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> [u8; 32] {
    Sha256::digest(data.as_bytes()).into()
}

/// Lowercase hex SHA-256 of a UTF-8 string.
pub fn sha256_hex_str(text: &str) -> String {
    to_hex(&Sha256::digest(text.as_bytes()))
}

/// Render bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
