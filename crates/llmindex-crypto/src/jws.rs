//! # Detached JWS Manifest Signatures
//!
//! A signed manifest carries
//! `sig = {"alg": "EdDSA", "kid": "local", "jws": "<h>.<p>.<s>"}` where
//!
//! - `h` is base64url of the canonical header `{"alg":"EdDSA"}`,
//! - `p` is base64url of SHA-256 over the canonical manifest without `sig`,
//! - `s` is base64url of the Ed25519 signature over those same canonical
//!   bytes.
//!
//! All segments are unpadded base64url; decoding also accepts padding.
//! Because the payload is computed from canonical bytes, re-formatting or
//! re-ordering the keys of a signed manifest keeps the signature valid.

use std::path::Path;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use llmindex_core::CanonicalBytes;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::SignatureError;
use crate::keys::{load_verifying_key, Ed25519KeyPair};
use crate::sha256::sha256_digest;

/// The only JWS algorithm produced or accepted.
pub const JWS_ALG: &str = "EdDSA";

/// Key id stamped on locally produced signatures.
pub const LOCAL_KID: &str = "local";

/// Sign the manifest at `manifest_path` with the PKCS#8 key at `key_path`
/// and write it back with the new `sig` field. Returns the JWS string.
pub fn sign_manifest(manifest_path: &Path, key_path: &Path) -> Result<String, SignatureError> {
    let mut manifest = load_manifest(manifest_path)?;
    let key = Ed25519KeyPair::from_pem_file(key_path)?;
    let jws = sign_manifest_value(&mut manifest, &key)?;

    let mut rendered = serde_json::to_string_pretty(&Value::Object(manifest))
        .map_err(|e| SignatureError::InvalidManifest(e.to_string()))?;
    rendered.push('\n');
    std::fs::write(manifest_path, rendered)
        .map_err(|e| SignatureError::Io { path: manifest_path.to_path_buf(), source: e })?;

    debug!(manifest = %manifest_path.display(), "wrote signed manifest");
    Ok(jws)
}

/// Sign a manifest object in place, replacing any existing `sig`.
pub fn sign_manifest_value(
    manifest: &mut Map<String, Value>,
    key: &Ed25519KeyPair,
) -> Result<String, SignatureError> {
    manifest.remove("sig");
    let canonical = CanonicalBytes::new(&*manifest)?;

    let header = encode_segment(header_bytes()?.as_bytes());
    let payload = encode_segment(&sha256_digest(&canonical));
    let signature = encode_segment(&key.sign(&canonical));
    let jws = format!("{header}.{payload}.{signature}");

    manifest.insert(
        "sig".to_string(),
        json!({"alg": JWS_ALG, "kid": LOCAL_KID, "jws": jws}),
    );
    Ok(jws)
}

/// Verify the signed manifest at `manifest_path` against the SPKI public
/// key at `key_path`.
///
/// Returns the signature's `kid` when it is a non-blank string.
pub fn verify_manifest(
    manifest_path: &Path,
    key_path: &Path,
) -> Result<Option<String>, SignatureError> {
    let manifest = load_manifest(manifest_path)?;
    let signed = SignedManifest::parse(&manifest)?;
    let key = load_verifying_key(key_path)?;
    signed.verify(&key)?;
    Ok(signed.kid)
}

/// Verify a manifest object against an Ed25519 public key.
pub fn verify_manifest_value(
    manifest: &Map<String, Value>,
    key: &VerifyingKey,
) -> Result<Option<String>, SignatureError> {
    let signed = SignedManifest::parse(manifest)?;
    signed.verify(key)?;
    Ok(signed.kid)
}

/// A manifest whose `sig.jws` passed every check that needs no key.
struct SignedManifest {
    canonical: CanonicalBytes,
    signature: Vec<u8>,
    kid: Option<String>,
}

impl SignedManifest {
    fn parse(manifest: &Map<String, Value>) -> Result<Self, SignatureError> {
        let sig = manifest
            .get("sig")
            .and_then(Value::as_object)
            .ok_or(SignatureError::MissingSig)?;

        let jws = sig
            .get("jws")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .ok_or(SignatureError::MissingJws)?;

        let parts: Vec<&str> = jws.split('.').collect();
        let [header_b64, payload_b64, signature_b64] = parts[..] else {
            return Err(SignatureError::MalformedJws);
        };

        let header: Value = decode_segment(header_b64)
            .ok()
            .and_then(|raw| serde_json::from_slice(&raw).ok())
            .ok_or(SignatureError::InvalidHeader)?;
        if header.get("alg").and_then(Value::as_str) != Some(JWS_ALG) {
            return Err(SignatureError::UnsupportedAlgorithm);
        }

        let mut unsigned = manifest.clone();
        unsigned.remove("sig");
        let canonical = CanonicalBytes::new(&unsigned)?;

        let payload = decode_segment(payload_b64).map_err(|_| SignatureError::InvalidPayload)?;
        if payload[..] != sha256_digest(&canonical)[..] {
            return Err(SignatureError::PayloadMismatch);
        }

        let signature = decode_segment(signature_b64)
            .map_err(|_| SignatureError::InvalidSignatureEncoding)?;

        let kid = sig
            .get("kid")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);

        Ok(Self { canonical, signature, kid })
    }

    fn verify(&self, key: &VerifyingKey) -> Result<(), SignatureError> {
        let bytes: [u8; 64] = self
            .signature
            .as_slice()
            .try_into()
            .map_err(|_| SignatureError::VerificationFailed)?;
        key.verify(self.canonical.as_bytes(), &Signature::from_bytes(&bytes))
            .map_err(|_| SignatureError::VerificationFailed)
    }
}

fn header_bytes() -> Result<CanonicalBytes, SignatureError> {
    Ok(CanonicalBytes::new(&json!({"alg": JWS_ALG}))?)
}

fn load_manifest(path: &Path) -> Result<Map<String, Value>, SignatureError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SignatureError::ManifestNotFound(path.to_path_buf())
        } else {
            SignatureError::Io { path: path.to_path_buf(), source: e }
        }
    })?;
    match serde_json::from_str(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SignatureError::ManifestNotObject),
        Err(e) => Err(SignatureError::InvalidManifest(e.to_string())),
    }
}

/// Unpadded base64url.
pub fn encode_segment(raw: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(raw)
}

/// Base64url decode, with or without trailing padding.
pub fn decode_segment(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('='))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Map<String, Value> {
        match json!({
            "version": "0.1",
            "updated_at": "2026-01-01T00:00:00Z",
            "entity": {"name": "Sig Shop", "canonical_url": "https://sig.example"},
            "language": "en",
            "topics": ["general"],
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn key() -> Ed25519KeyPair {
        Ed25519KeyPair::from_seed(&[42u8; 32])
    }

    #[test]
    fn header_segment_is_fixed() {
        let mut m = manifest();
        let jws = sign_manifest_value(&mut m, &key()).unwrap();
        assert!(jws.starts_with("eyJhbGciOiJFZERTQSJ9."));
        assert_eq!(jws.split('.').count(), 3);
    }

    #[test]
    fn sig_object_shape() {
        let mut m = manifest();
        let jws = sign_manifest_value(&mut m, &key()).unwrap();
        assert_eq!(m["sig"], json!({"alg": "EdDSA", "kid": "local", "jws": jws}));
    }

    #[test]
    fn sign_then_verify_returns_kid() {
        let kp = key();
        let mut m = manifest();
        sign_manifest_value(&mut m, &kp).unwrap();
        let kid = verify_manifest_value(&m, &kp.verifying_key()).unwrap();
        assert_eq!(kid.as_deref(), Some("local"));
    }

    #[test]
    fn blank_kid_is_none() {
        let kp = key();
        let mut m = manifest();
        sign_manifest_value(&mut m, &kp).unwrap();
        m["sig"]["kid"] = json!("  ");
        assert_eq!(verify_manifest_value(&m, &kp.verifying_key()).unwrap(), None);
    }

    #[test]
    fn resigning_replaces_existing_sig() {
        let kp = key();
        let mut m = manifest();
        let first = sign_manifest_value(&mut m, &kp).unwrap();
        let second = sign_manifest_value(&mut m, &kp).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn tampered_content_is_payload_mismatch() {
        let kp = key();
        let mut m = manifest();
        sign_manifest_value(&mut m, &kp).unwrap();
        m.insert("language".into(), json!("fr"));
        let err = verify_manifest_value(&m, &kp.verifying_key()).unwrap_err();
        assert!(matches!(err, SignatureError::PayloadMismatch));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let mut m = manifest();
        sign_manifest_value(&mut m, &key()).unwrap();
        let other = Ed25519KeyPair::from_seed(&[9u8; 32]);
        let err = verify_manifest_value(&m, &other.verifying_key()).unwrap_err();
        assert!(matches!(err, SignatureError::VerificationFailed));
    }

    #[test]
    fn structural_failures_in_order() {
        let vk = key().verifying_key();
        let mut m = manifest();
        assert!(matches!(verify_manifest_value(&m, &vk), Err(SignatureError::MissingSig)));

        m.insert("sig".into(), json!({"alg": "EdDSA", "jws": ""}));
        assert!(matches!(verify_manifest_value(&m, &vk), Err(SignatureError::MissingJws)));

        m.insert("sig".into(), json!({"jws": "a.b"}));
        assert!(matches!(verify_manifest_value(&m, &vk), Err(SignatureError::MalformedJws)));

        m.insert("sig".into(), json!({"jws": "!!.b.c"}));
        assert!(matches!(verify_manifest_value(&m, &vk), Err(SignatureError::InvalidHeader)));

        let hs256 = encode_segment(br#"{"alg":"HS256"}"#);
        m.insert("sig".into(), json!({"jws": format!("{hs256}.b.c")}));
        assert!(matches!(
            verify_manifest_value(&m, &vk),
            Err(SignatureError::UnsupportedAlgorithm)
        ));
    }

    #[test]
    fn padded_segments_decode() {
        assert_eq!(decode_segment("YQ==").unwrap(), b"a");
        assert_eq!(decode_segment("YQ").unwrap(), b"a");
    }
}
