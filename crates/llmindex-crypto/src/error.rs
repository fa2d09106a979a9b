//! # Signature Errors
//!
//! Every way signing or verifying a manifest can fail. Display strings
//! name the failing step; the CLI prints them after `FAIL: `.

use std::path::PathBuf;

use llmindex_core::CanonicalizationError;
use thiserror::Error;

/// Signing or signature verification failed.
#[derive(Error, Debug)]
pub enum SignatureError {
    /// The manifest file does not exist.
    #[error("Manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// The manifest is not a JSON object.
    #[error("Invalid JSON in manifest: {0}")]
    InvalidManifest(String),

    /// The manifest parsed but is not a JSON object.
    #[error("Manifest JSON must be an object at the top level.")]
    ManifestNotObject,

    /// Reading or writing a file failed.
    #[error("io error on {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A key file does not exist.
    #[error("key not found: {}", .0.display())]
    KeyNotFound(PathBuf),

    /// A private key PEM could not be decoded as Ed25519 PKCS#8.
    #[error("invalid private key PEM {}: {reason}", path.display())]
    InvalidPrivateKey {
        /// Key file.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// A public key PEM could not be decoded as Ed25519 SPKI.
    #[error("invalid public key PEM: {}", path.display())]
    InvalidPublicKey {
        /// Key file.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// A key could not be encoded as PEM.
    #[error("key encoding failed: {0}")]
    KeyEncoding(String),

    /// The manifest carries no `sig` object.
    #[error("manifest is missing `sig` field")]
    MissingSig,

    /// `sig.jws` is absent or blank.
    #[error("`sig.jws` is missing or empty")]
    MissingJws,

    /// `sig.jws` does not have three dot-separated parts.
    #[error("`sig.jws` is not a valid JWS compact string (expected 3 parts)")]
    MalformedJws,

    /// The JWS header is not base64url-encoded JSON.
    #[error("JWS header is not valid base64url JSON")]
    InvalidHeader,

    /// The JWS header names an algorithm other than EdDSA.
    #[error("JWS header alg is not EdDSA")]
    UnsupportedAlgorithm,

    /// The JWS payload is not base64url.
    #[error("JWS payload is not valid base64url")]
    InvalidPayload,

    /// The signed hash does not match the manifest's current content.
    #[error("payload hash mismatch (manifest content changed since signing)")]
    PayloadMismatch,

    /// The JWS signature segment is not a base64url Ed25519 signature.
    #[error("JWS signature is not valid base64url")]
    InvalidSignatureEncoding,

    /// The Ed25519 check failed.
    #[error("signature verification failed (wrong key or tampered JWS)")]
    VerificationFailed,
}

/// A site URL cannot anchor a domain-verification challenge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChallengeError {
    /// The URL does not use the `https` scheme.
    #[error("URL must be HTTPS, got: {0}")]
    NotHttps(String),

    /// The URL has no host component.
    #[error("Could not parse domain from URL: {0}")]
    NoHost(String),
}
