//! # llmindex-crypto — Manifest Signing & Domain Verification
//!
//! ## Components
//!
//! - [`keys`] — Ed25519 key pairs stored as PKCS#8 / SPKI PEM.
//! - [`jws`] — detached JWS signatures embedded in the manifest `sig`
//!   field.
//! - [`sha256`] — digests over canonical bytes.
//! - [`challenge`] — DNS TXT and HTTP proof-file challenge values.
//!
//! ## Crate Policy
//!
//! - Signatures and digests are computed over `CanonicalBytes` only.
//! - Private key material never appears in `Debug` output or logs.
//! - No network I/O: challenges are computed here, publishing and checking
//!   them is the site owner's job.

pub mod challenge;
pub mod error;
pub mod jws;
pub mod keys;
pub mod sha256;

pub use challenge::{challenge_value, normalize_base_url, DomainChallenge, HTTP_PROOF_PATH};
pub use error::{ChallengeError, SignatureError};
pub use jws::{sign_manifest, sign_manifest_value, verify_manifest, verify_manifest_value};
pub use keys::{generate_keypair, load_verifying_key, Ed25519KeyPair};
pub use sha256::{sha256_digest, sha256_hex_str};
