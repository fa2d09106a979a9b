//! # Signing Subcommand
//!
//! Ed25519 key generation, manifest signing, and signature verification.
//!
//! Wraps `llmindex-crypto`. The signature covers the canonical form of the
//! manifest without its `sig` field, so re-indenting a signed manifest does
//! not invalidate it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use llmindex_crypto::{generate_keypair, sign_manifest, verify_manifest};

/// Arguments for the `llmindex sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(subcommand)]
    pub command: SignCommand,
}

/// Signing subcommands.
#[derive(Subcommand, Debug)]
pub enum SignCommand {
    /// Generate an Ed25519 keypair (private.pem + public.pem).
    Keygen {
        /// Output directory for the key files.
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Sign a manifest and write the `sig` field back to disk.
    Manifest {
        /// Path to the llmindex.json manifest.
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Ed25519 private key PEM (private.pem).
        #[arg(long)]
        key: PathBuf,
    },

    /// Verify a signed manifest with an Ed25519 public key.
    Verify {
        /// Path to the llmindex.json manifest.
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Ed25519 public key PEM (public.pem).
        #[arg(long)]
        key: PathBuf,
    },
}

/// Execute the sign subcommand.
pub fn run_sign(args: &SignArgs) -> Result<u8> {
    match &args.command {
        SignCommand::Keygen { output } => cmd_keygen(output),
        SignCommand::Manifest { manifest, key } => cmd_sign(manifest, key),
        SignCommand::Verify { manifest, key } => Ok(cmd_verify(manifest, key)),
    }
}

fn cmd_keygen(output: &Path) -> Result<u8> {
    let (private_path, public_path) = generate_keypair(output)
        .with_context(|| format!("failed to generate keys in {}", output.display()))?;

    println!("Generated keys:");
    println!("  ✓ {}", private_path.display());
    println!("  ✓ {}", public_path.display());
    Ok(0)
}

fn cmd_sign(manifest: &Path, key: &Path) -> Result<u8> {
    let jws = sign_manifest(manifest, key)?;
    tracing::debug!(jws_len = jws.len(), "manifest signed");
    println!("✓ Signed manifest: {}", manifest.display());
    Ok(0)
}

/// Every failure is a verdict here, not an error: it prints `FAIL:` and
/// exits 1.
fn cmd_verify(manifest: &Path, key: &Path) -> u8 {
    match verify_manifest(manifest, key) {
        Ok(Some(kid)) => {
            println!("PASS: signature valid. kid={kid}");
            0
        }
        Ok(None) => {
            println!("PASS: signature valid.");
            0
        }
        Err(e) => {
            println!("FAIL: {e}");
            1
        }
    }
}
