//! # llmindex CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use llmindex_cli::generate::{run_generate, GenerateArgs};
use llmindex_cli::init::{run_init, InitArgs};
use llmindex_cli::signing::{run_sign, SignArgs};
use llmindex_cli::status::{run_status, StatusArgs};
use llmindex_cli::validate::{run_validate, ValidateArgs};
use llmindex_cli::verify::{run_verify, VerifyArgs};
use llmindex_cli::watch::{run_watch, WatchArgs};

/// llmindex: a machine-readable index of a site for LLM agents.
///
/// Generates the `/.well-known/llmindex.json` manifest, `/llm` pages, and
/// product feed; validates them; signs manifests; and prints and checks
/// domain-verification challenges.
#[derive(Parser, Debug)]
#[command(name = "llmindex", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a manifest (and its feed) against the llmindex schema.
    Validate(ValidateArgs),

    /// Generate the manifest, /llm pages, and optional product feed.
    Generate(GenerateArgs),

    /// Create a starter llmindex.yaml.
    Init(InitArgs),

    /// Show a quick summary of a manifest.
    Status(StatusArgs),

    /// Ed25519 keygen, manifest signing, and signature verification.
    Sign(SignArgs),

    /// Domain-verification challenge values (DNS TXT or HTTP file).
    Verify(VerifyArgs),

    /// Rebuild artifacts whenever llmindex.yaml or the product input changes.
    Watch(WatchArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("llmindex CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Generate(args) => run_generate(&args),
        Commands::Init(args) => run_init(&args),
        Commands::Status(args) => run_status(&args),
        Commands::Sign(args) => run_sign(&args),
        Commands::Verify(args) => run_verify(&args),
        Commands::Watch(args) => run_watch(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use llmindex_cli::signing::SignCommand;
    use llmindex_cli::validate::OutputFormat;
    use llmindex_cli::verify::{CheckMethod, VerifyCommand};
    use llmindex_schema::SchemaVersion;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_validate_with_feed_and_format() {
        let cli = Cli::try_parse_from([
            "llmindex", "validate", "m.json", "--feed", "f.jsonl", "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.manifest.to_str(), Some("m.json"));
                assert_eq!(args.feed.as_deref().and_then(|p| p.to_str()), Some("f.jsonl"));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_generate_defaults_and_repeated_topics() {
        let cli = Cli::try_parse_from([
            "llmindex", "generate", "--site", "Shop", "--url", "https://shop.example",
            "-t", "toys", "-t", "games", "--manifest-version", "0.2",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.topics, ["toys", "games"]);
                assert_eq!(args.output_dir.to_str(), Some("dist"));
                assert_eq!(args.currency, "USD");
                assert_eq!(args.manifest_version, SchemaVersion::V0_2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_manifest_version() {
        assert!(Cli::try_parse_from(["llmindex", "generate", "--manifest-version", "3"]).is_err());
    }

    #[test]
    fn init_requires_site_name_and_base_url() {
        assert!(Cli::try_parse_from(["llmindex", "init", "--site-name", "Shop"]).is_err());
        let cli = Cli::try_parse_from([
            "llmindex", "init", "--site-name", "Shop", "--base-url", "https://shop.example",
        ])
        .unwrap();
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.language, "en");
                assert!(!args.force);
                assert_eq!(args.path.to_str(), Some("llmindex.yaml"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_sign_and_verify_subcommands() {
        let cli =
            Cli::try_parse_from(["llmindex", "sign", "verify", "m.json", "--key", "public.pem"])
                .unwrap();
        match cli.command {
            Commands::Sign(SignArgs { command: SignCommand::Verify { manifest, key } }) => {
                assert_eq!(manifest.to_str(), Some("m.json"));
                assert_eq!(key.to_str(), Some("public.pem"));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["llmindex", "-vv", "verify", "dns", "-u", "https://a.example"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Verify(VerifyArgs { command: VerifyCommand::Dns(site) }) => {
                assert_eq!(site.url.as_deref(), Some("https://a.example"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_verify_check() {
        let cli = Cli::try_parse_from([
            "llmindex", "verify", "check", "--method", "HTTP", "-u", "https://a.example",
            "--value", "v", "--timeout", "2.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Verify(VerifyArgs { command: VerifyCommand::Check(check) }) => {
                assert_eq!(check.method, CheckMethod::Http);
                assert_eq!(check.site.url.as_deref(), Some("https://a.example"));
                assert_eq!(check.value.as_deref(), Some("v"));
                assert_eq!(check.timeout, 2.5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["llmindex", "verify", "check", "--method", "ftp"]).is_err());
        assert!(Cli::try_parse_from(["llmindex", "verify", "check"]).is_err());
    }

    #[test]
    fn parses_watch_defaults() {
        let cli = Cli::try_parse_from(["llmindex", "watch"]).unwrap();
        match cli.command {
            Commands::Watch(args) => {
                assert_eq!(args.config.to_str(), Some("llmindex.yaml"));
                assert_eq!(args.output_dir.to_str(), Some("dist"));
                assert_eq!(args.currency, "USD");
                assert_eq!(args.manifest_version, SchemaVersion::V0_1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn sign_keygen_requires_output() {
        assert!(Cli::try_parse_from(["llmindex", "sign", "keygen"]).is_err());
    }
}
