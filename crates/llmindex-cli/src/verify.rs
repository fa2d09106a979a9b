//! # Verify Subcommand
//!
//! Prints the domain-verification challenge for a site (the DNS TXT record
//! or the HTTP proof file) and checks that a published value matches.
//!
//! Network access for `verify check` goes through [`ChallengeLookup`], so
//! the comparison and reporting run offline against a mock in tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::Value;

use llmindex_core::load_yaml_config;
use llmindex_crypto::{DomainChallenge, HTTP_PROOF_PATH};

/// Arguments for the `llmindex verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(subcommand)]
    pub command: VerifyCommand,
}

/// Where the site URL comes from.
#[derive(Args, Debug, Default)]
pub struct SiteUrlArgs {
    /// Site HTTPS URL. If omitted, tries llmindex.json or llmindex.yaml in
    /// the current directory.
    #[arg(long, short)]
    pub url: Option<String>,

    /// Manifest path used to infer canonical_url.
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

/// Verification methods.
#[derive(Subcommand, Debug)]
pub enum VerifyCommand {
    /// Print the DNS TXT record required for domain verification.
    Dns(SiteUrlArgs),
    /// Print the HTTP proof file path and content.
    Http(SiteUrlArgs),
    /// Fetch the published DNS TXT record or HTTP proof and compare it.
    Check(CheckArgs),
}

/// Arguments for `llmindex verify check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Where the value is published.
    #[arg(long, value_enum, ignore_case = true)]
    pub method: CheckMethod,

    #[command(flatten)]
    pub site: SiteUrlArgs,

    /// Expected value. Defaults to the manifest's verify.value, then the
    /// computed challenge value.
    #[arg(long)]
    pub value: Option<String>,

    /// Network timeout in seconds.
    #[arg(long, default_value_t = 5.0)]
    pub timeout: f64,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckMethod {
    Dns,
    Http,
}

/// Network lookups needed by `verify check`.
pub trait ChallengeLookup {
    /// TXT strings published at `name`, one entry per record.
    fn txt_records(&self, name: &str) -> Result<Vec<String>>;

    /// Status of a HEAD request, after redirects.
    fn head_status(&self, url: &str) -> Result<u16>;

    /// Status and body of a GET request, after redirects.
    fn get_text(&self, url: &str) -> Result<(u16, String)>;
}

/// [`ChallengeLookup`] over the system resolver and a blocking HTTP client.
pub struct NetworkLookup {
    timeout: Duration,
    http: reqwest::blocking::Client,
}

impl NetworkLookup {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { timeout, http })
    }
}

impl ChallengeLookup for NetworkLookup {
    fn txt_records(&self, name: &str) -> Result<Vec<String>> {
        use hickory_resolver::config::{ResolverConfig, ResolverOpts};
        use hickory_resolver::Resolver;

        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        let resolver = Resolver::new(ResolverConfig::default(), opts)?;
        let lookup = resolver.txt_lookup(name)?;
        Ok(lookup
            .iter()
            .map(|txt| {
                txt.txt_data()
                    .iter()
                    .map(|part| String::from_utf8_lossy(part))
                    .collect::<String>()
            })
            .collect())
    }

    fn head_status(&self, url: &str) -> Result<u16> {
        Ok(self.http.head(url).send()?.status().as_u16())
    }

    fn get_text(&self, url: &str) -> Result<(u16, String)> {
        let response = self.http.get(url).send()?;
        let status = response.status().as_u16();
        Ok((status, response.text()?))
    }
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let base = crate::current_dir();
    match &args.command {
        VerifyCommand::Dns(site) => {
            let challenge = resolve_challenge(site, &base)?;
            print!("{}", render_dns(&challenge));
        }
        VerifyCommand::Http(site) => {
            let challenge = resolve_challenge(site, &base)?;
            print!("{}", render_http(&challenge));
        }
        VerifyCommand::Check(check) => {
            if !check.timeout.is_finite() || check.timeout <= 0.0 {
                bail!("--timeout must be a positive number of seconds");
            }
            let challenge = resolve_challenge(&check.site, &base)?;
            let expected = resolve_expected_value(check, &base, &challenge)?;
            let lookup = NetworkLookup::new(Duration::from_secs_f64(check.timeout))?;
            let (code, report) = match check.method {
                CheckMethod::Dns => check_dns(&lookup, &challenge, &expected),
                CheckMethod::Http => check_http(&lookup, &challenge, &expected),
            };
            print!("{report}");
            return Ok(code);
        }
    }
    Ok(0)
}

fn resolve_challenge(site: &SiteUrlArgs, base: &Path) -> Result<DomainChallenge> {
    let url = resolve_site_url(site, base)?;
    Ok(DomainChallenge::for_url(&url)?)
}

/// Site URL lookup order: `--url`, the `--manifest` canonical URL, the
/// default manifest under `base`, then `base_url` in `llmindex.yaml`.
pub fn resolve_site_url(site: &SiteUrlArgs, base: &Path) -> Result<String> {
    if let Some(url) = site.url.as_deref().filter(|u| !u.trim().is_empty()) {
        return Ok(url.to_string());
    }
    if let Some(path) = &site.manifest {
        if let Some(url) = canonical_url(&crate::load_manifest_value(path)?) {
            return Ok(url);
        }
    }
    if let Some(path) = crate::default_manifest_path(base) {
        if let Some(url) = canonical_url(&crate::load_manifest_value(&path)?) {
            return Ok(url);
        }
    }

    let config_path = base.join(crate::DEFAULT_CONFIG_FILE);
    if config_path.exists() {
        match load_yaml_config(&config_path) {
            Ok(cfg) => {
                if let Some(url) = cfg.base_url.filter(|u| !u.trim().is_empty()) {
                    return Ok(url);
                }
            }
            Err(e) => tracing::warn!(path = %config_path.display(), "ignoring config: {e}"),
        }
    }
    bail!("Missing site URL. Provide --url or --manifest.")
}

fn canonical_url(manifest: &Value) -> Option<String> {
    trimmed_str(manifest, "/entity/canonical_url")
}

fn trimmed_str(manifest: &Value, pointer: &str) -> Option<String> {
    manifest
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Expected value lookup order: `--value`, `verify.value` in the
/// `--manifest` (or default) manifest, then the computed challenge.
pub fn resolve_expected_value(
    check: &CheckArgs,
    base: &Path,
    challenge: &DomainChallenge,
) -> Result<String> {
    if let Some(value) = check.value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }
    let manifest = check.site.manifest.clone().or_else(|| crate::default_manifest_path(base));
    if let Some(path) = manifest.filter(|p| p.exists()) {
        if let Some(value) = trimmed_str(&crate::load_manifest_value(&path)?, "/verify/value") {
            return Ok(value);
        }
    }
    Ok(challenge.value.clone())
}

/// Look up the TXT records at the challenge name and report whether any of
/// them equals `expected`. Returns the exit code and the report text.
pub fn check_dns(
    lookup: &dyn ChallengeLookup,
    challenge: &DomainChallenge,
    expected: &str,
) -> (u8, String) {
    let name = challenge.dns_record_name();
    let records = match lookup.txt_records(&name) {
        Ok(records) => records,
        Err(e) => return (1, format!("✗ DNS lookup failed for {name}: {e:#}\n")),
    };
    tracing::debug!(%name, count = records.len(), "TXT records fetched");

    if records.iter().any(|r| r.trim() == expected) {
        return (0, format!("✓ DNS TXT record contains expected value: {expected}\n"));
    }
    let mut report = format!("✗ Expected value not found in TXT records for {name}\n");
    for record in &records {
        report.push_str(&format!("  - {record}\n"));
    }
    (1, report)
}

/// Fetch the proof file and report whether its trimmed body equals
/// `expected`. Returns the exit code and the report text.
pub fn check_http(
    lookup: &dyn ChallengeLookup,
    challenge: &DomainChallenge,
    expected: &str,
) -> (u8, String) {
    let url = challenge.proof_url();
    let not_reachable =
        |status: u16| (1, format!("✗ Proof file not reachable (status {status}): {url}\n"));

    match lookup.head_status(&url) {
        Ok(status) if status >= 400 => return not_reachable(status),
        Ok(_) => {}
        Err(e) => return (1, format!("✗ HTTP HEAD failed: {e:#}\n")),
    }
    let body = match lookup.get_text(&url) {
        Ok((status, _)) if status >= 400 => return not_reachable(status),
        Ok((_, body)) => body,
        Err(e) => return (1, format!("✗ HTTP GET failed: {e:#}\n")),
    };

    let got = body.trim();
    if got == expected {
        (0, format!("✓ Proof file content matches expected value: {expected}\n"))
    } else {
        (
            1,
            format!(
                "✗ Proof file content does not match expected value at: {url}\n  \
                 Expected: {expected}\n  Got: {got}\n"
            ),
        )
    }
}

pub fn render_dns(challenge: &DomainChallenge) -> String {
    format!(
        "DNS TXT Verification\n  Record name: {}\n  Record value: {}\n\n\
         Set manifest fields: verify.method=dns_txt, verify.value=<record value>\n",
        challenge.dns_record_name(),
        challenge.value
    )
}

pub fn render_http(challenge: &DomainChallenge) -> String {
    format!(
        "HTTP File Verification\n  Path: {HTTP_PROOF_PATH}\n  Content: {}\n\n\
         Set manifest fields: verify.method=http_file, verify.value=<file content>\n",
        challenge.value
    )
}
