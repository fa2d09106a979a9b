//! # Site Configuration
//!
//! `llmindex.yaml` holds the site-level inputs for generation:
//!
//! ```yaml
//! site_name: Example Shop
//! base_url: https://shop.example
//! language: en
//! topics: [electronics, audio]
//! access_control:
//!   allow: ["*"]
//!   rate_limit: 1000/day
//! ```
//!
//! Every key is optional in the file; command-line flags fill or override
//! them. The merged result is a [`SiteConfig`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::manifest::AccessControl;

/// The on-disk shape of `llmindex.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control: Option<AccessControl>,
}

/// Load `llmindex.yaml` from disk.
///
/// An empty file is an empty config.
pub fn load_yaml_config(path: &Path) -> Result<YamlConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Read { path: path.to_path_buf(), source: e }
        }
    })?;
    if content.trim().is_empty() {
        return Ok(YamlConfig::default());
    }
    serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a config to disk, replacing any existing file.
pub fn write_yaml_config(path: &Path, config: &YamlConfig) -> Result<(), ConfigError> {
    let text = serde_yaml::to_string(config).map_err(|e| ConfigError::Encode {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::write(path, text).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Fully resolved inputs for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Entity name.
    pub name: String,
    /// HTTPS origin recorded as `entity.canonical_url`.
    pub canonical_url: String,
    /// Primary BCP-47 language tag.
    pub language: String,
    /// Non-empty topic list.
    pub topics: Vec<String>,
    /// Endpoint base when it differs from the canonical URL.
    pub base_url: Option<String>,
    /// Agent access policy copied into the manifest.
    pub access_control: Option<AccessControl>,
}

impl SiteConfig {
    /// A config with default language `en` and topic `general`.
    pub fn new(name: impl Into<String>, canonical_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            canonical_url: canonical_url.into(),
            language: "en".to_string(),
            topics: vec!["general".to_string()],
            base_url: None,
            access_control: None,
        }
    }

    /// Endpoint base: the explicit base URL, else the canonical URL, with
    /// trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(&self.canonical_url)
            .trim_end_matches('/')
    }

    /// Host part of the canonical URL, used for the contact address.
    pub fn domain(&self) -> &str {
        let rest = self
            .canonical_url
            .strip_prefix("https://")
            .or_else(|| self.canonical_url.strip_prefix("http://"))
            .unwrap_or(&self.canonical_url);
        rest.split('/').next().unwrap_or(rest)
    }
}
