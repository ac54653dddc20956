//! The `.coverctl.yaml` policy document.

use crate::errors::{Error, Result};
use crate::model::{Domain, Policy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_CONFIG_PATH: &str = ".coverctl.yaml";

/// On-disk shape of the config document. Field order here is the render
/// order, which keeps writes deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub policy: PolicySection,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySection {
    #[serde(rename = "defaultMin")]
    pub default_min: f64,
    pub domains: Vec<DomainSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainSection {
    pub name: String,
    #[serde(rename = "match")]
    pub matches: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
}

impl ConfigFile {
    pub fn into_policy(self) -> Policy {
        Policy {
            default_min: self.policy.default_min,
            domains: self
                .policy
                .domains
                .into_iter()
                .map(|d| Domain {
                    name: d.name,
                    matches: d.matches,
                    min: d.min,
                })
                .collect(),
            exclude: self.exclude,
        }
    }

    pub fn from_policy(policy: &Policy) -> Self {
        ConfigFile {
            version: SUPPORTED_CONFIG_VERSION,
            policy: PolicySection {
                default_min: policy.default_min,
                domains: policy
                    .domains
                    .iter()
                    .map(|d| DomainSection {
                        name: d.name.clone(),
                        matches: d.matches.clone(),
                        min: d.min,
                    })
                    .collect(),
            },
            exclude: policy.exclude.clone(),
        }
    }
}

pub fn load(path: &Path) -> Result<Policy> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::ConfigFormat(format!("failed to read {}: {}", path.display(), e)))?;

    let cfg: ConfigFile = serde_yaml::from_str(&raw)
        .map_err(|e| Error::ConfigFormat(format!("failed to parse {}: {}", path.display(), e)))?;

    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(Error::ConfigFormat(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }

    let policy = cfg.into_policy();
    validate(&policy)?;
    Ok(policy)
}

/// Render deterministically and replace via temp+rename, the same
/// discipline the history file uses.
pub fn save(path: &Path, policy: &Policy) -> Result<()> {
    validate(policy)?;
    let doc = ConfigFile::from_policy(policy);
    let rendered = serde_yaml::to_string(&doc)
        .map_err(|e| Error::ConfigFormat(format!("failed to render config: {}", e)))?;
    crate::fsio::write_atomic(path, rendered.as_bytes())
}

pub fn validate(policy: &Policy) -> Result<()> {
    if !(0.0..=100.0).contains(&policy.default_min) {
        return Err(Error::ConfigFormat(format!(
            "defaultMin {} out of range [0,100]",
            policy.default_min
        )));
    }
    if policy.domains.is_empty() {
        return Err(Error::ConfigFormat("policy has no domains".into()));
    }

    let mut seen = HashSet::new();
    for domain in &policy.domains {
        if domain.name.is_empty() {
            return Err(Error::ConfigFormat("domain with empty name".into()));
        }
        if !seen.insert(domain.name.as_str()) {
            return Err(Error::ConfigFormat(format!(
                "duplicate domain name '{}'",
                domain.name
            )));
        }
        if domain.matches.is_empty() {
            return Err(Error::ConfigFormat(format!(
                "domain '{}' has no match patterns",
                domain.name
            )));
        }
        if let Some(min) = domain.min {
            if !(0.0..=100.0).contains(&min) {
                return Err(Error::ConfigFormat(format!(
                    "domain '{}' min {} out of range [0,100]",
                    domain.name, min
                )));
            }
        }
    }
    Ok(())
}

/// Starter config for `coverctl init`. Narrow domains go first: the first
/// matching domain wins.
pub fn write_sample(path: &Path) -> Result<()> {
    crate::fsio::write_atomic(
        path,
        br#"version: 1
policy:
  defaultMin: 80
  domains:
    - name: core
      match: ["./internal/core/..."]
      min: 90
    - name: api
      match: ["./internal/api/..."]
exclude:
  - "**/*_gen.go"
  - "**/testdata/**"
"#,
    )
}
