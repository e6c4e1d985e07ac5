//! Configuration loading and management.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use wot_certs::SignaturePolicy;
use wot_core::{Root, Roots};

/// Full configuration for Web of Trust evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WotConfig {
    /// Query settings.
    #[serde(default)]
    pub query: QueryConfig,

    /// Trust roots.
    #[serde(default)]
    pub roots: Vec<Root>,

    /// Signature acceptance policy.
    #[serde(default)]
    pub policy: SignaturePolicy,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Trust amount a binding needs to be accepted (120 = fully trusted).
    #[serde(default = "default_trust_amount")]
    pub trust_amount: u32,
    /// Treat every certification as an unconstrained delegation.
    #[serde(default)]
    pub certification_network: bool,
    /// Evaluate the network at this RFC 3339 time instead of now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

// Default value functions
fn default_trust_amount() -> u32 {
    120
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            trust_amount: default_trust_amount(),
            certification_network: false,
            reference_time: None,
        }
    }
}

impl QueryConfig {
    /// The configured reference time, or the current time.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl WotConfig {
    /// Load config from a TOML file, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: WotConfig = toml::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// The configured roots, keyed by fingerprint.
    pub fn roots(&self) -> Roots {
        self.roots.iter().cloned().collect()
    }
}
