//! Configuration file handling.
//!
//! Settings come from an optional `compliance_report.toml`. Every section
//! and key may be omitted.

use crate::error::{ReportError, Result};
use crate::loader::DEFAULT_CLIENT_MARKER;
use crate::tier::{DiscountTier, TierRule, TierRules};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "compliance_report.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub tiers: TiersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Prefix on `CLIENT_NUM` that marks a branch row.
    #[serde(default = "default_client_marker")]
    pub client_marker: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            client_marker: default_client_marker(),
        }
    }
}

fn default_client_marker() -> String {
    DEFAULT_CLIENT_MARKER.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for CSV and JSON exports.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Rows shown in console previews.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_preview_rows() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiersConfig {
    #[serde(default = "default_fallback")]
    pub fallback: DiscountTier,

    #[serde(default = "default_rules")]
    pub rules: Vec<TierRule>,
}

impl Default for TiersConfig {
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
            rules: default_rules(),
        }
    }
}

fn default_fallback() -> DiscountTier {
    TierRules::standard().fallback().clone()
}

fn default_rules() -> Vec<TierRule> {
    TierRules::standard().rules().to_vec()
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        Self::from_toml(&text)
    }

    /// Load `path` when given; otherwise the default file if it exists;
    /// otherwise built-in defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.ingest.client_marker.trim().is_empty() {
            return Err(ReportError::Config(
                "ingest.client_marker must not be empty".into(),
            ));
        }
        if self.output.preview_rows == 0 {
            return Err(ReportError::Config(
                "output.preview_rows must be at least 1".into(),
            ));
        }
        self.tier_rules().map(|_| ())
    }

    pub fn tier_rules(&self) -> Result<TierRules> {
        TierRules::new(self.tiers.rules.clone(), self.tiers.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClientMetrics;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.ingest.client_marker, "C");
        assert_eq!(config.output.dir, ".");
        assert_eq!(config.output.preview_rows, 10);
        assert_eq!(&config.tier_rules().unwrap(), TierRules::standard());
    }

    #[test]
    fn custom_tiers_replace_the_default_rule() {
        let config = Config::from_toml(
            r#"
            [tiers]
            fallback = { tier = 15, label = "Base" }

            [[tiers.rules]]
            tier = 35
            label = "Full compliance"
            min_total = 100.0
            min_refacc = 100.0
            min_bgo = 100.0

            [[tiers.rules]]
            tier = 25
            label = "Close"
            min_total = 90.0
            "#,
        )
        .unwrap();
        let rules = config.tier_rules().unwrap();
        let m = ClientMetrics {
            pct_total: 92.0,
            ..Default::default()
        };
        assert_eq!(rules.classify(&m).tier, 25);
        assert_eq!(rules.classify(&ClientMetrics::default()).label, "Base");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Config::from_toml("[ingest]\nclient_marker = \"\"").is_err());
        assert!(Config::from_toml("[output]\npreview_rows = 0").is_err());
        assert!(Config::from_toml(
            "[[tiers.rules]]\ntier = 30\nlabel = \"X\"\nmin_total = -5.0"
        )
        .is_err());
        assert!(Config::from_toml("ingest = 3").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[output]\ndir = \"out\"\n").unwrap();
        let config = Config::discover(Some(&path)).unwrap();
        assert_eq!(config.output.dir, "out");
        assert!(Config::load(&dir.path().join("missing.toml")).is_err());
    }
}
