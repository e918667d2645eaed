//! Discount tier classification.
//!
//! Tiers are an ordered list of threshold rules. The first rule whose
//! thresholds are all met wins; when none match, the fallback tier applies.

use crate::error::{ReportError, Result};
use crate::types::ClientMetrics;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub tier: u8,
    pub label: String,
}

/// A tier granted when every present threshold is met (`pct >= min`).
/// Missing thresholds place no requirement on that axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    pub tier: u8,
    pub label: String,
    #[serde(default)]
    pub min_total: Option<f64>,
    #[serde(default)]
    pub min_refacc: Option<f64>,
    #[serde(default)]
    pub min_bgo: Option<f64>,
    #[serde(default)]
    pub min_acc: Option<f64>,
}

impl TierRule {
    fn thresholds(&self) -> [(Option<f64>, &'static str); 4] {
        [
            (self.min_total, "min_total"),
            (self.min_refacc, "min_refacc"),
            (self.min_bgo, "min_bgo"),
            (self.min_acc, "min_acc"),
        ]
    }

    pub fn matches(&self, m: &ClientMetrics) -> bool {
        fn meets(min: Option<f64>, pct: f64) -> bool {
            min.map_or(true, |min| pct >= min)
        }
        meets(self.min_total, m.pct_total)
            && meets(self.min_refacc, m.pct_refacc)
            && meets(self.min_bgo, m.pct_bgo)
            && meets(self.min_acc, m.pct_acc)
    }

    fn grant(&self) -> DiscountTier {
        DiscountTier {
            tier: self.tier,
            label: self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierRules {
    rules: Vec<TierRule>,
    fallback: DiscountTier,
}

pub const FULL_COMPLIANCE_TIER: u8 = 35;
pub const STANDARD_TIER: u8 = 20;

static DEFAULT_RULES: Lazy<TierRules> = Lazy::new(|| TierRules {
    rules: vec![TierRule {
        tier: FULL_COMPLIANCE_TIER,
        label: "Full compliance".to_string(),
        min_total: Some(100.0),
        min_refacc: Some(100.0),
        min_bgo: Some(100.0),
        min_acc: None,
    }],
    fallback: DiscountTier {
        tier: STANDARD_TIER,
        label: "Standard".to_string(),
    },
});

impl Default for TierRules {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

impl TierRules {
    /// Build a rule set, rejecting empty labels and thresholds that are
    /// negative or not finite.
    pub fn new(rules: Vec<TierRule>, fallback: DiscountTier) -> Result<Self> {
        if fallback.label.trim().is_empty() {
            return Err(ReportError::Config("fallback tier needs a label".into()));
        }
        for (idx, rule) in rules.iter().enumerate() {
            if rule.label.trim().is_empty() {
                return Err(ReportError::Config(format!(
                    "tier rule #{} needs a label",
                    idx + 1
                )));
            }
            for (min, name) in rule.thresholds() {
                if let Some(v) = min {
                    if !v.is_finite() || v < 0.0 {
                        return Err(ReportError::Config(format!(
                            "tier rule #{} ({}): {} must be a non-negative number, got {}",
                            idx + 1,
                            rule.label,
                            name,
                            v
                        )));
                    }
                }
            }
        }
        Ok(Self { rules, fallback })
    }

    /// The built-in rule: 35 when total, refacc and bgo are all at or above
    /// 100%, otherwise 20.
    pub fn standard() -> &'static TierRules {
        &DEFAULT_RULES
    }

    pub fn rules(&self) -> &[TierRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &DiscountTier {
        &self.fallback
    }

    /// True when `tier` is what `classify` gives if no rule matches.
    pub fn is_fallback(&self, tier: &DiscountTier) -> bool {
        *tier == self.fallback
    }

    pub fn classify(&self, metrics: &ClientMetrics) -> DiscountTier {
        self.rules
            .iter()
            .find(|rule| rule.matches(metrics))
            .map(TierRule::grant)
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Classify with the built-in rule set.
pub fn classify(metrics: &ClientMetrics) -> DiscountTier {
    TierRules::standard().classify(metrics)
}
