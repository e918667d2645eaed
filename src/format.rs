//! Formatting helpers shared by every renderer.
//!
//! All functions are total: rounding is half away from zero and non-finite
//! input renders as zero.

use crate::util::{format_grouped, round_half_away};
use serde::Serialize;
use std::fmt;

/// `1234567.8 -> "$1,234,568"`, `-1234.5 -> "-$1,235"`.
pub fn format_currency(value: f64) -> String {
    let grouped = format_grouped(value);
    match grouped.strip_prefix('-') {
        Some(abs) => format!("-${}", abs),
        None => format!("${}", grouped),
    }
}

/// `73.6 -> "74%"`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", rounded_percent(value))
}

/// Percentage rounded the same way as [`format_percent`], as a number.
pub fn rounded_percent(value: f64) -> i64 {
    round_half_away(value) as i64
}

/// Width of a progress bar, `pct` clamped to `0..=100`.
pub fn progress_width(pct: f64) -> f64 {
    if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Discount badge colour when a tier rule was met.
pub const BADGE_QUALIFIED: &str = "#22c55e";
/// Discount badge colour for the fallback tier.
pub const BADGE_STANDARD: &str = "#3b82f6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Band {
    Critical,
    Low,
    Medium,
    High,
}

impl Band {
    /// Dashboard colour for the band.
    pub fn hex(self) -> &'static str {
        match self {
            Band::High => "#22c55e",
            Band::Medium => "#eab308",
            Band::Low => "#f97316",
            Band::Critical => "#ef4444",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::High => "HIGH",
            Band::Medium => "MEDIUM",
            Band::Low => "LOW",
            Band::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `>= 100` high, `>= 70` medium, `>= 50` low, anything else critical.
pub fn band(pct: f64) -> Band {
    if pct >= 100.0 {
        Band::High
    } else if pct >= 70.0 {
        Band::Medium
    } else if pct >= 50.0 {
        Band::Low
    } else {
        Band::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_and_rounds_half_up() {
        assert_eq!(format_currency(1234567.8), "$1,234,568");
        assert_eq!(format_currency(1234567.4), "$1,234,567");
        assert_eq!(format_currency(1234567.5), "$1,234,568");
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.5), "$1,000");
        assert_eq!(format_currency(-1234.5), "-$1,235");
        assert_eq!(format_currency(f64::INFINITY), "$0");
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(format_percent(73.6), "74%");
        assert_eq!(format_percent(73.4), "73%");
        assert_eq!(format_percent(73.5), "74%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(f64::NAN), "0%");
        assert_eq!(format_percent(1250.0), "1250%");
        assert_eq!(rounded_percent(93.333), 93);
    }

    #[test]
    fn band_thresholds_are_exact() {
        assert_eq!(band(100.0), Band::High);
        assert_eq!(band(250.0), Band::High);
        assert_eq!(band(99.999), Band::Medium);
        assert_eq!(band(70.0), Band::Medium);
        assert_eq!(band(69.999), Band::Low);
        assert_eq!(band(50.0), Band::Low);
        assert_eq!(band(49.999), Band::Critical);
        assert_eq!(band(0.0), Band::Critical);
    }

    #[test]
    fn band_colours_match_dashboard() {
        assert_eq!(Band::High.hex(), "#22c55e");
        assert_eq!(Band::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_width(140.0), 100.0);
        assert_eq!(progress_width(-3.0), 0.0);
        assert_eq!(progress_width(42.5), 42.5);
    }
}
