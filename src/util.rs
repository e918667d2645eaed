// Utility helpers for numeric coercion and number rendering.
//
// This module centralizes all the "dirty" cell handling so the rest of the
// code can assume clean, finite values.
use num_format::{Locale, ToFormattedString};

/// Parse a spreadsheet cell into `f64` while being forgiving about the
/// formatting that shows up in exports (currency signs, commas, spaces).
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (`NaN`, `inf`, `n/a`).
/// - Strips a `$` sign and thousands separators before parsing.
/// - Returns `None` for anything that cannot be parsed into a finite number.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s: String = s.chars().filter(|c| *c != ',' && *c != '$').collect();
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a cell to a number, substituting 0 on failure.
///
/// The flag is `true` when the cell held something that was not a number
/// (an empty or missing cell is a plain 0, not a coercion).
pub fn coerce_f64(s: Option<&str>) -> (f64, bool) {
    match parse_f64_safe(s) {
        Some(v) => (v, false),
        None => {
            let blank = s.map_or(true, |v| v.trim().is_empty());
            (0.0, !blank)
        }
    }
}

/// Zone numbers are small non-negative integers; fractions are truncated.
pub fn coerce_zone(s: Option<&str>) -> (u32, bool) {
    let (v, coerced) = coerce_f64(s);
    let zone = if v <= 0.0 { 0 } else { v.trunc().min(u32::MAX as f64) as u32 };
    (zone, coerced)
}

/// Round to the nearest integer, halves away from zero. Non-finite input
/// becomes 0 so rendering never prints `NaN`.
pub fn round_half_away(n: f64) -> f64 {
    if n.is_finite() {
        n.round()
    } else {
        0.0
    }
}

/// Render a value rounded to an integer with `,` thousands separators,
/// e.g. `-1234567.8 -> "-1,234,568"`.
pub fn format_grouped(n: f64) -> String {
    let rounded = round_half_away(n);
    // `as` saturates at the i64 bounds, which is far past any real amount.
    let int_val = rounded.abs() as i64;
    let res = int_val.to_formatted_string(&Locale::en);
    if rounded < 0.0 {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console messages (e.g., `1,024 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

/// File-name friendly form of a client name: lowercase ASCII alphanumerics
/// joined by `_`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        "client".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_currency_and_separators() {
        assert_eq!(parse_f64_safe(Some(" $1,234.50 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("-42")), Some(-42.0));
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn coerce_flags_only_garbage() {
        assert_eq!(coerce_f64(Some("12")), (12.0, false));
        assert_eq!(coerce_f64(Some("   ")), (0.0, false));
        assert_eq!(coerce_f64(None), (0.0, false));
        assert_eq!(coerce_f64(Some("abc")), (0.0, true));
    }

    #[test]
    fn zone_is_truncated_and_clamped() {
        assert_eq!(coerce_zone(Some("3.9")), (3, false));
        assert_eq!(coerce_zone(Some("-2")), (0, false));
        assert_eq!(coerce_zone(Some("x")), (0, true));
    }

    #[test]
    fn grouped_rounds_half_away_from_zero() {
        assert_eq!(format_grouped(1234567.4), "1,234,567");
        assert_eq!(format_grouped(1234567.5), "1,234,568");
        assert_eq!(format_grouped(-1234.5), "-1,235");
        assert_eq!(format_grouped(-0.4), "0");
        assert_eq!(format_grouped(f64::NAN), "0");
    }

    #[test]
    fn slug_is_file_safe() {
        assert_eq!(slugify("Moto Centro, S.A."), "moto_centro_s_a");
        assert_eq!(slugify("***"), "client");
    }
}
