//! Numeric validation functions

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest numeric prefix accepted by [`parse_leading_float`]
static FLOAT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("float prefix pattern is a valid regex")
});

static INT_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+").expect("int prefix pattern is a valid regex"));

/// Parses a full numeric string into a finite number
///
/// Surrounding whitespace is allowed, trailing characters are not.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    // Rust accepts "inf"/"nan" spellings that are not numbers for a form user
    if trimmed.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Valid iff the trimmed string is a finite real number
pub fn is_numeric(value: &str) -> bool {
    parse_number(value).is_some()
}

/// Valid iff the string is a finite number with no fractional part
pub fn is_integer(value: &str) -> bool {
    parse_number(value).is_some_and(|n| n.fract() == 0.0)
}

/// Parses the leading integer of a string, ignoring trailing characters
///
/// Leading whitespace is skipped. Returns `None` when no digits lead.
/// Out-of-range digits saturate at `i64::MAX` / `i64::MIN`.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let m = INT_PREFIX_RE.find(value.trim_start())?;
    let text = m.as_str();
    match text.parse::<i64>() {
        Ok(n) => Some(n),
        // The prefix is all digits, so the only failure left is overflow
        Err(_) if text.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

/// Parses the leading number of a string, ignoring trailing characters
///
/// `"12.5kg"` yields 12.5, `"abc"` yields `None`.
pub fn parse_leading_float(value: &str) -> Option<f64> {
    let m = FLOAT_PREFIX_RE.find(value.trim_start())?;
    let text = m.as_str();
    match text.trim_start_matches(['+', '-']) {
        "Infinity" if text.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => text.parse::<f64>().ok(),
    }
}

/// Checks a declared minimum value (`data-validate-min`)
///
/// Both sides are parsed leniently; if either does not parse the check fails.
pub fn meets_min_value(value: &str, limit: &str) -> bool {
    match (parse_leading_float(value), parse_leading_float(limit)) {
        (Some(v), Some(min)) => v >= min,
        _ => false,
    }
}

/// Checks a declared maximum value (`data-validate-max`)
pub fn meets_max_value(value: &str, limit: &str) -> bool {
    match (parse_leading_float(value), parse_leading_float(limit)) {
        (Some(v), Some(max)) => v <= max,
        _ => false,
    }
}
