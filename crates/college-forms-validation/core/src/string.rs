//! String validation functions

use url::Url;

use crate::numeric::parse_leading_int;

/// URL validation
///
/// Accepts anything the WHATWG URL parser treats as an absolute URL, which
/// requires a scheme (`https://college.edu`, `mailto:office@college.edu`).
/// Relative references such as `college.edu/admissions` are rejected.
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Character count, as seen by the user rather than in UTF-8 bytes
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Checks a declared minimum length (`data-validate-min-length`)
///
/// The limit is parsed leniently (`"5"`, `" 5"`, `"5chars"` all mean 5).
/// An unparseable limit fails the check.
pub fn meets_min_length(s: &str, limit: &str) -> bool {
    match parse_leading_int(limit) {
        Some(min) => char_len(s) as i64 >= min,
        None => false,
    }
}

/// Checks a declared maximum length (`data-validate-max-length`)
pub fn meets_max_length(s: &str, limit: &str) -> bool {
    match parse_leading_int(limit) {
        Some(max) => char_len(s) as i64 <= max,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://test.co.uk"));
        assert!(is_valid_url("https://example.com/path?q=1"));
        assert!(is_valid_url("ftp://files.college.edu"));
        assert!(is_valid_url("mailto:admissions@college.edu"));
        assert!(is_valid_url("http://nodomain"));

        assert!(!is_valid_url(""));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url("https://"));
    }

    #[test]
    fn test_length_validators() {
        assert!(meets_min_length("hello", "3"));
        assert!(meets_min_length("hey", "3"));
        assert!(!meets_min_length("hi", "3"));

        assert!(meets_max_length("hello", "10"));
        assert!(!meets_max_length("verylongstring", "5"));
    }

    #[test]
    fn test_length_counts_characters() {
        // Four characters, eight bytes
        assert!(meets_max_length("éééé", "4"));
        assert!(meets_min_length("éééé", "4"));
    }

    #[test]
    fn test_length_limits_are_lenient() {
        assert!(meets_min_length("hello", "5chars"));
        assert!(meets_min_length("hello", " 5"));
        assert!(!meets_min_length("hello", "five"));
        assert!(!meets_max_length("hello", ""));
    }

    #[test]
    fn test_oversized_limits_saturate() {
        assert!(meets_max_length("abc", "99999999999999999999"));
        assert!(!meets_min_length("abc", "99999999999999999999"));
        assert!(meets_min_length("abc", "-99999999999999999999"));
    }
}
