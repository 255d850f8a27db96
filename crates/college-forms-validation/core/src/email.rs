//! Email validation functions

use once_cell::sync::Lazy;
use regex::Regex;

/// Single-line email grammar: a permissive local part, then one or more
/// dot-separated labels of alphanumerics/hyphens that do not start or end
/// with a hyphen.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

/// Validates email format
///
/// Checks for:
/// - A non-empty local part made of letters, digits and `.!#$%&'*+/=?^_`{|}~-`
/// - Exactly one '@'
/// - A domain of labels up to 63 characters, none starting or ending with '-'
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
