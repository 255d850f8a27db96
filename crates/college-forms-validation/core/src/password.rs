//! Password validation functions

/// Minimum number of characters for a strong password
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validates password strength
///
/// A strong password is at least 8 characters long, made of ASCII letters
/// and digits only, and contains at least one lowercase letter, one
/// uppercase letter and one digit. Symbols are rejected.
pub fn is_strong_password(password: &str) -> bool {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return false;
    }

    if !password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    has_lowercase && has_uppercase && has_digit
}
