// File: src/constraints.rs
// Purpose: Per-field constraint sets read from native attributes and data-validate-* attributes

use college_forms_validation_core as checks;

use crate::document::{Document, ValidityState};

/// `data-*` keys (without the prefix) recognised on fields
pub mod keys {
    pub const URL: &str = "validate-url";
    pub const EMAIL: &str = "validate-email";
    pub const PASSWORD: &str = "validate-password";
    pub const MATCH: &str = "validate-match";
    pub const MIN_LENGTH: &str = "validate-min-length";
    pub const MAX_LENGTH: &str = "validate-max-length";
    pub const NUMERIC: &str = "validate-numeric";
    pub const INTEGER: &str = "validate-integer";
    pub const MIN: &str = "validate-min";
    pub const MAX: &str = "validate-max";
    pub const ERROR_MESSAGE: &str = "error-message";
    pub const VALID_FEEDBACK: &str = "valid-feedback";
}

/// An author-declared check beyond native validity
///
/// Flag checks are declared by the attribute's presence; parameterised
/// checks need a non-empty value. Variants are listed in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomConstraint {
    Url,
    Email,
    Password,
    /// Value must equal the value of the field with this id
    Matches(String),
    MinLength(String),
    MaxLength(String),
    Numeric,
    Integer,
    MinValue(String),
    MaxValue(String),
}

impl CustomConstraint {
    /// Run the check against `value`
    ///
    /// Returns `None` when the check does not apply: the trimmed value is
    /// empty (every check except `Matches`), or the field to match is missing.
    pub fn evaluate<D: Document>(&self, doc: &D, value: &str) -> Option<bool> {
        let ok = match self {
            CustomConstraint::Matches(other_id) => {
                let other = doc.element_by_id(other_id)?;
                value == doc.value(&other)
            }
            _ if value.trim().is_empty() => return None,
            CustomConstraint::Url => checks::is_valid_url(value),
            CustomConstraint::Email => checks::is_valid_email(value),
            CustomConstraint::Password => checks::is_strong_password(value),
            CustomConstraint::MinLength(limit) => checks::meets_min_length(value, limit),
            CustomConstraint::MaxLength(limit) => checks::meets_max_length(value, limit),
            CustomConstraint::Numeric => checks::is_numeric(value),
            CustomConstraint::Integer => checks::is_integer(value),
            CustomConstraint::MinValue(limit) => checks::meets_min_value(value, limit),
            CustomConstraint::MaxValue(limit) => checks::meets_max_value(value, limit),
        };
        Some(ok)
    }

    /// Message shown when this check is the reason for failure
    pub fn default_message(&self) -> String {
        match self {
            CustomConstraint::Url => "Please enter a valid URL.".to_string(),
            CustomConstraint::Email => "Please enter a valid email address.".to_string(),
            CustomConstraint::Password => "Password must be at least 8 characters with at least one uppercase letter, one lowercase letter, and one number.".to_string(),
            CustomConstraint::Matches(_) => "Fields do not match.".to_string(),
            CustomConstraint::MinLength(n) => format!("Please enter at least {} characters.", n),
            CustomConstraint::MaxLength(n) => format!("Please enter no more than {} characters.", n),
            CustomConstraint::Numeric => "Please enter a valid number.".to_string(),
            CustomConstraint::Integer => "Please enter a valid integer.".to_string(),
            CustomConstraint::MinValue(n) => format!("Value must be at least {}.", n),
            CustomConstraint::MaxValue(n) => format!("Value must be no more than {}.", n),
        }
    }
}

/// Native HTML constraint state plus the attributes its messages quote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeConstraints {
    pub validity: ValidityState,
    pub input_type: String,
    pub min_length: Option<String>,
    pub max_length: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Everything that decides a field's verdict, read fresh on each evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldConstraintSet {
    pub native: NativeConstraints,
    pub custom: Vec<CustomConstraint>,
    pub error_message: Option<String>,
    pub valid_feedback: Option<String>,
}

impl FieldConstraintSet {
    pub fn read<D: Document>(doc: &D, field: &D::Handle) -> Self {
        let flag = |key: &str| doc.data(field, key).is_some();
        let param = |key: &str| doc.data(field, key).filter(|v| !v.is_empty());

        let mut custom = Vec::new();
        if flag(keys::URL) {
            custom.push(CustomConstraint::Url);
        }
        if flag(keys::EMAIL) {
            custom.push(CustomConstraint::Email);
        }
        if flag(keys::PASSWORD) {
            custom.push(CustomConstraint::Password);
        }
        if let Some(other) = param(keys::MATCH) {
            custom.push(CustomConstraint::Matches(other));
        }
        if let Some(n) = param(keys::MIN_LENGTH) {
            custom.push(CustomConstraint::MinLength(n));
        }
        if let Some(n) = param(keys::MAX_LENGTH) {
            custom.push(CustomConstraint::MaxLength(n));
        }
        if flag(keys::NUMERIC) {
            custom.push(CustomConstraint::Numeric);
        }
        if flag(keys::INTEGER) {
            custom.push(CustomConstraint::Integer);
        }
        if let Some(n) = param(keys::MIN) {
            custom.push(CustomConstraint::MinValue(n));
        }
        if let Some(n) = param(keys::MAX) {
            custom.push(CustomConstraint::MaxValue(n));
        }

        let native = NativeConstraints {
            validity: doc.validity(field),
            input_type: doc.input_type(field),
            min_length: doc.attribute(field, "minlength"),
            max_length: doc.attribute(field, "maxlength"),
            min: doc.attribute(field, "min"),
            max: doc.attribute(field, "max"),
        };

        Self {
            native,
            custom,
            error_message: param(keys::ERROR_MESSAGE),
            valid_feedback: param(keys::VALID_FEEDBACK),
        }
    }
}
