// File: src/messages.rs
// Purpose: Default error message for a failed field

use crate::constraints::{CustomConstraint, FieldConstraintSet};

pub const FALLBACK_MESSAGE: &str = "Invalid value.";

/// Pick the message for an invalid field that declares no `data-error-message`
///
/// Native validity flags win over custom constraints; within each group the
/// first match in declaration order is used. A type mismatch on anything but
/// an email or URL input stops the lookup at the fallback.
pub fn default_error_message(set: &FieldConstraintSet) -> String {
    let native = &set.native;
    let validity = &native.validity;
    let quoted = |attr: &Option<String>| attr.clone().unwrap_or_default();

    if validity.value_missing {
        return "This field is required.".to_string();
    }
    if validity.type_mismatch {
        return match native.input_type.as_str() {
            "email" => "Please enter a valid email address.".to_string(),
            "url" => "Please enter a valid URL.".to_string(),
            _ => FALLBACK_MESSAGE.to_string(),
        };
    }
    if validity.too_short {
        return format!("Please enter at least {} characters.", quoted(&native.min_length));
    }
    if validity.too_long {
        return format!("Please enter no more than {} characters.", quoted(&native.max_length));
    }
    if validity.range_underflow {
        return format!("Value must be at least {}.", quoted(&native.min));
    }
    if validity.range_overflow {
        return format!("Value must be no more than {}.", quoted(&native.max));
    }
    if validity.pattern_mismatch {
        return "Please match the requested format.".to_string();
    }

    set.custom
        .first()
        .map(|constraint| constraint.default_message())
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

/// Message for a field whose verdict was decided by `deciding`
///
/// When native validity passed, the custom check that settled the verdict
/// names the failure, so a field declaring a minimum length and `numeric`
/// that fails on `numeric` reports the number message. Without a deciding
/// check this is [`default_error_message`].
pub fn failure_message(set: &FieldConstraintSet, deciding: Option<&CustomConstraint>) -> String {
    match deciding {
        Some(constraint) if set.native.validity.valid() => constraint.default_message(),
        _ => default_error_message(set),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::NativeConstraints;
    use crate::document::ValidityState;
    use pretty_assertions::assert_eq;

    fn native(validity: ValidityState, input_type: &str) -> NativeConstraints {
        NativeConstraints {
            validity,
            input_type: input_type.to_string(),
            min_length: Some("3".to_string()),
            max_length: Some("10".to_string()),
            min: Some("1".to_string()),
            max: Some("5".to_string()),
        }
    }

    fn set(validity: ValidityState, input_type: &str, custom: Vec<CustomConstraint>) -> FieldConstraintSet {
        FieldConstraintSet {
            native: native(validity, input_type),
            custom,
            ..Default::default()
        }
    }

    #[test]
    fn test_native_messages() {
        let missing = ValidityState { value_missing: true, ..Default::default() };
        assert_eq!(default_error_message(&set(missing, "text", vec![])), "This field is required.");

        let mismatch = ValidityState { type_mismatch: true, ..Default::default() };
        assert_eq!(
            default_error_message(&set(mismatch, "email", vec![])),
            "Please enter a valid email address."
        );
        assert_eq!(default_error_message(&set(mismatch, "url", vec![])), "Please enter a valid URL.");

        let short = ValidityState { too_short: true, ..Default::default() };
        assert_eq!(
            default_error_message(&set(short, "text", vec![])),
            "Please enter at least 3 characters."
        );

        let long = ValidityState { too_long: true, ..Default::default() };
        assert_eq!(
            default_error_message(&set(long, "text", vec![])),
            "Please enter no more than 10 characters."
        );

        let under = ValidityState { range_underflow: true, ..Default::default() };
        assert_eq!(default_error_message(&set(under, "number", vec![])), "Value must be at least 1.");

        let over = ValidityState { range_overflow: true, ..Default::default() };
        assert_eq!(default_error_message(&set(over, "number", vec![])), "Value must be no more than 5.");

        let pattern = ValidityState { pattern_mismatch: true, ..Default::default() };
        assert_eq!(
            default_error_message(&set(pattern, "text", vec![])),
            "Please match the requested format."
        );
    }

    #[test]
    fn test_type_mismatch_on_other_types_falls_back() {
        let mismatch = ValidityState {
            type_mismatch: true,
            too_short: true,
            ..Default::default()
        };
        assert_eq!(default_error_message(&set(mismatch, "tel", vec![])), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_native_flags_outrank_custom_constraints() {
        let missing = ValidityState { value_missing: true, ..Default::default() };
        let result = default_error_message(&set(missing, "text", vec![CustomConstraint::Numeric]));
        assert_eq!(result, "This field is required.");
    }

    #[test]
    fn test_first_declared_custom_constraint_wins() {
        let result = default_error_message(&set(
            ValidityState::default(),
            "text",
            vec![
                CustomConstraint::MinLength("5".to_string()),
                CustomConstraint::Numeric,
            ],
        ));
        assert_eq!(result, "Please enter at least 5 characters.");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(default_error_message(&set(ValidityState::default(), "text", vec![])), FALLBACK_MESSAGE);
        let bad_input = ValidityState { bad_input: true, ..Default::default() };
        assert_eq!(default_error_message(&set(bad_input, "number", vec![])), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_deciding_constraint_names_the_failure() {
        let declared = set(
            ValidityState::default(),
            "text",
            vec![
                CustomConstraint::MinLength("5".to_string()),
                CustomConstraint::Numeric,
            ],
        );
        assert_eq!(
            failure_message(&declared, Some(&CustomConstraint::Numeric)),
            "Please enter a valid number."
        );
        assert_eq!(failure_message(&declared, None), "Please enter at least 5 characters.");
    }

    #[test]
    fn test_native_failure_ignores_deciding_constraint() {
        let missing = ValidityState { value_missing: true, ..Default::default() };
        let declared = set(missing, "text", vec![CustomConstraint::Numeric]);
        assert_eq!(
            failure_message(&declared, Some(&CustomConstraint::Numeric)),
            "This field is required."
        );
    }
}
