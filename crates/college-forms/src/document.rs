// File: src/document.rs
// Purpose: The document capabilities the validation engine needs

use std::fmt;

/// Native constraint-validation state of a field
///
/// Mirrors the browser's `ValidityState`; a field is natively valid when no
/// flag is raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityState {
    pub value_missing: bool,
    pub type_mismatch: bool,
    pub pattern_mismatch: bool,
    pub too_long: bool,
    pub too_short: bool,
    pub range_underflow: bool,
    pub range_overflow: bool,
    pub step_mismatch: bool,
    pub bad_input: bool,
    pub custom_error: bool,
}

impl ValidityState {
    pub fn valid(&self) -> bool {
        !(self.value_missing
            || self.type_mismatch
            || self.pattern_mismatch
            || self.too_long
            || self.too_short
            || self.range_underflow
            || self.range_overflow
            || self.step_mismatch
            || self.bad_input
            || self.custom_error)
    }
}

/// A field given either directly or by element id
#[derive(Debug, Clone, PartialEq)]
pub enum FieldTarget<'a, H> {
    Handle(H),
    Id(&'a str),
}

impl<'a, H> From<&'a str> for FieldTarget<'a, H> {
    fn from(id: &'a str) -> Self {
        FieldTarget::Id(id)
    }
}

/// Element lookup, attribute reads and presentation mutation
///
/// Implemented by [`crate::MemoryDocument`] for tests and server-side checks,
/// and over `web-sys` by the browser bindings.
pub trait Document {
    /// Cheap, comparable reference to a form field
    type Handle: Clone + PartialEq + fmt::Debug;

    /// Whether a `<form>` with this id is in the document
    fn has_form(&self, form_id: &str) -> bool;

    fn element_by_id(&self, id: &str) -> Option<Self::Handle>;

    /// Id of the form owning the field, if that form has one
    fn form_id_of(&self, field: &Self::Handle) -> Option<String>;

    /// `input`, `select` and `textarea` descendants of the form, in document order
    fn form_fields(&self, form_id: &str) -> Vec<Self::Handle>;

    fn value(&self, field: &Self::Handle) -> String;

    /// The DOM `type` of the field: `"email"`, `"hidden"`, `"select-one"`, `"textarea"`, ...
    fn input_type(&self, field: &Self::Handle) -> String;

    fn is_disabled(&self, field: &Self::Handle) -> bool;

    fn attribute(&self, field: &Self::Handle, name: &str) -> Option<String>;

    /// A `data-*` attribute, `key` given without the `data-` prefix
    fn data(&self, field: &Self::Handle, key: &str) -> Option<String> {
        self.attribute(field, &format!("data-{key}"))
    }

    fn validity(&self, field: &Self::Handle) -> ValidityState;

    fn has_class(&self, field: &Self::Handle, class: &str) -> bool;

    fn add_class(&mut self, field: &Self::Handle, class: &str);

    fn remove_class(&mut self, field: &Self::Handle, class: &str);

    /// Remove direct children of the field's parent carrying any of `classes`
    fn remove_feedback(&mut self, field: &Self::Handle, classes: &[&str]);

    /// Append a feedback node with `class` and `text` to the field's parent
    fn append_feedback(&mut self, field: &Self::Handle, class: &str, text: &str);

    fn focus(&mut self, field: &Self::Handle);
}
