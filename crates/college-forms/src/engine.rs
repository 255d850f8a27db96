// File: src/engine.rs
// Purpose: Form binding, field evaluation, presentation updates and trigger dispatch

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::config::{CustomRulePolicy, FormsConfig, ValidationOptions, ValidationSettings};
use crate::constraints::FieldConstraintSet;
use crate::document::{Document, FieldTarget};
use crate::error::{Result, ValidatorError};
use crate::messages::failure_message;

/// Outcome of evaluating one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldVerdict {
    pub valid: bool,
    /// Error text when invalid; success text when valid, valid feedback is
    /// enabled and the field declares `data-valid-feedback`
    pub message: Option<String>,
}

/// A user interaction that may re-run validation
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent<H> {
    Submit(String),
    Input(H),
    Change(H),
    Blur(H),
}

/// What the host should do with the event after dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    /// `None` when no validation ran for this event
    pub verdict: Option<bool>,
}

#[derive(Debug, Clone)]
struct Binding<H> {
    settings: ValidationSettings,
    /// Fields present at bind time; only these answer change/blur triggers
    fields: Vec<H>,
}

/// Validation engine owning the form-id → settings registry
pub struct FormValidator<D: Document> {
    bindings: HashMap<String, Binding<D::Handle>>,
}

impl<D: Document> Default for FormValidator<D> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<D: Document> fmt::Debug for FormValidator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut forms: Vec<&String> = self.bindings.keys().collect();
        forms.sort();
        f.debug_struct("FormValidator").field("forms", &forms).finish()
    }
}

impl<D: Document> FormValidator<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a form, merging `options` over the default settings
    ///
    /// Binding an already-bound form replaces its settings and triggers.
    pub fn bind(&mut self, doc: &D, form_id: &str, options: &ValidationOptions) -> Result<()> {
        let settings = options.merge_over(&ValidationSettings::default());
        self.bind_with_settings(doc, form_id, settings)
    }

    pub fn bind_with_settings(
        &mut self,
        doc: &D,
        form_id: &str,
        settings: ValidationSettings,
    ) -> Result<()> {
        if !doc.has_form(form_id) {
            debug!(form_id, "form not found, nothing bound");
            return Err(ValidatorError::FormNotFound(form_id.to_string()));
        }

        let fields = if settings.listens_to_fields() {
            doc.form_fields(form_id)
        } else {
            Vec::new()
        };

        debug!(form_id, fields = fields.len(), "binding form validation");
        let previous = self
            .bindings
            .insert(form_id.to_string(), Binding { settings, fields });
        if previous.is_some() {
            debug!(form_id, "replaced existing binding");
        }

        Ok(())
    }

    /// Bind every configured form present in the document
    ///
    /// Returns the number of forms bound.
    pub fn bind_configured(&mut self, doc: &D, config: &FormsConfig) -> usize {
        let mut bound = 0;
        for form_id in &config.auto_bind {
            if !doc.has_form(form_id) {
                continue;
            }
            if self
                .bind_with_settings(doc, form_id, config.settings_for(form_id))
                .is_ok()
            {
                bound += 1;
            }
        }
        bound
    }

    /// Forget a binding; returns whether the form was bound
    pub fn unbind(&mut self, form_id: &str) -> bool {
        self.bindings.remove(form_id).is_some()
    }

    pub fn is_bound(&self, form_id: &str) -> bool {
        self.bindings.contains_key(form_id)
    }

    pub fn settings(&self, form_id: &str) -> Option<&ValidationSettings> {
        self.bindings.get(form_id).map(|binding| &binding.settings)
    }

    /// Validate every field of a bound form
    ///
    /// All fields are evaluated, even after a failure, so every error shows.
    pub fn validate_form(&self, doc: &mut D, form_id: &str) -> bool {
        if !self.is_bound(form_id) || !doc.has_form(form_id) {
            debug!(form_id, "validate_form on unbound or missing form");
            return false;
        }

        let mut valid = true;
        for field in doc.form_fields(form_id) {
            valid &= self.validate_field(doc, FieldTarget::Handle(field));
        }
        valid
    }

    /// Validate one field and redraw its classes and feedback node
    pub fn validate_field<'a>(
        &self,
        doc: &mut D,
        target: impl Into<FieldTarget<'a, D::Handle>>,
    ) -> bool {
        let field = match target.into() {
            FieldTarget::Handle(field) => field,
            FieldTarget::Id(id) => match doc.element_by_id(id) {
                Some(field) => field,
                None => {
                    debug!(id, "no field with this id");
                    return false;
                }
            },
        };

        let Some(settings) = self.settings_for_field(doc, &field) else {
            debug!(field = ?field, "field does not belong to a bound form");
            return false;
        };

        clear_presentation(doc, &field, settings);

        if is_skipped(doc, &field) {
            return true;
        }

        let verdict = evaluate(doc, &field, settings);
        trace!(field = ?field, valid = verdict.valid, "field evaluated");

        if verdict.valid {
            if settings.show_valid_feedback {
                doc.add_class(&field, &settings.valid_class);
                if let Some(message) = &verdict.message {
                    doc.append_feedback(&field, &settings.valid_feedback_class, message);
                }
            }
        } else {
            doc.add_class(&field, &settings.error_class);
            let message = verdict.message.as_deref().unwrap_or_default();
            doc.append_feedback(&field, &settings.error_feedback_class, message);
        }

        verdict.valid
    }

    /// Verdict for a field without touching its presentation
    ///
    /// `None` when the field does not belong to a bound form.
    pub fn check_field(&self, doc: &D, field: &D::Handle) -> Option<FieldVerdict> {
        let settings = self.settings_for_field(doc, field)?;
        Some(evaluate(doc, field, settings))
    }

    /// Strip validation classes and feedback nodes from every field
    pub fn reset_form(&self, doc: &mut D, form_id: &str) -> Result<()> {
        let binding = self
            .bindings
            .get(form_id)
            .ok_or_else(|| ValidatorError::NotBound(form_id.to_string()))?;

        for field in doc.form_fields(form_id) {
            clear_presentation(doc, &field, &binding.settings);
        }

        debug!(form_id, "validation state reset");
        Ok(())
    }

    /// Run whatever validation the bound settings attach to `event`
    pub fn handle_event(&self, doc: &mut D, event: FormEvent<D::Handle>) -> EventOutcome {
        match event {
            FormEvent::Submit(form_id) => self.on_submit(doc, &form_id),
            FormEvent::Input(field) | FormEvent::Change(field) => {
                self.on_field_trigger(doc, field, |settings| settings.validate_on_change)
            }
            FormEvent::Blur(field) => {
                self.on_field_trigger(doc, field, |settings| settings.validate_on_blur)
            }
        }
    }

    fn on_submit(&self, doc: &mut D, form_id: &str) -> EventOutcome {
        let Some(binding) = self.bindings.get(form_id) else {
            return EventOutcome::default();
        };
        if !binding.settings.validate_on_submit {
            return EventOutcome::default();
        }

        let valid = self.validate_form(doc, form_id);
        if valid {
            return EventOutcome {
                verdict: Some(true),
                ..Default::default()
            };
        }

        let fields = doc.form_fields(form_id);
        let first_invalid = fields
            .into_iter()
            .find(|field| doc.has_class(field, &binding.settings.error_class));
        if let Some(field) = first_invalid {
            doc.focus(&field);
        }

        debug!(form_id, "submission blocked by invalid fields");
        EventOutcome {
            default_prevented: true,
            propagation_stopped: true,
            verdict: Some(false),
        }
    }

    fn on_field_trigger(
        &self,
        doc: &mut D,
        field: D::Handle,
        enabled: impl Fn(&ValidationSettings) -> bool,
    ) -> EventOutcome {
        let listening = doc
            .form_id_of(&field)
            .and_then(|form_id| self.bindings.get(&form_id))
            .is_some_and(|binding| enabled(&binding.settings) && binding.fields.contains(&field));

        if !listening {
            return EventOutcome::default();
        }

        EventOutcome {
            verdict: Some(self.validate_field(doc, FieldTarget::Handle(field))),
            ..Default::default()
        }
    }

    fn settings_for_field(&self, doc: &D, field: &D::Handle) -> Option<&ValidationSettings> {
        let form_id = doc.form_id_of(field)?;
        self.settings(&form_id)
    }
}

/// Disabled fields and hidden inputs are always valid and never decorated
fn is_skipped<D: Document>(doc: &D, field: &D::Handle) -> bool {
    doc.is_disabled(field) || doc.input_type(field) == "hidden"
}

fn clear_presentation<D: Document>(doc: &mut D, field: &D::Handle, settings: &ValidationSettings) {
    doc.remove_class(field, &settings.error_class);
    doc.remove_class(field, &settings.valid_class);
    doc.remove_feedback(field, &settings.feedback_classes());
}

fn evaluate<D: Document>(doc: &D, field: &D::Handle, settings: &ValidationSettings) -> FieldVerdict {
    if is_skipped(doc, field) {
        return FieldVerdict {
            valid: true,
            message: None,
        };
    }

    let set = FieldConstraintSet::read(doc, field);
    let mut valid = set.native.validity.valid();
    let mut deciding = None;

    if valid {
        let value = doc.value(field);
        for constraint in &set.custom {
            let Some(passed) = constraint.evaluate(doc, &value) else {
                continue;
            };
            match settings.custom_rule_policy {
                CustomRulePolicy::LastApplicable => {
                    valid = passed;
                    deciding = Some(constraint);
                }
                CustomRulePolicy::AllMustPass => {
                    if valid && !passed {
                        deciding = Some(constraint);
                    }
                    valid &= passed;
                }
            }
        }
    }

    if valid {
        let message = if settings.show_valid_feedback {
            set.valid_feedback.clone()
        } else {
            None
        };
        return FieldVerdict { valid, message };
    }

    let message = set
        .error_message
        .clone()
        .unwrap_or_else(|| failure_message(&set, deciding));
    FieldVerdict {
        valid,
        message: Some(message),
    }
}
