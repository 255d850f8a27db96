// File: src/config.rs
// Purpose: Validation settings, per-bind options and the forms.toml auto-bind config

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ValidatorError;

/// Forms bound automatically once the page is ready
pub const KNOWN_FORM_IDS: &[&str] = &[
    "loginForm",
    "registerForm",
    "collegeForm",
    "importForm",
    "addUserForm",
    "editUserForm",
];

/// How custom `data-validate-*` checks combine once native validity passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomRulePolicy {
    /// The last custom check that ran decides the verdict
    #[default]
    LastApplicable,
    /// Every custom check that ran must pass
    AllMustPass,
}

/// Settings attached to a bound form
///
/// Immutable for the lifetime of a binding; rebinding replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSettings {
    #[serde(default = "default_true")]
    pub validate_on_submit: bool,

    /// Re-validate a field on `input` and `change`
    #[serde(default = "default_true")]
    pub validate_on_change: bool,

    #[serde(default = "default_true")]
    pub validate_on_blur: bool,

    /// Apply `valid_class` and render `data-valid-feedback` on success
    #[serde(default = "default_false")]
    pub show_valid_feedback: bool,

    #[serde(default = "default_error_class")]
    pub error_class: String,

    #[serde(default = "default_valid_class")]
    pub valid_class: String,

    #[serde(default = "default_error_feedback_class")]
    pub error_feedback_class: String,

    #[serde(default = "default_valid_feedback_class")]
    pub valid_feedback_class: String,

    #[serde(default)]
    pub custom_rule_policy: CustomRulePolicy,
}

/// Partial settings passed to `bind`; unset keys keep their default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_on_submit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_on_change: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_on_blur: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_valid_feedback: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_feedback_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_feedback_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rule_policy: Option<CustomRulePolicy>,
}

/// Auto-bind configuration, usually loaded from forms.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormsConfig {
    /// Form ids to bind when present in the document
    #[serde(default = "default_auto_bind")]
    pub auto_bind: Vec<String>,

    /// Options applied to every auto-bound form
    #[serde(default)]
    pub defaults: ValidationOptions,

    /// Per-form options layered over `defaults`
    #[serde(default)]
    pub forms: HashMap<String, ValidationOptions>,
}

// Default values
fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_error_class() -> String {
    "is-invalid".to_string()
}

fn default_valid_class() -> String {
    "is-valid".to_string()
}

fn default_error_feedback_class() -> String {
    "invalid-feedback".to_string()
}

fn default_valid_feedback_class() -> String {
    "valid-feedback".to_string()
}

fn default_auto_bind() -> Vec<String> {
    KNOWN_FORM_IDS.iter().map(|id| id.to_string()).collect()
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            validate_on_submit: true,
            validate_on_change: true,
            validate_on_blur: true,
            show_valid_feedback: false,
            error_class: default_error_class(),
            valid_class: default_valid_class(),
            error_feedback_class: default_error_feedback_class(),
            valid_feedback_class: default_valid_feedback_class(),
            custom_rule_policy: CustomRulePolicy::default(),
        }
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            auto_bind: default_auto_bind(),
            defaults: ValidationOptions::default(),
            forms: HashMap::new(),
        }
    }
}

impl ValidationSettings {
    /// Both feedback classes, in the order feedback nodes are matched
    pub fn feedback_classes(&self) -> [&str; 2] {
        [self.error_feedback_class.as_str(), self.valid_feedback_class.as_str()]
    }

    /// Whether any per-field trigger is enabled
    pub fn listens_to_fields(&self) -> bool {
        self.validate_on_change || self.validate_on_blur
    }
}

impl ValidationOptions {
    /// Parse options from a JSON object such as `{"showValidFeedback": true}`
    pub fn from_json(json: &str) -> std::result::Result<Self, ValidatorError> {
        serde_json::from_str(json).map_err(|e| ValidatorError::InvalidOptions(e.to_string()))
    }

    /// Overlay these options on `base`, producing complete settings
    pub fn merge_over(&self, base: &ValidationSettings) -> ValidationSettings {
        let base = base.clone();
        ValidationSettings {
            validate_on_submit: self.validate_on_submit.unwrap_or(base.validate_on_submit),
            validate_on_change: self.validate_on_change.unwrap_or(base.validate_on_change),
            validate_on_blur: self.validate_on_blur.unwrap_or(base.validate_on_blur),
            show_valid_feedback: self.show_valid_feedback.unwrap_or(base.show_valid_feedback),
            error_class: self.error_class.clone().unwrap_or(base.error_class),
            valid_class: self.valid_class.clone().unwrap_or(base.valid_class),
            error_feedback_class: self
                .error_feedback_class
                .clone()
                .unwrap_or(base.error_feedback_class),
            valid_feedback_class: self
                .valid_feedback_class
                .clone()
                .unwrap_or(base.valid_feedback_class),
            custom_rule_policy: self.custom_rule_policy.unwrap_or(base.custom_rule_policy),
        }
    }
}

impl FormsConfig {
    /// Load configuration from a forms.toml file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // A missing file means "bind the well-known forms with defaults"
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read forms config: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse forms config: {:?}", path))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: FormsConfig = toml::from_str(content).context("Invalid forms config TOML")?;
        Ok(config)
    }

    /// Effective settings for one form: defaults, then `defaults`, then `forms.<id>`
    pub fn settings_for(&self, form_id: &str) -> ValidationSettings {
        let shared = self.defaults.merge_over(&ValidationSettings::default());
        match self.forms.get(form_id) {
            Some(options) => options.merge_over(&shared),
            None => shared,
        }
    }
}
