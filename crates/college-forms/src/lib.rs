// College Forms - attribute-driven field validation
// Binds to forms, reads `data-validate-*` constraints and renders feedback nodes

pub mod config;
pub mod constraints;
pub mod document;
pub mod engine;
pub mod error;
pub mod memory;
pub mod messages;

// Re-export the page-author surface
pub use config::{CustomRulePolicy, FormsConfig, ValidationOptions, ValidationSettings, KNOWN_FORM_IDS};
pub use constraints::{CustomConstraint, FieldConstraintSet, NativeConstraints};
pub use document::{Document, FieldTarget, ValidityState};
pub use engine::{EventOutcome, FieldVerdict, FormEvent, FormValidator};
pub use error::ValidatorError;
pub use memory::{Element, MemoryDocument, NodeId};
pub use messages::{default_error_message, failure_message};

// Re-export the primitives so callers need a single dependency
pub use college_forms_validation_core as primitives;
