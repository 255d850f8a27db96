//! College Forms Validation Core
//!
//! Pure validation predicates used by the field validation engine and by the
//! browser bindings. Every function here is total over strings: it never
//! panics and never allocates state between calls.

pub mod email;
pub mod numeric;
pub mod password;
pub mod string;

// Re-export all validators
pub use email::*;
pub use numeric::*;
pub use password::*;
pub use string::*;
