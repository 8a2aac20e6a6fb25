//! Form Elements Module
//!
//! Native control state, constraint validation, `ElementInternals` for
//! form-associated custom elements, and form submission.

mod control;
mod form;
mod internals;
mod validation;

pub use control::{ControlKind, ControlState, InputType};
pub use form::{FormData, FormMethod, FormSubmission, ValidationReport};
pub use internals::{AriaMap, ElementInternals, FormValue};
pub use validation::ValidityState;
