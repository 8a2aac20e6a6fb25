//! fOS Input - `<pj1-input>`
//!
//! A styled, form-associated text input built as an autonomous custom
//! element on top of `fos-dom`.
//!
//! Features:
//! - Attribute reflection onto a shadow `<input class="custom-input">`
//! - `onchange` custom event (bubbling, cancelable, composed) relayed from
//!   raw `input` events
//! - Enter submits the owning form through its submit control
//! - Form value and required-field validity through `ElementInternals`
//! - Error annotation from the `error` attribute
//!
//! ```no_run
//! use fos_dom::Document;
//! use fos_input::StyledInput;
//!
//! let mut doc = Document::new();
//! fos_input::register(&mut doc)?;
//! let input = StyledInput::create(&mut doc)?;
//! doc.set_attribute(input.host(), "required", "")?;
//! # Ok::<(), fos_input::InputError>(())
//! ```

mod annotation;
mod bridge;
mod element;
mod error;
mod handler;
mod participant;
mod reflector;
mod theme;

use std::rc::Rc;

use fos_dom::{CustomElement, CustomElementDefinition, Document, NodeId, ReactionError};

pub use element::{StyledInput, TextInput};
pub use error::InputError;
pub use handler::ChangeHandler;
pub use participant::VALUE_MISSING_MESSAGE;
pub use theme::{InputSize, InputTheme, SizePresets};

/// Registered tag name
pub const TAG_NAME: &str = "pj1-input";

/// Type of the event relayed from `input`
pub const CHANGE_EVENT: &str = "onchange";

pub const OBSERVED_ATTRIBUTES: &[&str] = &[
    "placeholder",
    "value",
    "size",
    "name",
    "onchange",
    "error",
    "required",
    "pattern",
    "type",
    "width",
    "align",
    "disabled",
];

/// Define `<pj1-input>` with the default theme
pub fn register(doc: &mut Document) -> Result<(), InputError> {
    register_with_theme(doc, InputTheme::default())
}

/// Define `<pj1-input>`. Does nothing when the tag is already defined.
pub fn register_with_theme(doc: &mut Document, theme: InputTheme) -> Result<(), InputError> {
    if doc.custom_elements().is_defined(TAG_NAME) {
        tracing::debug!("<{}> already defined", TAG_NAME);
        return Ok(());
    }

    let theme = Rc::new(theme);
    let definition = CustomElementDefinition::new(
        TAG_NAME,
        Rc::new(move |doc: &mut Document, host: NodeId| -> Result<Box<dyn CustomElement>, ReactionError> {
            Ok(Box::new(TextInput::construct(doc, host, theme.clone())?))
        }),
    )
    .with_observed_attributes(OBSERVED_ATTRIBUTES)
    .form_associated(true);

    doc.define_element(definition)?;
    Ok(())
}
