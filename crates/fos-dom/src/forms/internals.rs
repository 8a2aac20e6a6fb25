//! ElementInternals
//!
//! Form participation and accessibility state for form-associated custom
//! elements.

use std::collections::HashMap;

use super::validation::ValidityState;
use crate::NodeId;

/// Submission value of a form-associated element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    String(String),
    /// Several entries, as with a `FormData` value
    Entries(Vec<(String, String)>),
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// ARIA attribute map
#[derive(Debug, Default, Clone)]
pub struct AriaMap {
    attrs: HashMap<String, String>,
}

impl AriaMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }
}

/// Per-element internals handle
#[derive(Debug, Clone)]
pub struct ElementInternals {
    /// Host element
    pub element: NodeId,
    form_value: Option<FormValue>,
    validity: ValidityState,
    validation_message: String,
    aria: AriaMap,
}

impl ElementInternals {
    pub fn new(element: NodeId) -> Self {
        Self {
            element,
            form_value: None,
            validity: ValidityState::default(),
            validation_message: String::new(),
            aria: AriaMap::new(),
        }
    }

    /// Set form value; `None` removes the element from submissions
    pub fn set_form_value(&mut self, value: Option<FormValue>) {
        self.form_value = value;
    }

    pub fn form_value(&self) -> Option<&FormValue> {
        self.form_value.as_ref()
    }

    /// Replace validity flags. The message is dropped when `flags` is valid.
    pub fn set_validity(&mut self, flags: ValidityState, message: &str) {
        self.validity = flags;
        self.validation_message = if flags.valid() {
            String::new()
        } else {
            message.to_string()
        };
    }

    pub fn validity(&self) -> ValidityState {
        self.validity
    }

    pub fn validation_message(&self) -> &str {
        &self.validation_message
    }

    /// Set ARIA attribute
    pub fn set_aria(&mut self, name: &str, value: &str) {
        self.aria.set(name, value);
    }

    /// Get ARIA attribute
    pub fn get_aria(&self, name: &str) -> Option<&str> {
        self.aria.get(name)
    }

    pub fn remove_aria(&mut self, name: &str) -> Option<String> {
        self.aria.remove(name)
    }
}
