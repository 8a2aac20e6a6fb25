//! Form participation
//!
//! Pushes the rendered input's value and required-field validity into the
//! host's `ElementInternals`. Every function is a no-op when the document
//! gave the host no internals.

use fos_dom::forms::{FormValue, ValidityState};
use fos_dom::{Document, NodeId};

pub const VALUE_MISSING_MESSAGE: &str = "This field is required";

/// Copy the rendered input's value into the form value
pub(crate) fn sync_form_value(doc: &mut Document, host: NodeId, input: NodeId) {
    let value = doc.control_value(input).unwrap_or_default().to_string();
    if let Some(internals) = doc.internals_mut(host) {
        tracing::trace!("Form value of {:?} = {:?}", host, value);
        internals.set_form_value(Some(FormValue::String(value)));
    }
}

/// Recompute the required-field rule
pub(crate) fn update_validity(doc: &mut Document, host: NodeId, input: NodeId) {
    let missing = doc
        .control(input)
        .is_some_and(|c| c.required && c.value.is_empty());
    let Some(internals) = doc.internals_mut(host) else {
        return;
    };
    if missing {
        internals.set_validity(ValidityState::value_missing(), VALUE_MISSING_MESSAGE);
    } else {
        internals.set_validity(ValidityState::default(), "");
    }
}

pub(crate) fn set_aria_required(doc: &mut Document, host: NodeId, required: bool) {
    if let Some(internals) = doc.internals_mut(host) {
        if required {
            internals.set_aria("aria-required", "true");
        } else {
            internals.remove_aria("aria-required");
        }
    }
}

/// Owning form, as reported through the internals
pub(crate) fn form(doc: &Document, host: NodeId) -> Option<NodeId> {
    doc.internals(host)?;
    doc.form_owner(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::DocumentOptions;

    fn host_with_internals(doc: &mut Document) -> (NodeId, NodeId) {
        use fos_dom::{CustomElement, CustomElementDefinition};
        use std::any::Any;
        use std::rc::Rc;

        struct Bare;
        impl CustomElement for Bare {
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }

        let definition = CustomElementDefinition::new(
            "bare-field",
            Rc::new(|_: &mut Document, _: NodeId| -> Result<Box<dyn CustomElement>, fos_dom::ReactionError> {
                Ok(Box::new(Bare))
            }),
        )
        .form_associated(true);
        doc.define_element(definition).unwrap();
        let host = doc.create_element("bare-field").unwrap();
        let input = doc.create_element("input").unwrap();
        (host, input)
    }

    #[test]
    fn test_required_rule() {
        let mut doc = Document::new();
        let (host, input) = host_with_internals(&mut doc);
        doc.set_property(input, "required", Some("")).unwrap();

        update_validity(&mut doc, host, input);
        let internals = doc.internals(host).unwrap();
        assert!(internals.validity().value_missing);
        assert_eq!(internals.validation_message(), VALUE_MISSING_MESSAGE);

        doc.set_control_value(input, "x").unwrap();
        update_validity(&mut doc, host, input);
        assert!(doc.internals(host).unwrap().validity().valid());
        assert_eq!(doc.internals(host).unwrap().validation_message(), "");
    }

    #[test]
    fn test_sync_and_aria() {
        let mut doc = Document::new();
        let (host, input) = host_with_internals(&mut doc);
        doc.set_control_value(input, "abc").unwrap();
        sync_form_value(&mut doc, host, input);
        assert_eq!(doc.internals(host).unwrap().form_value(), Some(&FormValue::from("abc")));

        set_aria_required(&mut doc, host, true);
        assert_eq!(doc.internals(host).unwrap().get_aria("aria-required"), Some("true"));
        set_aria_required(&mut doc, host, false);
        assert_eq!(doc.internals(host).unwrap().get_aria("aria-required"), None);
    }

    #[test]
    fn test_without_internals() {
        let mut doc = Document::with_options(DocumentOptions { form_association: false });
        let (host, input) = host_with_internals(&mut doc);
        let owner = doc.create_element("form").unwrap();
        doc.append_child(owner, host).unwrap();

        sync_form_value(&mut doc, host, input);
        update_validity(&mut doc, host, input);
        set_aria_required(&mut doc, host, true);
        assert!(doc.internals(host).is_none());
        assert_eq!(form(&doc, host), None);
    }
}
