//! Attribute reflection
//!
//! Maps observed host attributes onto the rendered input. Names without an
//! entry in [`REFLECTIONS`] are forwarded as the same-named property.

use fos_dom::Document;

use crate::annotation;
use crate::element::TextInput;
use crate::error::InputError;
use crate::handler::ChangeHandler;
use crate::participant;
use crate::theme::InputSize;

/// Effect of one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reflection {
    /// Compile and install the change handler
    Handler,
    /// Height preset
    Size,
    Width,
    /// `text-align`
    Align,
    /// Error annotation
    Error,
    /// Required flag, `aria-required` and validity
    Required,
    /// Same-named property on the rendered input
    Forward,
}

const REFLECTIONS: &[(&str, Reflection)] = &[
    ("onchange", Reflection::Handler),
    ("size", Reflection::Size),
    ("width", Reflection::Width),
    ("align", Reflection::Align),
    ("error", Reflection::Error),
    ("required", Reflection::Required),
];

impl Reflection {
    pub fn for_attribute(name: &str) -> Self {
        REFLECTIONS
            .iter()
            .find(|(attr, _)| *attr == name)
            .map_or(Reflection::Forward, |&(_, reflection)| reflection)
    }
}

/// Apply an attribute change. Unchanged values do nothing.
pub(crate) fn reflect(
    element: &mut TextInput,
    doc: &mut Document,
    name: &str,
    old: Option<&str>,
    new: Option<&str>,
) -> Result<(), InputError> {
    if old == new {
        return Ok(());
    }

    let reflection = Reflection::for_attribute(name);
    tracing::debug!("Reflecting {}={:?} on {:?} as {:?}", name, new, element.host, reflection);
    let input = element.input;

    match reflection {
        Reflection::Handler => {
            // a compile error leaves the installed handler alone
            let handler = new.map(ChangeHandler::compile).transpose()?;
            element.install_handler(doc, handler)?;
        }
        Reflection::Size => {
            let height = new
                .and_then(InputSize::parse)
                .map(|size| element.theme.height(size).to_string());
            doc.set_style(input, "height", height.as_deref())?;
        }
        Reflection::Width => {
            if !doc.set_style(input, "width", new)? {
                tracing::debug!("Ignoring width {:?}", new);
            }
        }
        Reflection::Align => {
            if !doc.set_style(input, "text-align", new)? {
                tracing::debug!("Ignoring align {:?}", new);
            }
        }
        Reflection::Error => {
            annotation::annotate(doc, element.root, input, &element.theme, new)?;
        }
        Reflection::Required => {
            doc.set_property(input, "required", new)?;
            participant::set_aria_required(doc, element.host, new.is_some());
            participant::update_validity(doc, element.host, input);
        }
        Reflection::Forward => {
            doc.set_property(input, name, new)?;
            if name == "value" {
                participant::sync_form_value(doc, element.host, input);
                participant::update_validity(doc, element.host, input);
            }
        }
    }
    Ok(())
}
