//! Error annotation
//!
//! The host-supplied `error` message: a danger-colored border and a single
//! `<span class="error">` after the rendered input.

use fos_dom::{Document, NodeId};

use crate::error::InputError;
use crate::theme::InputTheme;

pub const ERROR_CLASS: &str = "error";

/// Replace the current annotation with `message`; empty or `None` clears it
pub(crate) fn annotate(
    doc: &mut Document,
    root: NodeId,
    input: NodeId,
    theme: &InputTheme,
    message: Option<&str>,
) -> Result<(), InputError> {
    doc.set_style(input, "border-color", Some(&theme.border_color))?;
    for node in doc.elements_by_class(root, ERROR_CLASS) {
        doc.discard(node)?;
    }

    let Some(message) = message.filter(|m| !m.is_empty()) else {
        tracing::debug!("Cleared error annotation in {:?}", root);
        return Ok(());
    };

    doc.set_style(input, "border-color", Some(&theme.danger_color))?;
    let span = doc.create_element("span")?;
    doc.add_class(span, ERROR_CLASS)?;
    let text = doc.create_text(message);
    doc.append_child(span, text)?;
    doc.append_child(root, span)?;
    tracing::debug!("Error annotation in {:?}: {}", root, message);
    Ok(())
}

/// Message of the annotation currently shown
pub(crate) fn current_error(doc: &Document, root: NodeId) -> Option<String> {
    doc.elements_by_class(root, ERROR_CLASS)
        .first()
        .map(|&span| doc.text_content(span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::ShadowRootInit;

    fn shadow_with_input(doc: &mut Document) -> (NodeId, NodeId) {
        let host = doc.create_element("div").unwrap();
        let root = doc.attach_shadow(host, ShadowRootInit::default()).unwrap();
        let input = doc.create_element("input").unwrap();
        doc.append_child(root, input).unwrap();
        (root, input)
    }

    #[test]
    fn test_set_and_clear() {
        let mut doc = Document::new();
        let theme = InputTheme::default();
        let (root, input) = shadow_with_input(&mut doc);

        annotate(&mut doc, root, input, &theme, Some("Bad value")).unwrap();
        assert_eq!(current_error(&doc, root).as_deref(), Some("Bad value"));
        assert_eq!(doc.style(input).unwrap().get("border-color"), Some("#DE3535"));

        annotate(&mut doc, root, input, &theme, Some("")).unwrap();
        assert_eq!(current_error(&doc, root), None);
        assert_eq!(doc.style(input).unwrap().get("border-color"), Some("#d9d9d9"));
    }

    #[test]
    fn test_replaces_previous() {
        let mut doc = Document::new();
        let theme = InputTheme::default();
        let (root, input) = shadow_with_input(&mut doc);

        annotate(&mut doc, root, input, &theme, Some("first")).unwrap();
        annotate(&mut doc, root, input, &theme, Some("second")).unwrap();
        assert_eq!(doc.elements_by_class(root, ERROR_CLASS).len(), 1);
        assert_eq!(current_error(&doc, root).as_deref(), Some("second"));
    }

    #[test]
    fn test_message_is_text() {
        let mut doc = Document::new();
        let theme = InputTheme::default();
        let (root, input) = shadow_with_input(&mut doc);

        annotate(&mut doc, root, input, &theme, Some("<b>bold</b>")).unwrap();
        let span = doc.elements_by_class(root, ERROR_CLASS)[0];
        assert_eq!(doc.first_element_by_tag(span, "b"), None);
        assert_eq!(doc.text_content(span), "<b>bold</b>");
    }
}
