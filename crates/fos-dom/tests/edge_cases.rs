//! Edge case tests for fos-dom
//!
//! Tree mutation, dispatch, forms and custom element lifecycle through the
//! public API.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fos_dom::forms::FormMethod;
use fos_dom::*;

fn counter(doc: &mut Document, node: NodeId, event_type: &str) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    doc.add_event_listener(node, event_type, Rc::new(move |_: &mut Document, _: &mut Event| c.set(c.get() + 1)))
        .unwrap();
    count
}

// ============================================================================
// TREE
// ============================================================================

#[test]
fn test_cycle_rejected() {
    let mut doc = Document::new();
    let outer = doc.create_element("div").unwrap();
    let inner = doc.create_element("div").unwrap();
    doc.append_child(outer, inner).unwrap();
    assert!(matches!(doc.append_child(inner, outer), Err(DomError::HierarchyRequest { .. })));
}

#[test]
fn test_remove_non_child() {
    let mut doc = Document::new();
    let a = doc.create_element("div").unwrap();
    let b = doc.create_element("div").unwrap();
    assert!(matches!(doc.remove_child(a, b), Err(DomError::NotAChild { .. })));
}

#[test]
fn test_text_content_and_queries() {
    let mut doc = Document::new();
    let body = doc.body();
    let p = doc.create_element("p").unwrap();
    doc.add_class(p, "note").unwrap();
    doc.add_class(p, "note").unwrap();
    let text = doc.create_text("Hello ");
    let em = doc.create_element("em").unwrap();
    let inner = doc.create_text("world");
    doc.append_child(em, inner).unwrap();
    doc.append_child(p, text).unwrap();
    doc.append_child(p, em).unwrap();
    doc.append_child(body, p).unwrap();

    assert_eq!(doc.text_content(p), "Hello world");
    assert_eq!(doc.get_attribute(p, "class"), Some("note"));
    assert_eq!(doc.elements_by_class(body, "note"), vec![p]);
    assert_eq!(doc.first_element_by_tag(body, "EM"), Some(em));
}

#[test]
fn test_shadow_root_is_separate_tree() {
    let mut doc = Document::new();
    let body = doc.body();
    let host = doc.create_element("div").unwrap();
    doc.append_child(body, host).unwrap();
    let root = doc.attach_shadow(host, ShadowRootInit::default()).unwrap();
    let span = doc.create_element("span").unwrap();
    doc.add_class(span, "inside").unwrap();
    doc.append_child(root, span).unwrap();

    assert!(doc.is_connected(span));
    assert!(doc.elements_by_class(body, "inside").is_empty());
    assert_eq!(doc.elements_by_class(root, "inside"), vec![span]);
    assert!(matches!(
        doc.attach_shadow(host, ShadowRootInit::default()),
        Err(DomError::ShadowRootExists(_))
    ));
}

#[test]
fn test_closed_shadow_root_hidden() {
    let mut doc = Document::new();
    let host = doc.create_element("div").unwrap();
    let init = ShadowRootInit {
        mode: ShadowRootMode::Closed,
        delegates_focus: false,
    };
    doc.attach_shadow(host, init).unwrap();
    assert_eq!(doc.shadow_root(host), None);
}

// ============================================================================
// EVENTS
// ============================================================================

#[test]
fn test_non_composed_stops_at_shadow_root() {
    let mut doc = Document::new();
    let body = doc.body();
    let host = doc.create_element("div").unwrap();
    doc.append_child(body, host).unwrap();
    let root = doc.attach_shadow(host, ShadowRootInit::default()).unwrap();
    let inner = doc.create_element("span").unwrap();
    doc.append_child(root, inner).unwrap();

    let at_root = counter(&mut doc, root, "ping");
    let at_body = counter(&mut doc, body, "ping");

    let init = EventInit {
        bubbles: true,
        cancelable: false,
        composed: false,
    };
    doc.dispatch_event(inner, &mut Event::new("ping", init)).unwrap();
    assert_eq!(at_root.get(), 1);
    assert_eq!(at_body.get(), 0);
}

#[test]
fn test_listener_removed_during_dispatch() {
    let mut doc = Document::new();
    let body = doc.body();
    let second = Rc::new(RefCell::new(None::<ListenerId>));
    let slot = second.clone();
    doc.add_event_listener(
        body,
        "x",
        Rc::new(move |doc: &mut Document, _: &mut Event| {
            if let Some(id) = *slot.borrow() {
                doc.remove_event_listener(id);
            }
        }),
    )
    .unwrap();
    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();
    let id = doc
        .add_event_listener(body, "x", Rc::new(move |_: &mut Document, _: &mut Event| flag.set(true)))
        .unwrap();
    *second.borrow_mut() = Some(id);

    doc.dispatch_event(body, &mut Event::new("x", EventInit::default())).unwrap();
    assert!(!ran.get());
    assert_eq!(doc.listener_count(body, "x"), 1);
}

#[test]
fn test_prevent_default_needs_cancelable() {
    let mut doc = Document::new();
    let body = doc.body();
    doc.add_event_listener(body, "x", Rc::new(|_: &mut Document, e: &mut Event| e.prevent_default()))
        .unwrap();

    assert!(doc.dispatch_event(body, &mut Event::new("x", EventInit::default())).unwrap());
    let cancelable = EventInit {
        cancelable: true,
        ..Default::default()
    };
    assert!(!doc.dispatch_event(body, &mut Event::new("x", cancelable)).unwrap());
}

#[test]
fn test_discard_drops_listeners() {
    let mut doc = Document::new();
    let body = doc.body();
    let parent = doc.create_element("div").unwrap();
    let child = doc.create_element("span").unwrap();
    doc.append_child(parent, child).unwrap();
    doc.append_child(body, parent).unwrap();
    counter(&mut doc, child, "x");

    doc.discard(parent).unwrap();
    assert!(doc.is_discarded(child));
    assert!(!doc.is_connected(child));
    assert_eq!(doc.listener_count(child, "x"), 0);
    assert!(doc.children(body).is_empty());
}

// ============================================================================
// STYLE & PROPERTIES
// ============================================================================

#[test]
fn test_style_validation() {
    let mut doc = Document::new();
    let div = doc.create_element("div").unwrap();
    assert!(doc.set_style(div, "height", Some("26px")).unwrap());
    assert!(!doc.set_style(div, "height", Some("tall")).unwrap());
    assert!(doc.set_style(div, "text-align", Some("var(--align)")).unwrap());
    assert_eq!(doc.style(div).unwrap().css_text(), "height: 26px; text-align: var(--align);");
}

#[test]
fn test_control_attribute_and_property() {
    let mut doc = Document::new();
    let input = doc.create_element("input").unwrap();
    doc.set_attribute(input, "value", "a").unwrap();
    assert_eq!(doc.control_value(input), Some("a"));

    doc.set_property(input, "value", Some("b")).unwrap();
    assert_eq!(doc.get_attribute(input, "value"), Some("a"));
    assert_eq!(doc.property(input, "value").as_deref(), Some("b"));

    doc.set_attribute(input, "TYPE", "bogus").unwrap();
    assert_eq!(doc.property(input, "type").as_deref(), Some("text"));
    assert_eq!(doc.property(input, "tagName").as_deref(), Some("INPUT"));
}

#[test]
fn test_plain_element_properties() {
    let mut doc = Document::new();
    let div = doc.create_element("div").unwrap();
    doc.set_property(div, "title", Some("t")).unwrap();
    assert_eq!(doc.property(div, "title").as_deref(), Some("t"));
    doc.set_property(div, "title", None).unwrap();
    assert_eq!(doc.property(div, "title"), None);
}

// ============================================================================
// FORMS
// ============================================================================

fn form_with_field(doc: &mut Document) -> (NodeId, NodeId) {
    let form = doc.create_element("form").unwrap();
    let body = doc.body();
    doc.append_child(body, form).unwrap();
    let field = doc.create_element("input").unwrap();
    doc.set_attribute(field, "name", "field").unwrap();
    doc.append_child(form, field).unwrap();
    (form, field)
}

#[test]
fn test_submit_event_can_cancel() {
    let mut doc = Document::new();
    let (form, _) = form_with_field(&mut doc);
    doc.add_event_listener(form, event_type::SUBMIT, Rc::new(|_: &mut Document, e: &mut Event| e.prevent_default()))
        .unwrap();
    assert!(!doc.request_submit(form, None).unwrap());
    assert!(doc.submissions().is_empty());
}

#[test]
fn test_novalidate_skips_validation() {
    let mut doc = Document::new();
    let (form, field) = form_with_field(&mut doc);
    doc.set_attribute(field, "required", "").unwrap();
    assert!(!doc.request_submit(form, None).unwrap());
    assert_eq!(doc.validation_reports().len(), 1);

    doc.set_attribute(form, "novalidate", "").unwrap();
    assert!(doc.request_submit(form, None).unwrap());
}

#[test]
fn test_submitter_overrides() {
    let mut doc = Document::new();
    let (form, field) = form_with_field(&mut doc);
    doc.set_attribute(form, "action", "/default").unwrap();
    doc.set_control_value(field, "v").unwrap();

    let button = doc.create_element("button").unwrap();
    doc.set_attribute(button, "name", "op").unwrap();
    doc.set_attribute(button, "value", "save").unwrap();
    doc.set_attribute(button, "formaction", "/save").unwrap();
    doc.set_attribute(button, "formmethod", "post").unwrap();
    doc.append_child(form, button).unwrap();

    assert!(doc.click(button).unwrap());
    let submission = &doc.submissions()[0];
    assert_eq!(submission.action, "/save");
    assert_eq!(submission.method, FormMethod::Post);
    assert_eq!(submission.data.to_url_encoded(), "field=v&op=save");
}

#[test]
fn test_non_submit_button_does_not_submit() {
    let mut doc = Document::new();
    let (form, _) = form_with_field(&mut doc);
    let button = doc.create_element("button").unwrap();
    doc.set_attribute(button, "type", "button").unwrap();
    doc.append_child(form, button).unwrap();

    assert_eq!(doc.submit_control(form), None);
    assert!(doc.click(button).unwrap());
    assert!(doc.submissions().is_empty());
}

#[test]
fn test_click_canceled() {
    let mut doc = Document::new();
    let (form, _) = form_with_field(&mut doc);
    let button = doc.create_element("button").unwrap();
    doc.append_child(form, button).unwrap();
    doc.add_event_listener(button, event_type::CLICK, Rc::new(|_: &mut Document, e: &mut Event| e.prevent_default()))
        .unwrap();

    assert!(!doc.click(button).unwrap());
    assert!(doc.submissions().is_empty());
}

#[test]
fn test_nested_form_owner() {
    let mut doc = Document::new();
    let (form, _) = form_with_field(&mut doc);
    let fieldset = doc.create_element("fieldset").unwrap();
    let nested = doc.create_element("input").unwrap();
    doc.append_child(fieldset, nested).unwrap();
    doc.append_child(form, fieldset).unwrap();
    assert_eq!(doc.form_owner(nested), Some(form));
    assert_eq!(doc.form_owner(form), None);
}

#[test]
fn test_checkbox_entries() {
    let mut doc = Document::new();
    let (form, _) = form_with_field(&mut doc);
    let checked = doc.create_element("input").unwrap();
    doc.set_attribute(checked, "type", "checkbox").unwrap();
    doc.set_attribute(checked, "name", "agree").unwrap();
    doc.set_attribute(checked, "checked", "").unwrap();
    doc.append_child(form, checked).unwrap();
    let unchecked = doc.create_element("input").unwrap();
    doc.set_attribute(unchecked, "type", "checkbox").unwrap();
    doc.set_attribute(unchecked, "name", "spam").unwrap();
    doc.append_child(form, unchecked).unwrap();

    assert!(doc.request_submit(form, None).unwrap());
    let data = &doc.submissions()[0].data;
    assert_eq!(data.get("agree"), Some("on"));
    assert!(!data.has("spam"));
}

// ============================================================================
// CUSTOM ELEMENTS
// ============================================================================

struct Field {
    internals_seen: bool,
}

impl CustomElement for Field {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn define_field(doc: &mut Document) {
    let definition = CustomElementDefinition::new(
        "x-field",
        Rc::new(|doc: &mut Document, node: NodeId| -> Result<Box<dyn CustomElement>, ReactionError> {
            Ok(Box::new(Field {
                internals_seen: doc.internals(node).is_some(),
            }))
        }),
    )
    .form_associated(true);
    doc.define_element(definition).unwrap();
}

#[test]
fn test_internals_available_in_constructor() {
    let mut doc = Document::new();
    define_field(&mut doc);
    let node = doc.create_element("x-field").unwrap();
    assert!(doc.custom_element::<Field>(node).unwrap().internals_seen);

    let mut plain = Document::with_options(DocumentOptions { form_association: false });
    define_field(&mut plain);
    let node = plain.create_element("x-field").unwrap();
    assert!(!plain.custom_element::<Field>(node).unwrap().internals_seen);
}

#[test]
fn test_form_associated_entries() {
    let mut doc = Document::new();
    define_field(&mut doc);
    let (form, field) = form_with_field(&mut doc);
    doc.set_control_value(field, "native").unwrap();

    let custom = doc.create_element("x-field").unwrap();
    doc.set_attribute(custom, "name", "ignored-for-entries").unwrap();
    doc.append_child(form, custom).unwrap();
    doc.internals_mut(custom).unwrap().set_form_value(Some(forms::FormValue::Entries(vec![
        ("a".into(), "1".into()),
        ("b".into(), "2".into()),
    ])));

    assert!(doc.request_submit(form, None).unwrap());
    assert_eq!(doc.submissions()[0].data.to_url_encoded(), "field=native&a=1&b=2");
}

#[test]
fn test_duplicate_definition() {
    let mut doc = Document::new();
    define_field(&mut doc);
    let again = CustomElementDefinition::new(
        "x-field",
        Rc::new(|_: &mut Document, _: NodeId| -> Result<Box<dyn CustomElement>, ReactionError> {
            Ok(Box::new(Field { internals_seen: false }))
        }),
    );
    assert!(matches!(
        doc.define_element(again),
        Err(DomError::CustomElement(CustomElementError::AlreadyDefined(_)))
    ));
}

#[test]
fn test_invalid_names() {
    for name in ["nodash", "Upper-case", "font-face", "-leading", "1-digit"] {
        assert!(!CustomElementRegistry::is_valid_name(name), "{} accepted", name);
    }
    assert!(CustomElementRegistry::is_valid_name("pj1-input"));
}

#[test]
fn test_constructor_failure() {
    let mut doc = Document::new();
    let definition = CustomElementDefinition::new(
        "x-broken",
        Rc::new(|_: &mut Document, _: NodeId| -> Result<Box<dyn CustomElement>, ReactionError> {
            Err("no".into())
        }),
    )
    .form_associated(true);
    doc.define_element(definition).unwrap();

    let err = doc.create_element("x-broken").unwrap_err();
    assert!(matches!(err, DomError::Construction { ref element, .. } if element == "x-broken"));
}
