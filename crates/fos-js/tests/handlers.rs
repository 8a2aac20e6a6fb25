//! Handler scripts wired to real dispatches

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{Document, Event, EventInit, KeyboardEventInit, ShadowRootInit};
use fos_js::{ConsoleLevel, ConsoleMessage, HandlerScript, JsValue, ScriptError};

/// Install `source` as a listener and collect each run's console output
fn install(doc: &mut Document, node: fos_dom::NodeId, event_type: &str, source: &str) -> Rc<RefCell<Vec<ConsoleMessage>>> {
    let script = Rc::new(HandlerScript::compile(source).unwrap());
    let output = Rc::new(RefCell::new(Vec::new()));
    let sink = output.clone();
    doc.add_event_listener(
        node,
        event_type,
        Rc::new(move |doc: &mut Document, event: &mut Event| {
            let outcome = script.run(doc, event, node).unwrap();
            sink.borrow_mut().extend(outcome.console);
        }),
    )
    .unwrap();
    output
}

#[test]
fn test_handler_sees_retargeted_event() {
    let mut doc = Document::new();
    let host = doc.create_element("div").unwrap();
    doc.set_attribute(host, "id", "host").unwrap();
    let body = doc.body();
    doc.append_child(body, host).unwrap();
    let root = doc.attach_shadow(host, ShadowRootInit::default()).unwrap();
    let inner = doc.create_element("input").unwrap();
    doc.append_child(root, inner).unwrap();

    let output = install(&mut doc, body, "ping", "console.log(event.type, event.target.id, this.tagName)");

    let init = EventInit { bubbles: true, composed: true, cancelable: false };
    doc.dispatch_event(inner, &mut Event::new("ping", init)).unwrap();

    let output = output.borrow();
    assert_eq!(output.len(), 1);
    assert_eq!(output[0].text, "ping host BODY");
}

#[test]
fn test_return_false_cancels_dispatch() {
    let mut doc = Document::new();
    let body = doc.body();
    install(&mut doc, body, "keypress", "if (event.key === 'x') return false");

    assert!(!doc.key_press(body, KeyboardEventInit::character('x')).unwrap());
    assert!(doc.key_press(body, KeyboardEventInit::character('y')).unwrap());
}

#[test]
fn test_stop_propagation_from_script() {
    let mut doc = Document::new();
    let body = doc.body();
    let child = doc.create_element("span").unwrap();
    doc.append_child(body, child).unwrap();

    install(&mut doc, child, "keypress", "event.stopPropagation()");
    let outer = install(&mut doc, body, "keypress", "console.error('reached body')");

    doc.key_press(child, KeyboardEventInit::enter()).unwrap();
    assert!(outer.borrow().is_empty());
}

#[test]
fn test_nested_custom_event_detail() {
    let mut doc = Document::new();
    let body = doc.body();
    let output = install(
        &mut doc,
        body,
        "onchange",
        "console.warn(event.detail.type, event.nativeEvent?.key ?? 'none')",
    );

    let raw = Event::keypress(KeyboardEventInit::character('q'));
    let mut event = Event::custom("onchange", EventInit::default(), raw);
    doc.dispatch_event(body, &mut event).unwrap();

    let output = output.borrow();
    assert_eq!(output[0].level, ConsoleLevel::Warn);
    assert_eq!(output[0].text, "keypress q");
}

#[test]
fn test_sandbox_rejections() {
    for source in [
        "alert('x')",
        "document.cookie",
        "event.returnValue = false",
        "while (true) {}",
        "event.x++",
        "(() => 1)",
        "[1, 2]",
        "eval('1')",
    ] {
        assert!(HandlerScript::compile(source).is_err(), "accepted {:?}", source);
    }
}

#[test]
fn test_deeply_nested_source_fails_to_compile() {
    let depth = fos_js::engine::parser::MAX_NESTING;
    let deep = format!("return {}1{}", "(".repeat(depth * 40), ")".repeat(depth * 40));
    let err = HandlerScript::compile(&deep).unwrap_err();
    assert!(matches!(err, ScriptError::Syntax { ref message, .. } if message == "nesting too deep"));

    let doc = Document::new();
    let script = HandlerScript::compile(&format!("return {}true", "!!".repeat(depth / 4))).unwrap();
    let mut event = Event::new("change", EventInit::default());
    assert_eq!(script.run(&doc, &mut event, doc.body()).unwrap().return_value, JsValue::Bool(true));
}

#[test]
fn test_forbidden_error_names_identifier() {
    let err = HandlerScript::compile("console.log(window)").unwrap_err();
    assert_eq!(err.to_string(), "'window' is not available in event handlers (at 12..18)");
    assert!(err.span().is_some());
}

#[test]
fn test_runtime_error_surfaces() {
    let doc = Document::new();
    let script = HandlerScript::compile("return event.detail.key").unwrap();
    let mut event = Event::new("change", EventInit::default());
    let err = script.run(&doc, &mut event, doc.body()).unwrap_err();
    assert_eq!(err, ScriptError::TypeError("Cannot read properties of null (reading 'key')".into()));
}

#[test]
fn test_return_value_converted() {
    let doc = Document::new();
    let mut event = Event::new("x", EventInit::default());
    let script = HandlerScript::compile("return event").unwrap();
    let outcome = script.run(&doc, &mut event, doc.body()).unwrap();
    assert_eq!(outcome.return_value, JsValue::Object);
    assert!(!outcome.canceled());
}
