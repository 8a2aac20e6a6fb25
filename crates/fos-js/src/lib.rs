//! fOS JavaScript Handlers
//!
//! Compiles and runs inline event handler scripts such as the value of an
//! `onchange` attribute.
//!
//! Features:
//! - Sandboxed expression language: only `event`, `console` and `this`
//! - Compile-time rejection of assignments, loops and bare calls
//! - Console API (log, info, warn, error, debug) routed to `tracing`
//! - `return false` cancels the event

mod console;
pub mod engine;
mod error;

pub use console::{ConsoleLevel, ConsoleMessage};
pub use engine::{JsValue, Span};
pub use error::ScriptError;

use fos_dom::{Document, Event, NodeId};

use engine::{Ast, Parser, interpreter::Interpreter};

/// A compiled handler body
#[derive(Debug, Clone)]
pub struct HandlerScript {
    source: String,
    ast: Ast,
}

impl HandlerScript {
    /// Parse and validate handler source
    pub fn compile(source: &str) -> Result<Self, ScriptError> {
        let ast = Parser::new(source).parse()?;
        tracing::debug!(len = source.len(), "compiled handler script");
        Ok(Self {
            source: source.to_string(),
            ast,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run against `event` with `this` bound to `this`
    pub fn run(&self, doc: &Document, event: &mut Event, this: NodeId) -> Result<ScriptOutcome, ScriptError> {
        let (value, console) = Interpreter::new(&self.ast, doc, event, this).run()?;
        let return_value = value.into_js();
        if return_value == JsValue::Bool(false) {
            event.prevent_default();
        }
        Ok(ScriptOutcome { return_value, console })
    }
}

/// Result of one handler invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptOutcome {
    pub return_value: JsValue,
    pub console: Vec<ConsoleMessage>,
}

impl ScriptOutcome {
    /// Whether the handler returned `false`
    pub fn canceled(&self) -> bool {
        self.return_value == JsValue::Bool(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::EventInit;

    #[test]
    fn test_compile_keeps_source() {
        let script = HandlerScript::compile("console.log(event.type)").unwrap();
        assert_eq!(script.source(), "console.log(event.type)");
    }

    #[test]
    fn test_return_false_cancels() {
        let doc = Document::new();
        let script = HandlerScript::compile("return false").unwrap();
        let mut event = Event::new("change", EventInit { cancelable: true, ..Default::default() });
        let outcome = script.run(&doc, &mut event, doc.body()).unwrap();
        assert!(outcome.canceled());
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_forbidden_global() {
        let err = HandlerScript::compile("window.alert('x')").unwrap_err();
        assert!(matches!(err, ScriptError::Forbidden { ref name, .. } if name == "window"));
    }
}
