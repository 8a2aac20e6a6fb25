//! Change handlers
//!
//! The `onchange` slot holds either a native closure or handler source
//! compiled with `fos-js`.

use std::fmt;
use std::rc::Rc;

use fos_dom::{Document, Event, EventCallback, ListenerId, NodeId};
use fos_js::{HandlerScript, ScriptError};

#[derive(Clone)]
pub enum ChangeHandler {
    Native(EventCallback),
    Script(Rc<HandlerScript>),
}

impl ChangeHandler {
    pub fn native(f: impl Fn(&mut Document, &mut Event) + 'static) -> Self {
        Self::Native(Rc::new(f))
    }

    /// Compile handler body source; `event` is the only parameter
    pub fn compile(source: &str) -> Result<Self, ScriptError> {
        Ok(Self::Script(Rc::new(HandlerScript::compile(source)?)))
    }

    /// Source text of a script handler
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Native(_) => None,
            Self::Script(script) => Some(script.source()),
        }
    }

    /// Listener that runs this handler with `this` bound to `host`
    pub(crate) fn callback(&self, host: NodeId) -> EventCallback {
        match self {
            Self::Native(f) => f.clone(),
            Self::Script(script) => {
                let script = script.clone();
                Rc::new(move |doc: &mut Document, event: &mut Event| {
                    match script.run(doc, event, host) {
                        Ok(outcome) => tracing::trace!("onchange handler returned {}", outcome.return_value),
                        Err(err) => tracing::warn!("onchange handler on {:?} failed: {}", host, err),
                    }
                })
            }
        }
    }
}

impl fmt::Debug for ChangeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(_) => f.write_str("ChangeHandler::Native(..)"),
            Self::Script(script) => f.debug_tuple("ChangeHandler::Script").field(&script.source()).finish(),
        }
    }
}

/// A handler and the listener it is registered under
#[derive(Debug)]
pub(crate) struct InstalledHandler {
    pub handler: ChangeHandler,
    pub listener: ListenerId,
}
