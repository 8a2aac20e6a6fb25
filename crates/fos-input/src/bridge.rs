//! Event bridge
//!
//! Listens on the rendered input while the host is connected. `input`
//! becomes the composed `onchange` event on the host; Enter clicks the
//! owning form's submit control.

use std::rc::Rc;

use fos_dom::{Document, Event, EventInit, ListenerId, NodeId, event_type};

use crate::participant;
use crate::CHANGE_EVENT;

/// Listener handles for one mount
#[derive(Debug)]
pub(crate) struct BridgeListeners {
    input: ListenerId,
    keypress: ListenerId,
}

impl BridgeListeners {
    pub fn attach(doc: &mut Document, host: NodeId, input: NodeId) -> Result<Self, fos_dom::DomError> {
        let on_input = doc.add_event_listener(
            input,
            event_type::INPUT,
            Rc::new(move |doc: &mut Document, event: &mut Event| relay_input(doc, host, input, event)),
        )?;
        let on_keypress = doc.add_event_listener(
            input,
            event_type::KEYPRESS,
            Rc::new(move |doc: &mut Document, event: &mut Event| submit_on_enter(doc, host, event)),
        )?;
        tracing::debug!("Attached event bridge on {:?}", host);
        Ok(Self {
            input: on_input,
            keypress: on_keypress,
        })
    }

    pub fn detach(self, doc: &mut Document) {
        doc.remove_event_listener(self.input);
        doc.remove_event_listener(self.keypress);
        tracing::debug!("Detached event bridge");
    }
}

fn relay_input(doc: &mut Document, host: NodeId, input: NodeId, event: &mut Event) {
    // the form value must be current before change listeners run
    participant::sync_form_value(doc, host, input);

    let init = EventInit {
        bubbles: true,
        cancelable: true,
        composed: true,
    };
    let mut change = Event::custom(CHANGE_EVENT, init, event.clone());
    match doc.dispatch_event(host, &mut change) {
        Ok(true) => tracing::trace!("onchange on {:?} not canceled", host),
        Ok(false) => tracing::trace!("onchange on {:?} canceled", host),
        Err(err) => tracing::warn!("Failed to dispatch onchange on {:?}: {}", host, err),
    }

    participant::update_validity(doc, host, input);
}

fn is_enter(event: &Event) -> bool {
    event
        .keyboard()
        .is_some_and(|key| key.code == "Enter" || key.key_code == 13)
}

fn submit_on_enter(doc: &mut Document, host: NodeId, event: &mut Event) {
    if !is_enter(event) {
        return;
    }
    // Without form association the host has no form owner.
    let Some(form) = participant::form(doc, host) else {
        return;
    };
    let Some(button) = doc.submit_control(form) else {
        tracing::debug!("No submit control in {:?}", form);
        return;
    };
    if matches!(doc.is_disabled(button), Ok(true)) {
        return;
    }
    if let Err(err) = doc.click(button) {
        tracing::warn!("Enter-to-submit click on {:?} failed: {}", button, err);
    }
}
