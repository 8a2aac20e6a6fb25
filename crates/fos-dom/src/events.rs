//! DOM Events
//!
//! Event objects, listener registration and dispatch. Dispatch runs the
//! target and bubble phases along the composed path; composed events cross
//! shadow boundaries and are retargeted to the host on the way out.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::document::Document;
use crate::error::DomError;
use crate::NodeId;

/// Well-known event type names
pub mod event_type {
    pub const INPUT: &str = "input";
    pub const KEYPRESS: &str = "keypress";
    pub const CLICK: &str = "click";
    pub const SUBMIT: &str = "submit";
    pub const INVALID: &str = "invalid";
}

/// Listener callback. Receives the document so handlers can query and
/// mutate the tree while the event is in flight.
pub type EventCallback = Rc<dyn Fn(&mut Document, &mut Event)>;

/// Handle returned by `add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Event construction flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
    pub composed: bool,
}

/// Keyboard event fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardEventInit {
    /// Key value (`"a"`, `"Enter"`)
    pub key: String,
    /// Physical key code name (`"KeyA"`, `"Enter"`)
    pub code: String,
    /// Legacy numeric key code
    pub key_code: u32,
}

impl KeyboardEventInit {
    /// The Enter key as modern browsers report it
    pub fn enter() -> Self {
        Self {
            key: "Enter".into(),
            code: "Enter".into(),
            key_code: 13,
        }
    }

    /// A printable character
    pub fn character(c: char) -> Self {
        let code = if c.is_ascii_alphabetic() {
            format!("Key{}", c.to_ascii_uppercase())
        } else if c.is_ascii_digit() {
            format!("Digit{}", c)
        } else {
            String::new()
        };
        Self {
            key: c.to_string(),
            code,
            key_code: c as u32,
        }
    }
}

/// Event-class specific payload
#[derive(Debug, Clone, Default)]
pub enum EventDetail {
    #[default]
    None,
    /// `KeyboardEvent`
    Keyboard(KeyboardEventInit),
    /// `CustomEvent` carrying another event as its detail
    Custom(Box<Event>),
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub bubbles: bool,
    pub cancelable: bool,
    pub composed: bool,
    pub detail: EventDetail,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(event_type: &str, init: EventInit) -> Self {
        Self {
            event_type: event_type.to_string(),
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            composed: init.composed,
            detail: EventDetail::None,
            target: None,
            current_target: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// `input` as fired by a text control on user edits
    pub fn input() -> Self {
        Self::new(
            event_type::INPUT,
            EventInit { bubbles: true, cancelable: false, composed: true },
        )
    }

    /// `keypress` for the given key
    pub fn keypress(key: KeyboardEventInit) -> Self {
        let mut event = Self::new(
            event_type::KEYPRESS,
            EventInit { bubbles: true, cancelable: true, composed: true },
        );
        event.detail = EventDetail::Keyboard(key);
        event
    }

    /// `CustomEvent` whose detail is another event
    pub fn custom(event_type: &str, init: EventInit, detail: Event) -> Self {
        let mut event = Self::new(event_type, init);
        event.detail = EventDetail::Custom(Box::new(detail));
        event
    }

    /// Node the event was dispatched to, as seen by the current listener
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Node whose listeners are currently running
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    /// Keyboard payload
    pub fn keyboard(&self) -> Option<&KeyboardEventInit> {
        match &self.detail {
            EventDetail::Keyboard(k) => Some(k),
            _ => None,
        }
    }

    /// Event carried as `CustomEvent.detail`
    pub fn detail_event(&self) -> Option<&Event> {
        match &self.detail {
            EventDetail::Custom(e) => Some(e),
            _ => None,
        }
    }

    /// Raw event for consumers that expect `nativeEvent`; same as the detail
    pub fn native_event(&self) -> Option<&Event> {
        self.detail_event()
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

struct RegisteredListener {
    id: ListenerId,
    event_type: String,
    callback: EventCallback,
}

impl fmt::Debug for RegisteredListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredListener")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}

/// Listener storage keyed by target node
#[derive(Debug, Default)]
pub(crate) struct EventListeners {
    by_node: HashMap<NodeId, Vec<RegisteredListener>>,
    owners: HashMap<ListenerId, NodeId>,
    next_id: u64,
}

impl EventListeners {
    pub(crate) fn add(&mut self, node: NodeId, event_type: &str, callback: EventCallback) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.by_node.entry(node).or_default().push(RegisteredListener {
            id,
            event_type: event_type.to_string(),
            callback,
        });
        self.owners.insert(id, node);
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let Some(node) = self.owners.remove(&id) else {
            return false;
        };
        if let Some(listeners) = self.by_node.get_mut(&node) {
            listeners.retain(|l| l.id != id);
            if listeners.is_empty() {
                self.by_node.remove(&node);
            }
        }
        true
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.owners.contains_key(&id)
    }

    pub(crate) fn count(&self, node: NodeId, event_type: &str) -> usize {
        self.by_node
            .get(&node)
            .map(|v| v.iter().filter(|l| l.event_type == event_type).count())
            .unwrap_or(0)
    }

    /// Listeners registered when the phase starts; later additions wait for
    /// the next dispatch
    fn snapshot(&self, node: NodeId, event_type: &str) -> Vec<(ListenerId, EventCallback)> {
        self.by_node
            .get(&node)
            .map(|v| {
                v.iter()
                    .filter(|l| l.event_type == event_type)
                    .map(|l| (l.id, l.callback.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn remove_node(&mut self, node: NodeId) {
        if let Some(listeners) = self.by_node.remove(&node) {
            for l in listeners {
                self.owners.remove(&l.id);
            }
        }
    }
}

impl Document {
    /// Register a listener for `event_type` on `node`
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        callback: EventCallback,
    ) -> Result<ListenerId, DomError> {
        self.node(node)?;
        Ok(self.listeners.add(node, event_type, callback))
    }

    /// Unregister a listener; returns whether it was registered
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Number of listeners for `event_type` registered on `node`
    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners.count(node, event_type)
    }

    /// Dispatch `event` at `target`. Returns `false` if a listener
    /// canceled it.
    pub fn dispatch_event(&mut self, target: NodeId, event: &mut Event) -> Result<bool, DomError> {
        self.node(target)?;
        let path = self.event_path(target, event.composed);

        for (idx, &(node, retarget)) in path.iter().enumerate() {
            if idx > 0 && !event.bubbles {
                break;
            }
            event.target = Some(retarget);
            event.current_target = Some(node);

            for (id, callback) in self.listeners.snapshot(node, &event.event_type) {
                // removed by an earlier listener in this phase
                if !self.listeners.contains(id) {
                    continue;
                }
                callback(self, event);
            }

            if event.propagation_stopped {
                break;
            }
        }

        event.target = Some(target);
        event.current_target = None;
        Ok(!event.default_prevented)
    }

    /// (node, target-as-seen-from-node) pairs from `target` outward
    fn event_path(&self, target: NodeId, composed: bool) -> Vec<(NodeId, NodeId)> {
        let mut path = Vec::new();
        let mut current = Some(target);
        let mut retarget = target;

        while let Some(node) = current {
            path.push((node, retarget));
            let Some(data) = self.tree.get(node) else { break };
            current = match data.as_shadow_root() {
                Some(root) if composed => {
                    retarget = root.host;
                    Some(root.host)
                }
                Some(_) => None,
                None => data.parent(),
            };
        }
        path
    }

    /// Replace a text control's value as a user edit would, then fire `input`
    pub fn user_input(&mut self, node: NodeId, value: &str) -> Result<bool, DomError> {
        self.set_control_value(node, value)?;
        tracing::trace!("User input on {:?}", node);
        self.dispatch_event(node, &mut Event::input())
    }

    /// Fire `keypress` at `node`
    pub fn key_press(&mut self, node: NodeId, key: KeyboardEventInit) -> Result<bool, DomError> {
        self.dispatch_event(node, &mut Event::keypress(key))
    }
}
