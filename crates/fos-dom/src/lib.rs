//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree with the host capabilities custom elements rely on:
//! shadow roots, attributes and IDL properties, inline style, event
//! listeners and dispatch, form ownership and submission, `ElementInternals`
//! and the custom element registry.
//!
//! The whole document is single-threaded: listeners and element instances
//! are `Rc`/`Box` values owned by the [`Document`].

mod custom_elements;
mod document;
mod error;
mod events;
pub mod forms;
mod node;
mod shadow;
mod style;
mod tree;

pub use custom_elements::{
    CustomElement, CustomElementDefinition, CustomElementError, CustomElementRegistry,
    ElementConstructor, ReactionError, ReactionResult,
};
pub use document::{Document, DocumentOptions};
pub use error::DomError;
pub use events::{
    Event, EventCallback, EventDetail, EventInit, KeyboardEventInit, ListenerId, event_type,
};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use shadow::{ShadowRootData, ShadowRootInit, ShadowRootMode};
pub use style::InlineStyle;
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Raw arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
