//! Shadow DOM
//!
//! Shadow root attachment. The root is a parentless node whose composed
//! parent is its host.

use crate::document::Document;
use crate::error::DomError;
use crate::node::Node;
use crate::NodeId;

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Options for `attachShadow`
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowRootInit {
    pub mode: ShadowRootMode,
    pub delegates_focus: bool,
}

/// Shadow root
#[derive(Debug, Clone)]
pub struct ShadowRootData {
    pub host: NodeId,
    pub mode: ShadowRootMode,
    pub delegates_focus: bool,
}

impl ShadowRootData {
    /// Create a new shadow root
    pub fn new(host: NodeId, mode: ShadowRootMode) -> Self {
        Self {
            host,
            mode,
            delegates_focus: false,
        }
    }
}

impl Document {
    /// Attach a shadow root to `host`. An element hosts at most one root.
    pub fn attach_shadow(&mut self, host: NodeId, init: ShadowRootInit) -> Result<NodeId, DomError> {
        let elem = self.element(host)?;
        if elem.shadow_root.is_some() {
            return Err(DomError::ShadowRootExists(host));
        }

        let root = self.tree.alloc(Node::shadow_root(ShadowRootData {
            host,
            mode: init.mode,
            delegates_focus: init.delegates_focus,
        }));
        self.element_mut(host)?.shadow_root = Some(root);
        tracing::debug!("Attached {:?} shadow root {:?} to {:?}", init.mode, root, host);
        Ok(root)
    }

    /// Shadow root of `host` if it is open
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let root = self.element(host).ok()?.shadow_root?;
        let data = self.tree.get(root)?.as_shadow_root()?;
        (data.mode == ShadowRootMode::Open).then_some(root)
    }
}
