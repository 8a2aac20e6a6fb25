//! DOM errors

use crate::custom_elements::{CustomElementError, ReactionError};
use crate::NodeId;

/// Errors raised by tree, attribute and lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),

    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("cannot insert {child:?} into {parent:?}: hierarchy request error")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("element {0:?} already hosts a shadow root")]
    ShadowRootExists(NodeId),

    #[error(transparent)]
    CustomElement(#[from] CustomElementError),

    #[error("<{element}> constructor failed: {source}")]
    Construction {
        element: String,
        source: ReactionError,
    },

    #[error("<{element}> reaction to `{attribute}` failed: {source}")]
    Reaction {
        element: String,
        attribute: String,
        source: ReactionError,
    },
}
