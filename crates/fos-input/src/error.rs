//! Input errors

use fos_dom::{DomError, NodeId};
use fos_js::ScriptError;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// `onchange` source failed to compile
    #[error("invalid onchange handler: {0}")]
    Handler(#[from] ScriptError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("invalid theme: {0}")]
    Theme(#[from] serde_json::Error),

    #[error("{0:?} is not a <pj1-input>")]
    NotAnInput(NodeId),
}
