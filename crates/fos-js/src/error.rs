//! Script errors

use crate::engine::token::Span;

/// Compile-time and runtime failures of a handler script
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("Syntax error at {}..{}: {message}", .span.start, .span.end)]
    Syntax { message: String, span: Span },

    #[error("'{name}' is not available in event handlers (at {}..{})", .span.start, .span.end)]
    Forbidden { name: String, span: Span },

    #[error("TypeError: {0}")]
    TypeError(String),
}

impl ScriptError {
    pub(crate) fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
        }
    }

    /// Source span for compile errors
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Syntax { span, .. } | Self::Forbidden { span, .. } => Some(*span),
            Self::TypeError(_) => None,
        }
    }
}
