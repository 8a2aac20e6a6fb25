//! Handler Script Engine
//!
//! A tree-walking interpreter for the expression subset used by inline
//! event handlers.
//!
//! Components:
//! - Lexer: Tokenizes handler source
//! - Parser: Builds the AST and enforces the sandbox rules
//! - Interpreter: Evaluates the AST against one event dispatch

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod value;
pub(crate) mod interpreter;

pub use token::{Token, TokenKind, Span};
pub use lexer::Lexer;
pub use ast::{Ast, AstNode, AstNodeKind};
pub use parser::Parser;
pub use value::JsValue;
