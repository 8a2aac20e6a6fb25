//! Abstract Syntax Tree
//!
//! Arena-allocated nodes of a parsed handler.

use super::token::Span;

/// AST Node ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Abstract Syntax Tree container
#[derive(Debug, Default, Clone)]
pub struct Ast {
    nodes: Vec<AstNode>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self { Self::default() }

    pub fn add_node(&mut self, node: AstNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&AstNode> { self.nodes.get(id.0 as usize) }
    pub fn set_root(&mut self, id: NodeId) { self.root = Some(id); }
    pub fn root(&self) -> Option<NodeId> { self.root }
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
}

/// AST Node
#[derive(Debug, Clone)]
pub struct AstNode {
    pub kind: AstNodeKind,
    pub span: Span,
}

impl AstNode {
    pub fn new(kind: AstNodeKind, span: Span) -> Self { Self { kind, span } }
}

/// AST Node kinds
#[derive(Debug, Clone)]
pub enum AstNodeKind {
    // Statements
    Program { body: Vec<NodeId> },
    ExpressionStatement { expr: NodeId },
    BlockStatement { body: Vec<NodeId> },
    EmptyStatement,
    ReturnStatement { argument: Option<NodeId> },
    IfStatement { test: NodeId, consequent: NodeId, alternate: Option<NodeId> },

    // Expressions
    Identifier { name: Box<str> },
    Literal { value: LiteralValue },
    ThisExpression,
    UnaryExpression { operator: UnaryOp, argument: NodeId },
    BinaryExpression { operator: BinaryOp, left: NodeId, right: NodeId },
    LogicalExpression { operator: LogicalOp, left: NodeId, right: NodeId },
    ConditionalExpression { test: NodeId, consequent: NodeId, alternate: NodeId },
    /// Callee is always a member expression
    CallExpression { callee: NodeId, arguments: Vec<NodeId> },
    MemberExpression { object: NodeId, property: MemberProperty, optional: bool },
}

/// `.name` or `[expr]`
#[derive(Debug, Clone)]
pub enum MemberProperty {
    Named(Box<str>),
    Computed(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue { Undefined, Null, Bool(bool), Number(f64), String(Box<str>) }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp { Minus, Plus, Not, Typeof, Void }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add, Sub, Mul, Div, Mod, LessThan, LessThanEq, GreaterThan, GreaterThanEq,
    Equal, NotEqual, StrictEqual, StrictNotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp { And, Or, NullishCoalescing }
