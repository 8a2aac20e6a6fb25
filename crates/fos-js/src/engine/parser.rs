//! Handler-script Parser
//!
//! Parses tokens into an AST and enforces the sandbox at compile time: the
//! only free names are `event` and `console` (plus `this`), every call must
//! target a member (`event.preventDefault()`), and assignments, loops and
//! function literals are rejected.

use super::ast::{
    Ast, AstNode, AstNodeKind, BinaryOp, LiteralValue, LogicalOp, MemberProperty, NodeId, UnaryOp,
};
use super::lexer::Lexer;
use super::token::{Span, Token, TokenKind};
use crate::error::ScriptError;

/// Free identifiers a handler may reference
pub const ALLOWED_GLOBALS: &[&str] = &["event", "console"];

/// Deepest statement/expression nesting accepted before compilation fails
pub const MAX_NESTING: usize = 128;

pub struct Parser<'src> {
    source: &'src str,
    lexer: Lexer<'src>,
    current: Token,
    previous: Token,
    ast: Ast,
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            source,
            lexer,
            current: current.clone(),
            previous: current,
            ast: Ast::new(),
            depth: 0,
        }
    }

    /// Run a recursive production one nesting level deeper
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, ScriptError>) -> Result<T, ScriptError> {
        if self.depth >= MAX_NESTING {
            return Err(ScriptError::syntax("nesting too deep", self.current.span));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn consume(&mut self, kind: TokenKind) -> Result<(), ScriptError> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> ScriptError {
        if let TokenKind::Error(message) = &self.current.kind {
            return ScriptError::syntax(message.to_string(), self.current.span);
        }
        ScriptError::syntax(
            format!("Unexpected token {}", self.current.kind.describe()),
            self.current.span,
        )
    }

    fn node(&mut self, kind: AstNodeKind, start: Span) -> NodeId {
        let span = start.merge(self.previous.span);
        self.ast.add_node(AstNode::new(kind, span))
    }

    fn span_of(&self, id: NodeId) -> Span {
        self.ast.get(id).map(|n| n.span).unwrap_or_default()
    }

    /// Parse a complete handler body
    pub fn parse(mut self) -> Result<Ast, ScriptError> {
        let mut body = Vec::new();

        while !matches!(self.current.kind, TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }

        let span = Span::new(0, self.source.len() as u32);
        let root = self.ast.add_node(AstNode::new(AstNodeKind::Program { body }, span));
        self.ast.set_root(root);

        Ok(self.ast)
    }

    fn parse_statement(&mut self) -> Result<NodeId, ScriptError> {
        self.nested(Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> Result<NodeId, ScriptError> {
        match &self.current.kind {
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::LBrace => self.parse_block_statement(),
            TokenKind::Semicolon => {
                let start = self.current.span;
                self.advance();
                Ok(self.node(AstNodeKind::EmptyStatement, start))
            }
            TokenKind::Reserved(word) => Err(ScriptError::Forbidden {
                name: word.to_string(),
                span: self.current.span,
            }),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_if_statement(&mut self) -> Result<NodeId, ScriptError> {
        let start = self.current.span;
        self.advance(); // if
        self.consume(TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;
        let consequent = self.parse_statement()?;
        let alternate = if self.check(&TokenKind::Else) {
            self.advance();
            Some(self.parse_statement()?)
        } else {
            None
        };

        Ok(self.node(AstNodeKind::IfStatement { test, consequent, alternate }, start))
    }

    fn parse_return_statement(&mut self) -> Result<NodeId, ScriptError> {
        let start = self.current.span;
        self.advance(); // return

        let argument = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;

        Ok(self.node(AstNodeKind::ReturnStatement { argument }, start))
    }

    fn parse_block_statement(&mut self) -> Result<NodeId, ScriptError> {
        let start = self.current.span;
        self.advance(); // {

        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                return Err(self.unexpected());
            }
            body.push(self.parse_statement()?);
        }
        self.consume(TokenKind::RBrace)?;

        Ok(self.node(AstNodeKind::BlockStatement { body }, start))
    }

    fn parse_expression_statement(&mut self) -> Result<NodeId, ScriptError> {
        let start = self.current.span;
        let expr = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(self.node(AstNodeKind::ExpressionStatement { expr }, start))
    }

    /// `;`, or an automatically inserted one before `}`, end of input or a
    /// line break
    fn at_statement_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof)
            || self.newline_before_current()
    }

    fn consume_semicolon(&mut self) -> Result<(), ScriptError> {
        if self.check(&TokenKind::Semicolon) {
            self.advance();
            return Ok(());
        }
        if self.at_statement_end() {
            return Ok(());
        }
        Err(self.unexpected())
    }

    fn newline_before_current(&self) -> bool {
        let from = self.previous.span.end as usize;
        let to = self.current.span.start as usize;
        from < to && self.source.get(from..to).is_some_and(|gap| gap.contains('\n'))
    }

    pub fn parse_expression(&mut self) -> Result<NodeId, ScriptError> {
        let expr = self.parse_conditional()?;
        self.reject_assignment()?;
        Ok(expr)
    }

    fn reject_assignment(&self) -> Result<(), ScriptError> {
        match &self.current.kind {
            TokenKind::Assign(op) => Err(ScriptError::syntax(
                format!("assignment ('{}') is not allowed in handlers", op),
                self.current.span,
            )),
            TokenKind::PlusPlus | TokenKind::MinusMinus => Err(ScriptError::syntax(
                "increment and decrement are not allowed in handlers",
                self.current.span,
            )),
            TokenKind::Arrow => Err(ScriptError::syntax(
                "function literals are not allowed in handlers",
                self.current.span,
            )),
            _ => Ok(()),
        }
    }

    fn parse_conditional(&mut self) -> Result<NodeId, ScriptError> {
        self.nested(Self::parse_conditional_inner)
    }

    fn parse_conditional_inner(&mut self) -> Result<NodeId, ScriptError> {
        let start = self.current.span;
        let test = self.parse_binary(0)?;
        if !self.check(&TokenKind::Question) {
            return Ok(test);
        }
        self.advance(); // ?
        let consequent = self.parse_conditional()?;
        self.consume(TokenKind::Colon)?;
        let alternate = self.parse_conditional()?;

        Ok(self.node(AstNodeKind::ConditionalExpression { test, consequent, alternate }, start))
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<NodeId, ScriptError> {
        let start = self.current.span;
        let mut left = self.parse_unary()?;

        loop {
            let prec = self.current.kind.precedence();
            if prec == 0 || prec <= min_prec {
                break;
            }
            let op = self.current.kind.clone();
            self.advance();
            let right = self.parse_binary(prec)?;

            let kind = match op {
                TokenKind::AmpersandAmpersand => AstNodeKind::LogicalExpression { operator: LogicalOp::And, left, right },
                TokenKind::PipePipe => AstNodeKind::LogicalExpression { operator: LogicalOp::Or, left, right },
                TokenKind::QuestionQuestion => {
                    AstNodeKind::LogicalExpression { operator: LogicalOp::NullishCoalescing, left, right }
                }
                other => {
                    let operator = match other {
                        TokenKind::Plus => BinaryOp::Add,
                        TokenKind::Minus => BinaryOp::Sub,
                        TokenKind::Star => BinaryOp::Mul,
                        TokenKind::Slash => BinaryOp::Div,
                        TokenKind::Percent => BinaryOp::Mod,
                        TokenKind::LessThan => BinaryOp::LessThan,
                        TokenKind::LessThanEq => BinaryOp::LessThanEq,
                        TokenKind::GreaterThan => BinaryOp::GreaterThan,
                        TokenKind::GreaterThanEq => BinaryOp::GreaterThanEq,
                        TokenKind::EqEq => BinaryOp::Equal,
                        TokenKind::NotEq => BinaryOp::NotEqual,
                        TokenKind::EqEqEq => BinaryOp::StrictEqual,
                        _ => BinaryOp::StrictNotEqual,
                    };
                    AstNodeKind::BinaryExpression { operator, left, right }
                }
            };
            left = self.node(kind, start);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<NodeId, ScriptError> {
        let start = self.current.span;
        let operator = match self.current.kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Typeof => UnaryOp::Typeof,
            TokenKind::Void => UnaryOp::Void,
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                self.reject_assignment()?;
                return Err(self.unexpected());
            }
            _ => return self.parse_call_member(),
        };
        self.advance();
        let argument = self.nested(Self::parse_unary)?;

        Ok(self.node(AstNodeKind::UnaryExpression { operator, argument }, start))
    }

    fn parse_call_member(&mut self) -> Result<NodeId, ScriptError> {
        let start = self.current.span;
        let mut expr = self.parse_primary()?;

        loop {
            match &self.current.kind {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.parse_property_name()?;
                    expr = self.node(
                        AstNodeKind::MemberExpression { object: expr, property: MemberProperty::Named(name), optional: false },
                        start,
                    );
                }
                TokenKind::QuestionDot => {
                    self.advance();
                    let property = if self.check(&TokenKind::LBracket) {
                        MemberProperty::Computed(self.parse_computed_property()?)
                    } else {
                        MemberProperty::Named(self.parse_property_name()?)
                    };
                    expr = self.node(AstNodeKind::MemberExpression { object: expr, property, optional: true }, start);
                }
                TokenKind::LBracket => {
                    let property = MemberProperty::Computed(self.parse_computed_property()?);
                    expr = self.node(AstNodeKind::MemberExpression { object: expr, property, optional: false }, start);
                }
                TokenKind::LParen => {
                    self.check_callee(expr)?;
                    let arguments = self.parse_arguments()?;
                    expr = self.node(AstNodeKind::CallExpression { callee: expr, arguments }, start);
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Calls must go through a member (`console.log(...)`)
    fn check_callee(&self, callee: NodeId) -> Result<(), ScriptError> {
        let Some(node) = self.ast.get(callee) else {
            return Err(self.unexpected());
        };
        match &node.kind {
            AstNodeKind::MemberExpression { .. } => Ok(()),
            AstNodeKind::Identifier { name } => Err(ScriptError::Forbidden {
                name: name.to_string(),
                span: node.span,
            }),
            _ => Err(ScriptError::syntax("only method calls are allowed in handlers", self.span_of(callee))),
        }
    }

    fn parse_property_name(&mut self) -> Result<Box<str>, ScriptError> {
        let name: Box<str> = match &self.current.kind {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Reserved(word) => (*word).into(),
            TokenKind::If => "if".into(),
            TokenKind::Else => "else".into(),
            TokenKind::Return => "return".into(),
            TokenKind::This => "this".into(),
            TokenKind::Typeof => "typeof".into(),
            TokenKind::Void => "void".into(),
            TokenKind::Null => "null".into(),
            TokenKind::Undefined => "undefined".into(),
            TokenKind::Boolean(b) => b.to_string().into(),
            _ => return Err(self.unexpected()),
        };
        self.advance();
        Ok(name)
    }

    fn parse_computed_property(&mut self) -> Result<NodeId, ScriptError> {
        self.consume(TokenKind::LBracket)?;
        let property = self.parse_expression()?;
        self.consume(TokenKind::RBracket)?;
        Ok(property)
    }

    fn parse_arguments(&mut self) -> Result<Vec<NodeId>, ScriptError> {
        self.consume(TokenKind::LParen)?;
        let mut arguments = Vec::new();
        while !self.check(&TokenKind::RParen) {
            arguments.push(self.parse_expression()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.consume(TokenKind::RParen)?;
        Ok(arguments)
    }

    fn parse_primary(&mut self) -> Result<NodeId, ScriptError> {
        let start = self.current.span;
        let value = match &self.current.kind {
            TokenKind::Number(n) => LiteralValue::Number(*n),
            TokenKind::String(s) => LiteralValue::String(s.clone()),
            TokenKind::Boolean(b) => LiteralValue::Bool(*b),
            TokenKind::Null => LiteralValue::Null,
            TokenKind::Undefined => LiteralValue::Undefined,
            TokenKind::This => {
                self.advance();
                return Ok(self.node(AstNodeKind::ThisExpression, start));
            }
            TokenKind::Identifier(name) => {
                if !ALLOWED_GLOBALS.contains(&&**name) {
                    return Err(ScriptError::Forbidden { name: name.to_string(), span: start });
                }
                let name = name.clone();
                self.advance();
                return Ok(self.node(AstNodeKind::Identifier { name }, start));
            }
            TokenKind::Reserved(word) => {
                return Err(ScriptError::Forbidden { name: word.to_string(), span: start });
            }
            TokenKind::LParen => {
                self.advance();
                if self.check(&TokenKind::RParen) {
                    return Err(ScriptError::syntax("function literals are not allowed in handlers", start));
                }
                let expr = self.parse_expression()?;
                self.consume(TokenKind::RParen)?;
                self.reject_assignment()?;
                return Ok(expr);
            }
            TokenKind::LBracket | TokenKind::LBrace => {
                return Err(ScriptError::syntax("array and object literals are not supported", start));
            }
            _ => return Err(self.unexpected()),
        };
        self.advance();

        Ok(self.node(AstNodeKind::Literal { value }, start))
    }
}
