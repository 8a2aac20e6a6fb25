//! Token Types
//!
//! Tokens of the handler-script language. Every JavaScript keyword is
//! recognized so unsupported statements fail with a precise message instead
//! of an identifier error.

/// Source span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Token with kind and span
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    String(Box<str>),
    Boolean(bool),
    Null,
    Undefined,

    Identifier(Box<str>),

    // Supported keywords
    If,
    Else,
    Return,
    This,
    Typeof,
    Void,

    /// Any other reserved word (`while`, `function`, `var`, ...)
    Reserved(&'static str),

    // Punctuators
    LBrace,      // {
    RBrace,      // }
    LParen,      // (
    RParen,      // )
    LBracket,    // [
    RBracket,    // ]
    Dot,         // .
    Semicolon,   // ;
    Comma,       // ,
    Colon,       // :
    Question,    // ?
    QuestionDot, // ?.
    QuestionQuestion, // ??
    Arrow,       // =>

    // Operators
    Plus,        // +
    Minus,       // -
    Star,        // *
    Slash,       // /
    Percent,     // %
    PlusPlus,    // ++
    MinusMinus,  // --
    LessThan,    // <
    LessThanEq,  // <=
    GreaterThan, // >
    GreaterThanEq, // >=
    EqEq,        // ==
    NotEq,       // !=
    EqEqEq,      // ===
    NotEqEq,     // !==
    AmpersandAmpersand, // &&
    PipePipe,    // ||
    Bang,        // !

    /// `=` and every compound assignment (`+=`, `&&=`, ...)
    Assign(&'static str),

    // Special
    Eof,
    Error(Box<str>),
}

impl TokenKind {
    /// Get binary operator precedence (higher = binds tighter); 0 when the
    /// token is not a binary operator
    pub fn precedence(&self) -> u8 {
        match self {
            TokenKind::QuestionQuestion => 3,
            TokenKind::PipePipe => 4,
            TokenKind::AmpersandAmpersand => 5,
            TokenKind::EqEq | TokenKind::NotEq | TokenKind::EqEqEq | TokenKind::NotEqEq => 9,
            TokenKind::LessThan | TokenKind::LessThanEq | TokenKind::GreaterThan |
            TokenKind::GreaterThanEq => 10,
            TokenKind::Plus | TokenKind::Minus => 12,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 13,
            _ => 0,
        }
    }

    /// Source text for diagnostics
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => n.to_string(),
            TokenKind::String(s) => format!("'{}'", s),
            TokenKind::Boolean(b) => b.to_string(),
            TokenKind::Null => "null".into(),
            TokenKind::Undefined => "undefined".into(),
            TokenKind::Identifier(name) => name.to_string(),
            TokenKind::Reserved(word) | TokenKind::Assign(word) => word.to_string(),
            TokenKind::Eof => "end of input".into(),
            TokenKind::Error(message) => message.to_string(),
            other => format!("{:?}", other),
        }
    }
}

/// Keywords lookup table
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    const RESERVED: &[&str] = &[
        "await", "break", "case", "catch", "class", "const", "continue",
        "debugger", "default", "delete", "do", "enum", "export", "extends",
        "finally", "for", "function", "import", "in", "instanceof", "let",
        "new", "super", "switch", "throw", "try", "var", "while", "with",
        "yield", "async",
    ];

    let kind = match s {
        "false" => TokenKind::Boolean(false),
        "true" => TokenKind::Boolean(true),
        "null" => TokenKind::Null,
        "undefined" => TokenKind::Undefined,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "return" => TokenKind::Return,
        "this" => TokenKind::This,
        "typeof" => TokenKind::Typeof,
        "void" => TokenKind::Void,
        _ => return RESERVED.iter().find(|&&w| w == s).map(|&w| TokenKind::Reserved(w)),
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let a = Span::new(0, 5);
        let b = Span::new(3, 10);
        let merged = a.merge(b);
        assert_eq!(merged.start, 0);
        assert_eq!(merged.end, 10);
        assert_eq!(merged.len(), 10);
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_from_str("if"), Some(TokenKind::If));
        assert_eq!(keyword_from_str("true"), Some(TokenKind::Boolean(true)));
        assert_eq!(keyword_from_str("while"), Some(TokenKind::Reserved("while")));
        assert_eq!(keyword_from_str("event"), None);
    }

    #[test]
    fn test_precedence() {
        assert!(TokenKind::Star.precedence() > TokenKind::Plus.precedence());
        assert!(TokenKind::Plus.precedence() > TokenKind::PipePipe.precedence());
        assert_eq!(TokenKind::Dot.precedence(), 0);
    }
}
