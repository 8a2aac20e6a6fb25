//! Handler-script Lexer
//!
//! Tokenizes handler source. Template literals, regular expressions and
//! bitwise operators are reported as error tokens.

use super::token::{Token, TokenKind, Span, keyword_from_str};
use std::str::Chars;
use std::iter::Peekable;

pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<Chars<'src>>,
    pos: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            pos: 0,
        }
    }

    /// Get current position
    pub fn position(&self) -> u32 {
        self.pos
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Peek at the character after next
    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.pos as usize..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8() as u32;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    self.advance(); // /
                    self.advance(); // *
                    while self.peek().is_some() {
                        if self.peek() == Some('*') && self.peek_next() == Some('/') {
                            self.advance(); // *
                            self.advance(); // /
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start = self.pos;
        let Some(c) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::new(start, start));
        };

        let kind = match c {
            'a'..='z' | 'A'..='Z' | '_' | '$' => self.scan_identifier(start),
            '0'..='9' => self.scan_number(start),
            '"' | '\'' => self.scan_string(c),
            '`' => TokenKind::Error("template literals are not supported".into()),

            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,

            '.' => {
                if matches!(self.peek(), Some('0'..='9')) {
                    self.scan_number(start)
                } else {
                    TokenKind::Dot
                }
            }

            '?' => {
                if self.eat('?') {
                    if self.eat('=') { TokenKind::Assign("??=") } else { TokenKind::QuestionQuestion }
                } else if self.peek() == Some('.') && !matches!(self.peek_next(), Some('0'..='9')) {
                    self.advance();
                    TokenKind::QuestionDot
                } else {
                    TokenKind::Question
                }
            }

            '+' => {
                if self.eat('+') {
                    TokenKind::PlusPlus
                } else if self.eat('=') {
                    TokenKind::Assign("+=")
                } else {
                    TokenKind::Plus
                }
            }

            '-' => {
                if self.eat('-') {
                    TokenKind::MinusMinus
                } else if self.eat('=') {
                    TokenKind::Assign("-=")
                } else {
                    TokenKind::Minus
                }
            }

            '*' => {
                if self.eat('*') {
                    TokenKind::Error("'**' is not supported".into())
                } else if self.eat('=') {
                    TokenKind::Assign("*=")
                } else {
                    TokenKind::Star
                }
            }

            '/' => if self.eat('=') { TokenKind::Assign("/=") } else { TokenKind::Slash },
            '%' => if self.eat('=') { TokenKind::Assign("%=") } else { TokenKind::Percent },

            '<' => {
                if self.peek() == Some('<') {
                    TokenKind::Error("bitwise operators are not supported".into())
                } else if self.eat('=') {
                    TokenKind::LessThanEq
                } else {
                    TokenKind::LessThan
                }
            }

            '>' => {
                if self.peek() == Some('>') {
                    TokenKind::Error("bitwise operators are not supported".into())
                } else if self.eat('=') {
                    TokenKind::GreaterThanEq
                } else {
                    TokenKind::GreaterThan
                }
            }

            '=' => {
                if self.eat('=') {
                    if self.eat('=') { TokenKind::EqEqEq } else { TokenKind::EqEq }
                } else if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Assign("=")
                }
            }

            '!' => {
                if self.eat('=') {
                    if self.eat('=') { TokenKind::NotEqEq } else { TokenKind::NotEq }
                } else {
                    TokenKind::Bang
                }
            }

            '&' => {
                if self.eat('&') {
                    if self.eat('=') { TokenKind::Assign("&&=") } else { TokenKind::AmpersandAmpersand }
                } else {
                    TokenKind::Error("bitwise operators are not supported".into())
                }
            }

            '|' => {
                if self.eat('|') {
                    if self.eat('=') { TokenKind::Assign("||=") } else { TokenKind::PipePipe }
                } else {
                    TokenKind::Error("bitwise operators are not supported".into())
                }
            }

            _ => TokenKind::Error(format!("Unexpected character: {}", c).into()),
        };

        Token::new(kind, Span::new(start, self.pos))
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self, start: u32) -> TokenKind {
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
            self.advance();
        }

        let text = &self.source[start as usize..self.pos as usize];
        keyword_from_str(text).unwrap_or_else(|| TokenKind::Identifier(text.into()))
    }

    /// Scan a decimal number literal (hex `0x` included)
    fn scan_number(&mut self, start: u32) -> TokenKind {
        let first = self.source.as_bytes().get(start as usize).copied();
        if first == Some(b'0') && matches!(self.peek(), Some('x' | 'X')) {
            self.advance(); // x
            while matches!(self.peek(), Some('0'..='9' | 'a'..='f' | 'A'..='F' | '_')) {
                self.advance();
            }
            let digits = self.source[(start + 2) as usize..self.pos as usize].replace('_', "");
            return match u64::from_str_radix(&digits, 16) {
                Ok(n) => TokenKind::Number(n as f64),
                Err(_) => TokenKind::Error("Invalid hex number".into()),
            };
        }

        while matches!(self.peek(), Some('0'..='9' | '_')) {
            self.advance();
        }

        if self.peek() == Some('.') && matches!(self.peek_next(), Some('0'..='9')) {
            self.advance(); // .
        }
        while matches!(self.peek(), Some('0'..='9' | '_')) {
            self.advance();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        let text = &self.source[start as usize..self.pos as usize];
        match text.replace('_', "").parse::<f64>() {
            Ok(n) => TokenKind::Number(n),
            Err(_) => TokenKind::Error(format!("Invalid number: {}", text).into()),
        }
    }

    /// Scan a string literal
    fn scan_string(&mut self, quote: char) -> TokenKind {
        let mut value = String::new();

        while let Some(c) = self.advance() {
            match c {
                c if c == quote => return TokenKind::String(value.into()),
                '\n' => break,
                '\\' => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some('0') => value.push('\0'),
                    Some('u') => match self.scan_hex_escape(4).and_then(char::from_u32) {
                        Some(c) => value.push(c),
                        None => return TokenKind::Error("Invalid unicode escape".into()),
                    },
                    Some('x') => match self.scan_hex_escape(2).and_then(char::from_u32) {
                        Some(c) => value.push(c),
                        None => return TokenKind::Error("Invalid hex escape".into()),
                    },
                    Some(c) => value.push(c),
                    None => break,
                },
                c => value.push(c),
            }
        }

        TokenKind::Error("Unterminated string".into())
    }

    fn scan_hex_escape(&mut self, count: usize) -> Option<u32> {
        let start = self.pos;
        for _ in 0..count {
            if matches!(self.peek(), Some('0'..='9' | 'a'..='f' | 'A'..='F')) {
                self.advance();
            } else {
                return None;
            }
        }
        u32::from_str_radix(&self.source[start as usize..self.pos as usize], 16).ok()
    }
}
