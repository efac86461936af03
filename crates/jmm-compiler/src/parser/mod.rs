//! Recursive-descent parser for J--.
//!
//! The parser works over the token vector produced by the lexer with one
//! token of committed lookahead (two where declarations need it). Unlike the
//! analyzer, which accumulates every error it finds, parsing stops at the
//! first error: the driver reports a parse failure and exits.

mod grammar;


use crate::ast::Node;
use crate::lexer::{self, Token, TokenKind, token_text};

/// First syntax or lexical error in the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} near line {line}")]
pub struct ParseError {
    pub line: u32,
    pub message: String,
}

pub struct Parser<'src> {
    source: &'src str,
    file_name: String,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, file_name: &str) -> Result<Self, ParseError> {
        let tokens = lexer::lex(source).map_err(|err| ParseError {
            line: err.line,
            message: format!("unrecognized character sequence '{}'", err.text),
        })?;
        Ok(Self {
            source,
            file_name: file_name.to_string(),
            tokens,
            pos: 0,
        })
    }

    /// Parses a whole program. The returned tree still has its right-recursive
    /// child lists back-to-front; run [`crate::ast::normalize`] before using it.
    pub fn parse(mut self) -> Result<Node, ParseError> {
        self.parse_program()
    }

    pub(super) fn current(&self) -> TokenKind {
        self.nth(0)
    }

    /// Returns `Eof` past the end of input (acts as sentinel).
    pub(super) fn nth(&self, lookahead: usize) -> TokenKind {
        self.tokens
            .get(self.pos + lookahead)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(super) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(super) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Line of the current token; past the end, the line of the last token.
    pub(super) fn current_line(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    /// Text of the current token. Empty at end of input.
    pub(super) fn current_text(&self) -> &'src str {
        self.tokens
            .get(self.pos)
            .map_or("", |t| token_text(self.source, t))
    }

    pub(super) fn bump(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    pub(super) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.current_line(),
            message: message.into(),
        }
    }

    pub(super) fn file_name(&self) -> &str {
        &self.file_name
    }
}
