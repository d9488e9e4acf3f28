use std::fmt;

use thiserror::Error;

use crate::ast::Span;
use crate::lines::{LineIndex, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

/// A single positioned diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub pos: Position,
    pub message: String,
}

impl Diag {
    pub fn new(kind: DiagKind, span: Span, lines: &LineIndex, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            pos: lines.position(span.start),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pos, self.message)
    }
}

/// Parsing failed; `diags` is sorted by position and holds at most one
/// diagnostic per line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseFailure {
    pub diags: Vec<Diag>,
}

impl ParseFailure {
    /// Sorts `diags` and keeps only the first diagnostic of each line, the way
    /// `go/scanner.ErrorList.RemoveMultiples` reports errors.
    pub fn from_diags(mut diags: Vec<Diag>) -> Self {
        diags.sort_by_key(|d| (d.pos.line, d.pos.column));
        diags.dedup_by_key(|d| d.pos.line);
        Self { diags }
    }

    /// The first (earliest) diagnostic.
    pub fn first(&self) -> Option<&Diag> {
        self.diags.first()
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diags.as_slice() {
            [] => f.write_str("no errors"),
            [only] => write!(f, "{only}"),
            [first, rest @ ..] => write!(f, "{first} (and {} more errors)", rest.len()),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("unknown escape sequence")]
    InvalidEscape,
    #[error("invalid rune literal")]
    InvalidRune,
    #[error("string literal not terminated")]
    UnterminatedString,
    #[error("raw string literal not terminated")]
    UnterminatedRawString,
    #[error("rune literal not terminated")]
    UnterminatedRune,
    #[error("comment not terminated")]
    UnterminatedComment,
    #[error("illegal UTF-8 encoding")]
    IllegalUtf8,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self, lines: &LineIndex) -> Diag {
        Diag::new(DiagKind::Lex, self.span, lines, self.kind.to_string())
    }
}

/// Syntax error raised by the parser; converted into a [`Diag`] once line
/// information is attached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SyntaxError {
    pub span: Span,
    pub message: String,
}

impl SyntaxError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }

    #[inline]
    pub fn diag(&self, lines: &LineIndex) -> Diag {
        Diag::new(DiagKind::Parse, self.span, lines, self.message.clone())
    }
}
