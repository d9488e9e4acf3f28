//! Go source lexer, arena syntax tree and recursive-descent parser.
//!
//! - The lexer uses Logos and implements Go's automatic semicolon insertion.
//! - The parser follows `go/parser`: same grammar ambiguities, same error
//!   messages, and it stops at the first syntax error.
//! - [`walk`] provides a `ControlFlow`-based visitor over the tree.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod lines;
pub mod parser;
pub mod walk;

pub use ast::{AstArena, Interner, SourceFile, Span, Symbol};
pub use error::{Diag, DiagKind, LexError, LexErrorKind, ParseFailure, SyntaxError};
pub use lexer::{Lexer, Tok};
pub use lines::{LineIndex, LineRange, Position};
pub use parser::MAX_DEPTH;

/// A successfully parsed file together with the text it was parsed from.
#[derive(Debug)]
pub struct ParsedFile<'src> {
    pub src: &'src str,
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
    pub lines: LineIndex,
}

impl<'src> ParsedFile<'src> {
    #[inline]
    pub fn name(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// Source text covered by `span`.
    #[inline]
    pub fn text(&self, span: Span) -> &'src str {
        self.src.get(span.range()).unwrap_or_default()
    }

    #[inline]
    pub fn lines_of(&self, span: Span) -> LineRange {
        self.lines.lines_of(span)
    }
}

/// Parses a complete Go source file.
///
/// Any lexical error fails the parse, even when the token stream happens to
/// form a valid file.
pub fn parse_source(src: &str) -> Result<ParsedFile<'_>, ParseFailure> {
    let (result, lex_errors) = parser::parse(src);
    let lines = LineIndex::new(src);

    let mut diags: Vec<Diag> = lex_errors.iter().map(|e| e.diag(&lines)).collect();
    match result {
        Ok(out) if diags.is_empty() => Ok(ParsedFile {
            src,
            arena: out.arena,
            interner: out.interner,
            file: out.file,
            lines,
        }),
        Ok(_) => Err(ParseFailure::from_diags(diags)),
        Err(err) => {
            diags.push(err.diag(&lines));
            Err(ParseFailure::from_diags(diags))
        }
    }
}

/// Like [`parse_source`], for input that may not be valid UTF-8.
pub fn parse_bytes(src: &[u8]) -> Result<ParsedFile<'_>, ParseFailure> {
    match std::str::from_utf8(src) {
        Ok(text) => parse_source(text),
        Err(err) => {
            let lines = LineIndex::from_bytes(src);
            let at = err.valid_up_to();
            let span = Span::new(at, at + err.error_len().unwrap_or(1));
            let lex = LexError {
                kind: LexErrorKind::IllegalUtf8,
                span,
            };
            Err(ParseFailure::from_diags(vec![lex.diag(&lines)]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parsed_file_resolves_names_and_text() {
        let parsed = parse_source("package shapes\n\ntype Point struct{ X, Y int }\n").unwrap();
        assert_eq!(parsed.name(parsed.file.name.sym), "shapes");
        assert_eq!(parsed.text(parsed.file.name.pos), "shapes");
        assert_eq!(parsed.lines_of(parsed.file.name.pos).start, 1);
    }

    #[test]
    fn lexical_errors_fail_the_parse() {
        let err = parse_source("package p\nvar s = \"open\n").unwrap_err();
        assert_eq!(err.first().map(|d| d.kind), Some(DiagKind::Lex));
        assert_eq!(err.first().map(|d| d.pos.line), Some(2));
    }

    #[test]
    fn syntax_error_carries_position() {
        let err = parse_source("package p\n\ntype T struct {\n\tA int,\n}\n").unwrap_err();
        assert_eq!(err.to_string(), "4:7: expected ';', found ','");
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let err = parse_bytes(b"package p\n// \xff\n").unwrap_err();
        let first = err.first().unwrap();
        assert_eq!(first.message, "illegal UTF-8 encoding");
        assert_eq!(first.pos, Position { line: 2, column: 4 });
    }
}
