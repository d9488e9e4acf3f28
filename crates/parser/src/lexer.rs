use crate::ast::Span;
use crate::error::{LexError, LexErrorKind};
use logos::{Lexer as LogosLexer, Logos, Skip};
use memchr::memchr;
use std::fmt;

// =============================================================================
// 0. Shared helpers
// =============================================================================

#[inline(always)]
const fn is_dec_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline(always)]
const fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline(always)]
const fn lower_ascii(b: u8) -> u8 {
    b.to_ascii_lowercase()
}

#[inline(always)]
const fn is_valid_unicode_scalar(x: u32) -> bool {
    x <= 0x10_FFFF && !(x >= 0xD800 && x <= 0xDFFF)
}

// =============================================================================
// 1. Comments
// =============================================================================

fn lex_line_comment(lex: &mut LogosLexer<'_, RawTok>) -> Skip {
    let rem = lex.remainder().as_bytes();
    lex.bump(memchr(b'\n', rem).unwrap_or(rem.len()));
    Skip
}

fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let mut from = 0;

    while let Some(star) = memchr(b'*', &rem[from..]) {
        let at = from + star;
        if rem.get(at + 1) == Some(&b'/') {
            lex.bump(at + 2);
            return Ok(());
        }
        from = at + 1;
    }

    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

// =============================================================================
// 2. String and rune literals
// =============================================================================

/// Validates one escape sequence; `rest` starts right after the backslash.
/// Returns the number of bytes the escape occupies after the backslash.
fn scan_escape(rest: &[u8], quote: u8) -> Result<usize, LexErrorKind> {
    let hex = |n: usize| -> Result<u32, LexErrorKind> {
        let digits = rest.get(1..=n).ok_or(LexErrorKind::InvalidEscape)?;
        digits.iter().try_fold(0u32, |acc, &b| {
            if is_hex_digit(b) {
                Ok(acc << 4 | (b as char).to_digit(16).unwrap_or(0))
            } else {
                Err(LexErrorKind::InvalidEscape)
            }
        })
    };

    match rest.first().copied() {
        Some(b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\') => Ok(1),
        Some(c) if c == quote => Ok(1),
        Some(b'0'..=b'7') => {
            let digits = rest.get(..3).ok_or(LexErrorKind::InvalidEscape)?;
            let value = digits.iter().try_fold(0u32, |acc, &b| match b {
                b'0'..=b'7' => Ok(acc * 8 + u32::from(b - b'0')),
                _ => Err(LexErrorKind::InvalidEscape),
            })?;
            if value > 255 {
                return Err(LexErrorKind::InvalidEscape);
            }
            Ok(3)
        }
        Some(b'x') => hex(2).map(|_| 3),
        Some(b'u') => match hex(4)? {
            v if is_valid_unicode_scalar(v) => Ok(5),
            _ => Err(LexErrorKind::InvalidEscape),
        },
        Some(b'U') => match hex(8)? {
            v if is_valid_unicode_scalar(v) => Ok(9),
            _ => Err(LexErrorKind::InvalidEscape),
        },
        _ => Err(LexErrorKind::InvalidEscape),
    }
}

fn lex_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let mut bad_escape = false;
    let mut i = 0;

    loop {
        match rem.get(i) {
            None | Some(b'\n') => {
                lex.bump(i);
                return Err(LexErrorKind::UnterminatedString);
            }
            Some(b'"') => {
                lex.bump(i + 1);
                return if bad_escape {
                    Err(LexErrorKind::InvalidEscape)
                } else {
                    Ok(())
                };
            }
            Some(b'\\') => match scan_escape(&rem[i + 1..], b'"') {
                Ok(n) => i += 1 + n,
                Err(_) => {
                    bad_escape = true;
                    i += 1;
                }
            },
            Some(_) => i += 1,
        }
    }
}

fn lex_raw_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    match memchr(b'`', rem) {
        Some(close) => {
            lex.bump(close + 1);
            Ok(())
        }
        None => {
            lex.bump(rem.len());
            Err(LexErrorKind::UnterminatedRawString)
        }
    }
}

fn lex_rune(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder();
    let bytes = rem.as_bytes();
    let mut chars = 0usize;
    let mut bad_escape = false;
    let mut i = 0;

    loop {
        match bytes.get(i) {
            None | Some(b'\n') => {
                lex.bump(i);
                return Err(LexErrorKind::UnterminatedRune);
            }
            Some(b'\'') => {
                lex.bump(i + 1);
                return match (bad_escape, chars) {
                    (true, _) => Err(LexErrorKind::InvalidEscape),
                    (false, 1) => Ok(()),
                    (false, _) => Err(LexErrorKind::InvalidRune),
                };
            }
            Some(b'\\') => {
                chars += 1;
                match scan_escape(&bytes[i + 1..], b'\'') {
                    Ok(n) => i += 1 + n,
                    Err(_) => {
                        bad_escape = true;
                        i += 1;
                    }
                }
            }
            Some(_) => {
                chars += 1;
                i += rem[i..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
}

// =============================================================================
// 3. Number literals (go/scanner rules)
// =============================================================================

/// Classification of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumKind {
    Int,
    Float,
    Imag,
}

mod num {
    use super::{is_dec_digit, is_hex_digit, lower_ascii, NumKind};
    use crate::error::LexErrorKind;

    const DIGIT: u8 = 1;
    const SEP: u8 = 2;

    struct Scan<'a> {
        src: &'a [u8],
        i: usize,
        invalid_digit: Option<usize>,
        failed: bool,
    }

    impl Scan<'_> {
        #[inline]
        fn ch(&self) -> u8 {
            self.src.get(self.i).copied().unwrap_or(0)
        }

        fn digits(&mut self, base: u32) -> u8 {
            let mut digsep = 0;
            loop {
                let c = self.ch();
                let ok = if base <= 10 {
                    is_dec_digit(c)
                } else {
                    is_hex_digit(c)
                };
                if c == b'_' {
                    digsep |= SEP;
                } else if ok {
                    if base <= 10
                        && u32::from(c - b'0') >= base
                        && self.invalid_digit.is_none()
                    {
                        self.invalid_digit = Some(self.i);
                    }
                    digsep |= DIGIT;
                } else {
                    return digsep;
                }
                self.i += 1;
            }
        }
    }

    /// Scans the longest number literal at the start of `src`.
    ///
    /// Returns the byte length consumed and the literal's kind, or the first
    /// error `go/scanner` would report for it.
    pub fn scan(src: &[u8]) -> (usize, Result<NumKind, LexErrorKind>) {
        let mut s = Scan {
            src,
            i: 0,
            invalid_digit: None,
            failed: false,
        };
        let mut kind = NumKind::Int;
        let mut base = 10;
        let mut prefix = 0u8;
        let mut digsep = 0u8;

        if s.ch() != b'.' {
            if s.ch() == b'0' {
                s.i += 1;
                match lower_ascii(s.ch()) {
                    b'x' => (base, prefix, s.i) = (16, b'x', s.i + 1),
                    b'o' => (base, prefix, s.i) = (8, b'o', s.i + 1),
                    b'b' => (base, prefix, s.i) = (2, b'b', s.i + 1),
                    _ => (base, prefix, digsep) = (8, b'0', DIGIT),
                }
            }
            digsep |= s.digits(base);
        }

        if s.ch() == b'.' {
            kind = NumKind::Float;
            s.failed |= matches!(prefix, b'o' | b'b');
            s.i += 1;
            digsep |= s.digits(base);
        }

        s.failed |= digsep & DIGIT == 0;

        let e = lower_ascii(s.ch());
        if e == b'e' || e == b'p' {
            s.failed |= e == b'e' && prefix != 0 && prefix != b'0';
            s.failed |= e == b'p' && prefix != b'x';
            s.i += 1;
            kind = NumKind::Float;
            if matches!(s.ch(), b'+' | b'-') {
                s.i += 1;
            }
            let ds = s.digits(10);
            digsep |= ds;
            s.failed |= ds & DIGIT == 0;
        } else if prefix == b'x' && kind == NumKind::Float {
            s.failed = true;
        }

        if s.ch() == b'i' {
            kind = NumKind::Imag;
            s.i += 1;
        }

        let lit = &src[..s.i];
        if kind == NumKind::Int && s.invalid_digit.is_some() {
            s.failed = true;
        }
        if digsep & SEP != 0 && invalid_separator(lit) {
            s.failed = true;
        }

        if s.failed {
            (s.i, Err(LexErrorKind::InvalidNumber))
        } else {
            (s.i, Ok(kind))
        }
    }

    /// `_` must separate successive digits; a base prefix counts as a digit.
    fn invalid_separator(lit: &[u8]) -> bool {
        let mut hex = false;
        let mut prev_class = b'.';
        let mut i = 0;

        if lit.len() >= 2 && lit[0] == b'0' {
            let x = lower_ascii(lit[1]);
            if matches!(x, b'x' | b'o' | b'b') {
                hex = x == b'x';
                prev_class = b'0';
                i = 2;
            }
        }

        for &c in &lit[i..] {
            let p = prev_class;
            prev_class = if c == b'_' {
                if p != b'0' {
                    return true;
                }
                b'_'
            } else if is_dec_digit(c) || (hex && is_hex_digit(c)) {
                b'0'
            } else {
                if p == b'_' {
                    return true;
                }
                b'.'
            };
        }

        prev_class == b'_'
    }
}

fn lex_number(lex: &mut LogosLexer<'_, RawTok>) -> Result<NumKind, LexErrorKind> {
    let start = lex.span().start;
    let (len, kind) = num::scan(&lex.source().as_bytes()[start..]);
    lex.bump(len.saturating_sub(lex.slice().len()));
    kind
}

// =============================================================================
// 4. Raw token definition
// =============================================================================

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[token("\n")] Newline,
    #[token("//", lex_line_comment)] _LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    // Literals
    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,
    #[regex("[0-9]", lex_number)]
    #[regex(r"\.[0-9]", lex_number)]
    Number(NumKind),
    #[token("`", lex_raw_string)] RawString,
    #[token("\"", lex_string)] String,
    #[token("'", lex_rune)] Rune,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,
}

impl RawTok {
    /// Tokens after which a newline becomes a semicolon.
    #[inline]
    const fn can_insert_semicolon(self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::Number(_)
                | Self::Rune
                | Self::String
                | Self::RawString
                | Self::KwBreak
                | Self::KwContinue
                | Self::KwFallthrough
                | Self::KwReturn
                | Self::Inc
                | Self::Dec
                | Self::RParen
                | Self::RBrack
                | Self::RBrace
        )
    }

    fn to_token(self, slice: &str) -> Tok<'_> {
        macro_rules! same {
            ($raw:expr, $text:expr; $($name:ident),* $(,)?) => {
                match $raw {
                    $(RawTok::$name => Tok::$name,)*
                    RawTok::Ident => Tok::Ident($text),
                    RawTok::Number(NumKind::Int) => Tok::IntLit($text),
                    RawTok::Number(NumKind::Float) => Tok::FloatLit($text),
                    RawTok::Number(NumKind::Imag) => Tok::ImagLit($text),
                    RawTok::Rune => Tok::RuneLit($text),
                    RawTok::String => Tok::StringLit($text),
                    RawTok::RawString => Tok::RawStringLit($text),
                    // Trivia and BOM never reach here.
                    RawTok::Bom | RawTok::Newline | RawTok::_LineComment | RawTok::BlockComment => {
                        Tok::Error
                    }
                }
            };
        }

        same! { self, slice;
            KwBreak, KwCase, KwChan, KwConst, KwContinue, KwDefault, KwDefer, KwElse,
            KwFallthrough, KwFor, KwFunc, KwGo, KwGoto, KwIf, KwImport, KwInterface,
            KwMap, KwPackage, KwRange, KwReturn, KwSelect, KwStruct, KwSwitch, KwType, KwVar,
            Ellipsis, ShlAssign, ShrAssign, AndNotAssign, AddAssign, SubAssign, MulAssign,
            DivAssign, ModAssign, AndAssign, OrAssign, XorAssign, Shl, Shr, AndNot, LAnd, LOr,
            EqEq, NotEq, Le, Ge, Inc, Dec, Define, Arrow, Assign, Plus, Minus, Star, Slash,
            Percent, Amp, Pipe, Caret, Tilde, Bang, Lt, Gt,
            LParen, RParen, LBrack, RBrack, LBrace, RBrace, Comma, Semi, Colon, Dot,
        }
    }
}

// =============================================================================
// 5. Public token definition (zero-copy)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    ImagLit(&'input str),
    RuneLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators / Delimiters
    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    Error,
    /// End of input; appended by the parser, never produced by [`Lexer`].
    Eof,
}

impl Tok<'_> {
    /// Literal tokens (identifiers included) carry their source text.
    #[inline]
    pub const fn literal(&self) -> Option<&str> {
        match *self {
            Tok::Ident(s)
            | Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::ImagLit(s)
            | Tok::RuneLit(s)
            | Tok::StringLit(s)
            | Tok::RawStringLit(s) => Some(s),
            _ => None,
        }
    }

    /// The Go spelling of a keyword, operator or delimiter.
    pub const fn spelling(&self) -> &'static str {
        match self {
            Tok::Ident(_) => "IDENT",
            Tok::IntLit(_) => "INT",
            Tok::FloatLit(_) => "FLOAT",
            Tok::ImagLit(_) => "IMAG",
            Tok::RuneLit(_) => "CHAR",
            Tok::StringLit(_) | Tok::RawStringLit(_) => "STRING",
            Tok::KwBreak => "break",
            Tok::KwCase => "case",
            Tok::KwChan => "chan",
            Tok::KwConst => "const",
            Tok::KwContinue => "continue",
            Tok::KwDefault => "default",
            Tok::KwDefer => "defer",
            Tok::KwElse => "else",
            Tok::KwFallthrough => "fallthrough",
            Tok::KwFor => "for",
            Tok::KwFunc => "func",
            Tok::KwGo => "go",
            Tok::KwGoto => "goto",
            Tok::KwIf => "if",
            Tok::KwImport => "import",
            Tok::KwInterface => "interface",
            Tok::KwMap => "map",
            Tok::KwPackage => "package",
            Tok::KwRange => "range",
            Tok::KwReturn => "return",
            Tok::KwSelect => "select",
            Tok::KwStruct => "struct",
            Tok::KwSwitch => "switch",
            Tok::KwType => "type",
            Tok::KwVar => "var",
            Tok::Ellipsis => "...",
            Tok::ShlAssign => "<<=",
            Tok::ShrAssign => ">>=",
            Tok::AndNotAssign => "&^=",
            Tok::AddAssign => "+=",
            Tok::SubAssign => "-=",
            Tok::MulAssign => "*=",
            Tok::DivAssign => "/=",
            Tok::ModAssign => "%=",
            Tok::AndAssign => "&=",
            Tok::OrAssign => "|=",
            Tok::XorAssign => "^=",
            Tok::Shl => "<<",
            Tok::Shr => ">>",
            Tok::AndNot => "&^",
            Tok::LAnd => "&&",
            Tok::LOr => "||",
            Tok::EqEq => "==",
            Tok::NotEq => "!=",
            Tok::Le => "<=",
            Tok::Ge => ">=",
            Tok::Inc => "++",
            Tok::Dec => "--",
            Tok::Define => ":=",
            Tok::Arrow => "<-",
            Tok::Assign => "=",
            Tok::Plus => "+",
            Tok::Minus => "-",
            Tok::Star => "*",
            Tok::Slash => "/",
            Tok::Percent => "%",
            Tok::Amp => "&",
            Tok::Pipe => "|",
            Tok::Caret => "^",
            Tok::Tilde => "~",
            Tok::Bang => "!",
            Tok::Lt => "<",
            Tok::Gt => ">",
            Tok::LParen => "(",
            Tok::RParen => ")",
            Tok::LBrack => "[",
            Tok::RBrack => "]",
            Tok::LBrace => "{",
            Tok::RBrace => "}",
            Tok::Comma => ",",
            Tok::Semi => ";",
            Tok::Colon => ":",
            Tok::Dot => ".",
            Tok::Error => "ILLEGAL",
            Tok::Eof => "EOF",
        }
    }
}

impl fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.literal() {
            Some(text) => f.write_str(text),
            None => f.write_str(self.spelling()),
        }
    }
}

// =============================================================================
// 6. Lexer wrapper: semicolon insertion + error collection
// =============================================================================

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<(usize, Tok<'src>, usize)>,
    errors: Vec<LexError>,
    insert_semi: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            errors: Vec::new(),
            insert_semi: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    /// Errors collected so far, in source order.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    fn error_token(&mut self, kind: LexErrorKind) -> (usize, Tok<'src>, usize) {
        let span = self.logos.span();
        self.errors.push(LexError {
            kind,
            span: Span::from_range(span.clone()),
        });
        self.insert_semi = false;
        (span.start, Tok::Error, span.end)
    }

    /// Injected semicolons are zero-width so the parser can tell them from `;`.
    #[inline]
    fn semi_at(&mut self, pos: usize) -> Option<(usize, Tok<'src>, usize)> {
        if std::mem::take(&mut self.insert_semi) {
            Some((pos, Tok::Semi, pos))
        } else {
            None
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = (usize, Tok<'src>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(tok) = self.pending.take() {
            return Some(tok);
        }

        loop {
            if self.eof_done {
                return None;
            }

            let raw = match self.logos.next() {
                None => {
                    self.eof_done = true;
                    return self.semi_at(self.src_len);
                }
                Some(Err(kind)) => return Some(self.error_token(kind)),
                Some(Ok(raw)) => raw,
            };

            let span = self.logos.span();
            match raw {
                RawTok::Bom if span.start == 0 => continue,
                RawTok::Bom => return Some(self.error_token(LexErrorKind::InvalidToken)),
                RawTok::Newline => match self.semi_at(span.start) {
                    Some(semi) => return Some(semi),
                    None => continue,
                },
                RawTok::BlockComment => {
                    let newline = memchr(b'\n', self.logos.slice().as_bytes());
                    match newline.and_then(|off| self.semi_at(span.start + off)) {
                        Some(semi) => return Some(semi),
                        None => continue,
                    }
                }
                _ => {
                    self.insert_semi = raw.can_insert_semicolon();
                    return Some((span.start, raw.to_token(self.logos.slice()), span.end));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<Tok<'_>> {
        Lexer::new(src).map(|(_, t, _)| t).collect()
    }

    #[test]
    fn semicolons_follow_line_enders() {
        assert_eq!(
            toks("x++\nreturn\n}\n"),
            vec![
                Tok::Ident("x"),
                Tok::Inc,
                Tok::Semi,
                Tok::KwReturn,
                Tok::Semi,
                Tok::RBrace,
                Tok::Semi,
            ]
        );
    }

    #[test]
    fn no_semicolon_after_operator_or_open_brace() {
        assert_eq!(
            toks("a +\nb {\n"),
            vec![Tok::Ident("a"), Tok::Plus, Tok::Ident("b"), Tok::LBrace]
        );
    }

    #[test]
    fn multi_line_block_comment_acts_as_newline() {
        let got: Vec<_> = Lexer::new("a /* x\n y */ b").collect();
        assert_eq!(got[1], (6, Tok::Semi, 6));
        assert_eq!(got[2].1, Tok::Ident("b"));
    }

    #[test]
    fn eof_inserts_zero_width_semicolon() {
        let got: Vec<_> = Lexer::new("type T int").collect();
        assert_eq!(got.last(), Some(&(10, Tok::Semi, 10)));
    }

    #[test]
    fn numbers_follow_go_scanner() {
        for (src, want) in [
            ("0", Ok(NumKind::Int)),
            ("0x_1F", Ok(NumKind::Int)),
            ("0b1010", Ok(NumKind::Int)),
            ("0o17", Ok(NumKind::Int)),
            ("017", Ok(NumKind::Int)),
            ("1_000", Ok(NumKind::Int)),
            ("1.5e-3", Ok(NumKind::Float)),
            (".25", Ok(NumKind::Float)),
            ("0x1p-2", Ok(NumKind::Float)),
            ("09.5", Ok(NumKind::Float)),
            ("3i", Ok(NumKind::Imag)),
            ("019", Err(LexErrorKind::InvalidNumber)),
            ("0x", Err(LexErrorKind::InvalidNumber)),
            ("1__0", Err(LexErrorKind::InvalidNumber)),
            ("1_", Err(LexErrorKind::InvalidNumber)),
            ("0x1.8", Err(LexErrorKind::InvalidNumber)),
            ("1e", Err(LexErrorKind::InvalidNumber)),
        ] {
            let (len, got) = num::scan(src.as_bytes());
            assert_eq!(len, src.len(), "{src}");
            assert_eq!(got, want, "{src}");
        }
    }

    #[test]
    fn escapes_are_validated() {
        assert_eq!(toks(r#""a\n\x41é\101""#), vec![Tok::StringLit(r#""a\n\x41é\101""#), Tok::Semi]);
        assert_eq!(toks(r"'\''"), vec![Tok::RuneLit(r"'\''"), Tok::Semi]);

        let mut lx = Lexer::new(r#""\q" '\400' 'ab' ''"#);
        let got: Vec<_> = lx.by_ref().map(|(_, t, _)| t).collect();
        assert!(got.iter().all(|t| *t == Tok::Error), "{got:?}");
        let kinds: Vec<_> = lx.take_errors().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LexErrorKind::InvalidEscape,
                LexErrorKind::InvalidEscape,
                LexErrorKind::InvalidRune,
                LexErrorKind::InvalidRune,
            ]
        );
    }

    #[test]
    fn unterminated_literals_are_reported() {
        for (src, kind) in [
            ("\"abc\n", LexErrorKind::UnterminatedString),
            ("`abc", LexErrorKind::UnterminatedRawString),
            ("'a", LexErrorKind::UnterminatedRune),
            ("/* abc", LexErrorKind::UnterminatedComment),
        ] {
            let mut lx = Lexer::new(src);
            lx.by_ref().for_each(drop);
            let errs = lx.take_errors();
            assert_eq!(errs.first().map(|e| e.kind), Some(kind), "{src:?}");
        }
    }

    #[test]
    fn bom_only_allowed_at_start() {
        assert_eq!(toks("\u{FEFF}package"), vec![Tok::KwPackage]);
        assert_eq!(toks("package\u{FEFF}"), vec![Tok::KwPackage, Tok::Error]);
    }

    #[test]
    fn display_uses_source_text_for_literals() {
        assert_eq!(Tok::Ident("Foo").to_string(), "Foo");
        assert_eq!(Tok::RBrace.to_string(), "}");
        assert_eq!(Tok::Eof.to_string(), "EOF");
    }
}
