//! Recursive-descent parser producing the arena syntax tree.
//!
//! The grammar, its ambiguity rules and its error messages follow
//! `go/parser`. Parsing stops at the first syntax error.

use crate::ast::*;
use crate::error::{LexError, SyntaxError};
use crate::lexer::{Lexer, Tok};

pub type PResult<T> = Result<T, SyntaxError>;

/// Deepest nesting of expressions, types, statements or literal values.
/// Binary operators chained in one expression count too.
pub const MAX_DEPTH: u32 = 128;

type Spanned<'src> = (usize, Tok<'src>, usize);

/// Tree produced by a successful parse.
#[derive(Debug)]
pub struct Output {
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
}

/// Lexes and parses `src`. Lexer errors are returned in either case.
pub fn parse(src: &str) -> (PResult<Output>, Vec<LexError>) {
    let mut lexer = Lexer::new(src);
    let mut toks: Vec<Spanned<'_>> = lexer.by_ref().collect();
    let lex_errors = lexer.take_errors();
    toks.push((src.len(), Tok::Eof, src.len()));

    let mut p = Parser::new(toks);
    let result = match p.parse_file() {
        Ok(file) => Ok(Output {
            arena: p.arena,
            interner: p.interner,
            file,
        }),
        Err(err) => Err(err),
    };
    (result, lex_errors)
}

struct Parser<'src> {
    toks: Vec<Spanned<'src>>,
    pos: usize,
    prev_end: u32,
    /// < 0: in control clause, >= 0: in expression
    expr_lev: i32,
    depth: u32,
    arena: AstArena,
    interner: Interner,
}

/// One entry of a parameter list before names and types are distributed.
#[derive(Clone, Copy)]
struct Param {
    name: Option<IdentName>,
    typ: Option<TypeId>,
    dots: Option<Span>,
    start: u32,
}

/// Parameters sharing one type: `a, b int`.
struct ParamGroup {
    names: ListRef<IdentName>,
    dots: Option<Span>,
    typ: TypeId,
    span: Span,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum StmtMode {
    Basic,
    LabelOk,
    RangeOk,
}

enum SimpleOutcome {
    Simple(SimpleStmtId),
    Labeled(StmtId),
    Range {
        lhs: Vec<ExprId>,
        define: bool,
        expr: ExprId,
    },
}

impl<'src> Parser<'src> {
    fn new(toks: Vec<Spanned<'src>>) -> Self {
        Self {
            toks,
            pos: 0,
            prev_end: 0,
            expr_lev: 0,
            depth: 0,
            arena: AstArena::new(),
            interner: Interner::new(),
        }
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    fn tok(&self) -> Tok<'src> {
        self.toks[self.pos].1
    }

    #[inline]
    fn span(&self) -> Span {
        let (start, _, end) = self.toks[self.pos];
        Span::new(start, end)
    }

    #[inline]
    fn start(&self) -> u32 {
        self.span().start
    }

    /// Consumes the current token; the cursor never moves past `Eof`.
    fn bump(&mut self) -> Span {
        let span = self.span();
        if self.pos + 1 < self.toks.len() {
            self.pos += 1;
        }
        self.prev_end = span.end;
        span
    }

    #[inline]
    fn at(&self, t: Tok<'src>) -> bool {
        self.tok() == t
    }

    fn eat(&mut self, t: Tok<'src>) -> Option<Span> {
        if self.at(t) {
            Some(self.bump())
        } else {
            None
        }
    }

    fn expect(&mut self, t: Tok<'src>) -> PResult<Span> {
        if self.at(t) {
            Ok(self.bump())
        } else {
            Err(self.error_expected(&format!("'{}'", t.spelling())))
        }
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    fn finish(&self, start: u32) -> Span {
        Span {
            start,
            end: self.prev_end.max(start),
        }
    }

    /// Semicolon inserted by the lexer at a newline or at the end of input.
    fn at_auto_semi(&self) -> bool {
        let (start, tok, end) = self.toks[self.pos];
        tok == Tok::Semi && start == end
    }

    fn at_string(&self) -> bool {
        matches!(self.tok(), Tok::StringLit(_) | Tok::RawStringLit(_))
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(SyntaxError::new(self.span(), "exceeded max nesting depth"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // =========================================================================
    // Errors
    // =========================================================================

    fn found(&self) -> String {
        let tok = self.tok();
        if self.at_auto_semi() {
            return "newline".to_owned();
        }
        match tok.literal() {
            Some(lit) => lit.to_owned(),
            None => format!("'{}'", tok.spelling()),
        }
    }

    fn error_expected(&self, what: &str) -> SyntaxError {
        self.error_expected_at(self.span(), what)
    }

    /// `expected <what>`, naming the current token when the error is at it.
    fn error_expected_at(&self, at: Span, what: &str) -> SyntaxError {
        let mut msg = format!("expected {what}");
        if at.start == self.start() {
            msg.push_str(", found ");
            msg.push_str(&self.found());
        }
        SyntaxError::new(at, msg)
    }

    fn expect_semi(&mut self) -> PResult<()> {
        match self.tok() {
            Tok::RParen | Tok::RBrace => Ok(()),
            Tok::Semi => {
                self.bump();
                Ok(())
            }
            _ => Err(self.error_expected("';'")),
        }
    }

    /// True at a `,`; false at `follow`; an error otherwise.
    fn at_comma(&self, context: &str, follow: Tok<'src>) -> PResult<bool> {
        if self.at(Tok::Comma) {
            return Ok(true);
        }
        if self.at(follow) {
            return Ok(false);
        }
        let newline = if self.at_auto_semi() {
            " before newline"
        } else {
            ""
        };
        Err(SyntaxError::new(
            self.span(),
            format!("missing ','{newline} in {context}"),
        ))
    }

    fn expect_closing(&mut self, t: Tok<'src>, context: &str) -> PResult<Span> {
        if !self.at(t) && self.at_auto_semi() {
            return Err(SyntaxError::new(
                self.span(),
                format!("missing ',' before newline in {context}"),
            ));
        }
        self.expect(t)
    }

    // =========================================================================
    // Node helpers
    // =========================================================================

    #[inline]
    fn alloc_expr(&mut self, e: Expr, span: Span) -> ExprId {
        self.arena.exprs.alloc(e, span)
    }

    #[inline]
    fn alloc_type(&mut self, t: Type, span: Span) -> TypeId {
        self.arena.types.alloc(t, span)
    }

    #[inline]
    fn expr_span(&self, id: ExprId) -> Span {
        self.arena.exprs.span(id)
    }

    #[inline]
    fn type_span(&self, id: TypeId) -> Span {
        self.arena.types.span(id)
    }

    fn ident_expr(&mut self, name: IdentName) -> ExprId {
        self.alloc_expr(Expr::Ident(name.sym), name.pos)
    }

    fn named_type(&mut self, name: IdentName) -> TypeId {
        self.alloc_type(
            Type::Named {
                pkg: None,
                name,
                args: ListRef::EMPTY,
            },
            name.pos,
        )
    }

    /// Wraps a type as an operand, reusing an existing wrapper.
    fn type_expr(&mut self, t: TypeId) -> ExprId {
        match self.arena.types[t] {
            Type::Expr(e) => e,
            _ => {
                let span = self.type_span(t);
                self.alloc_expr(Expr::Type(t), span)
            }
        }
    }

    fn parse_ident(&mut self) -> PResult<IdentName> {
        match self.tok() {
            Tok::Ident(name) => {
                let sym = self.interner.intern(name);
                let pos = self.bump();
                Ok(IdentName { sym, pos })
            }
            _ => Err(self.error_expected("'IDENT'")),
        }
    }

    fn parse_ident_list(&mut self) -> PResult<ListRef<IdentName>> {
        let mut names = vec![self.parse_ident()?];
        while self.eat(Tok::Comma).is_some() {
            names.push(self.parse_ident()?);
        }
        Ok(self.arena.list_ident_names(names))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_file(&mut self) -> PResult<SourceFile> {
        let package_pos = self.expect(Tok::KwPackage)?;
        let name = self.parse_ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        while self.at(Tok::KwImport) {
            decls.push(TopLevelDecl::Decl(self.parse_gen_decl(DeclKind::Import)?));
        }

        let mut prev_import = true;
        while !self.at(Tok::Eof) {
            let is_import = self.at(Tok::KwImport);
            if is_import && !prev_import {
                return Err(SyntaxError::new(
                    self.span(),
                    "imports must appear before other declarations",
                ));
            }
            prev_import = is_import;
            decls.push(self.parse_top_decl()?);
        }

        Ok(SourceFile {
            package_pos,
            name,
            decls: self.arena.list_top_decls(decls),
        })
    }

    fn parse_top_decl(&mut self) -> PResult<TopLevelDecl> {
        let kind = match self.tok() {
            Tok::KwImport => DeclKind::Import,
            Tok::KwConst => DeclKind::Const,
            Tok::KwType => DeclKind::Type,
            Tok::KwVar => DeclKind::Var,
            Tok::KwFunc => return self.parse_func_decl().map(TopLevelDecl::Func),
            _ => return Err(self.error_expected("declaration")),
        };
        self.parse_gen_decl(kind).map(TopLevelDecl::Decl)
    }

    fn parse_gen_decl(&mut self, kind: DeclKind) -> PResult<DeclId> {
        let kw_pos = self.bump();
        let mut specs = Vec::new();

        if self.eat(Tok::LParen).is_some() {
            let mut iota = 0usize;
            while !self.at(Tok::RParen) && !self.at(Tok::Eof) {
                specs.push(self.parse_spec(kind, iota)?);
                self.expect_semi()?;
                iota += 1;
            }
            self.expect(Tok::RParen)?;
        } else {
            specs.push(self.parse_spec(kind, 0)?);
        }

        let span = self.finish(kw_pos.start);
        self.expect_semi()?;
        let specs = self.arena.list_specs(specs);
        Ok(self.arena.decls.alloc(
            Decl {
                kind,
                kw_pos,
                specs,
            },
            span,
        ))
    }

    fn parse_spec(&mut self, kind: DeclKind, iota: usize) -> PResult<Spec> {
        match kind {
            DeclKind::Import => self.parse_import_spec(),
            DeclKind::Const | DeclKind::Var => self.parse_value_spec(kind, iota),
            DeclKind::Type => self.parse_type_spec().map(Spec::Type),
        }
    }

    fn parse_import_spec(&mut self) -> PResult<Spec> {
        let name = match self.tok() {
            Tok::Ident(_) => Some(ImportName::Name(self.parse_ident()?)),
            Tok::Dot => Some(ImportName::Dot(self.bump())),
            _ => None,
        };
        if self.at_string() {
            let path = self.bump();
            return Ok(Spec::Import(ImportSpec { name, path }));
        }
        let msg = if self.tok().literal().is_some() {
            "import path must be a string"
        } else {
            "missing import path"
        };
        Err(SyntaxError::new(self.span(), msg))
    }

    fn parse_value_spec(&mut self, kind: DeclKind, _iota: usize) -> PResult<Spec> {
        let names = self.parse_ident_list()?;
        let mut typ = None;
        let mut values = ListRef::EMPTY;

        if kind == DeclKind::Const {
            // type and values are optional here; the checker reports misuse
            if !matches!(self.tok(), Tok::Eof | Tok::Semi | Tok::RParen) {
                typ = self.try_ident_or_type()?;
                if self.eat(Tok::Assign).is_some() {
                    let list = self.parse_expr_list()?;
                    values = self.arena.list_exprs(list);
                }
            }
        } else {
            if !self.at(Tok::Assign) {
                typ = Some(self.parse_type()?);
            }
            if self.eat(Tok::Assign).is_some() {
                let list = self.parse_expr_list()?;
                values = self.arena.list_exprs(list);
            }
        }

        Ok(Spec::Value(ValueSpec { names, typ, values }))
    }

    fn parse_type_spec(&mut self) -> PResult<TypeSpec> {
        let name = self.parse_ident()?;

        let Some(lbrack) = self.eat(Tok::LBrack) else {
            let assign_pos = self.eat(Tok::Assign);
            let typ = self.parse_type()?;
            return Ok(TypeSpec {
                name,
                type_params: ListRef::EMPTY,
                assign_pos,
                typ,
            });
        };

        if !matches!(self.tok(), Tok::Ident(_)) {
            let typ = self.parse_array_type(lbrack, None)?;
            return Ok(TypeSpec {
                name,
                type_params: ListRef::EMPTY,
                assign_pos: None,
                typ,
            });
        }

        // `T[P any]` or `T[N]int`: parse an expression and see whether it
        // splits into a parameter name and constraint.
        let first = self.parse_ident()?;
        let mut x = self.ident_expr(first);
        if !self.at(Tok::LBrack) {
            self.expr_lev += 1;
            let lhs = self.parse_primary_expr(Some(x))?;
            x = self.parse_binary_expr(Some(lhs), 1)?;
            self.expr_lev -= 1;
        }

        let force = self.at(Tok::Comma);
        match self.extract_name(x, force) {
            Some((pname, ptype)) if ptype.is_some() || !self.at(Tok::RBrack) => {
                let groups = self.parse_parameter_list(Some(pname), ptype, Tok::RBrack, false)?;
                self.expect(Tok::RBrack)?;
                let type_params = self.type_param_decls(groups);
                let assign_pos = self.eat(Tok::Assign);
                let typ = self.parse_type()?;
                Ok(TypeSpec {
                    name,
                    type_params,
                    assign_pos,
                    typ,
                })
            }
            _ => {
                let typ = self.parse_array_type(lbrack, Some(x))?;
                Ok(TypeSpec {
                    name,
                    type_params: ListRef::EMPTY,
                    assign_pos: None,
                    typ,
                })
            }
        }
    }

    /// Splits `P C`, `P *C`, `P (C)` or `P A|B` (parsed as an expression)
    /// into a type parameter name and an optional constraint.
    fn extract_name(&mut self, x: ExprId, force: bool) -> Option<(IdentName, Option<TypeId>)> {
        match self.arena.exprs[x] {
            Expr::Ident(sym) => Some((
                IdentName {
                    sym,
                    pos: self.expr_span(x),
                },
                None,
            )),
            Expr::Binary {
                left,
                op: BinaryOp::Mul,
                right,
            } => {
                let Expr::Ident(sym) = self.arena.exprs[left] else {
                    return None;
                };
                if !(force || self.is_type_elem(right)) {
                    return None;
                }
                let name = IdentName {
                    sym,
                    pos: self.expr_span(left),
                };
                let elem = self.expr_to_type(right);
                let star = Span::empty_at(self.expr_span(left).end as usize);
                let span = Span {
                    start: star.start,
                    end: self.expr_span(right).end,
                };
                Some((name, Some(self.alloc_type(Type::Pointer(elem), span))))
            }
            Expr::Binary {
                left,
                op: BinaryOp::Or,
                right,
            } => {
                let force = force || self.is_type_elem(right);
                let (name, lhs) = self.extract_name(left, force)?;
                let lhs = lhs?;
                let rhs = self.expr_to_type(right);
                Some((name, Some(self.union_of(lhs, rhs))))
            }
            Expr::Call {
                func,
                args,
                ellipsis: false,
            } => {
                let Expr::Ident(sym) = self.arena.exprs[func] else {
                    return None;
                };
                let &[arg] = self.arena.exprs_list(args) else {
                    return None;
                };
                if !(force || self.is_type_elem(arg)) {
                    return None;
                }
                let name = IdentName {
                    sym,
                    pos: self.expr_span(func),
                };
                let inner = self.expr_to_type(arg);
                let span = Span {
                    start: self.expr_span(func).end,
                    end: self.expr_span(x).end,
                };
                Some((name, Some(self.alloc_type(Type::Paren(inner), span))))
            }
            _ => None,
        }
    }

    /// Whether `x` can only be a type set element, never a value.
    fn is_type_elem(&self, x: ExprId) -> bool {
        match self.arena.exprs[x] {
            Expr::Type(t) => matches!(
                self.arena.types[t],
                Type::Array { .. }
                    | Type::Slice(_)
                    | Type::Struct { .. }
                    | Type::Func(_)
                    | Type::Interface { .. }
                    | Type::Map { .. }
                    | Type::Chan { .. }
            ),
            Expr::Binary { left, right, .. } => self.is_type_elem(left) || self.is_type_elem(right),
            Expr::Unary {
                op: UnaryOp::Tilde,
                ..
            } => true,
            Expr::Paren(inner) => self.is_type_elem(inner),
            _ => false,
        }
    }

    /// Reinterprets an expression parsed in type position.
    fn expr_to_type(&mut self, x: ExprId) -> TypeId {
        let span = self.expr_span(x);
        match self.arena.exprs[x] {
            Expr::Type(t) => t,
            Expr::Ident(sym) => self.named_type(IdentName { sym, pos: span }),
            Expr::Selector { expr, sel } => match self.arena.exprs[expr] {
                Expr::Ident(pkg) => {
                    let pkg = IdentName {
                        sym: pkg,
                        pos: self.expr_span(expr),
                    };
                    self.alloc_type(
                        Type::Named {
                            pkg: Some(pkg),
                            name: sel,
                            args: ListRef::EMPTY,
                        },
                        span,
                    )
                }
                _ => self.alloc_type(Type::Expr(x), span),
            },
            Expr::Index { expr, indices } => {
                let base = self.expr_to_type(expr);
                match self.arena.types[base] {
                    Type::Named { pkg, name, args } if args.is_empty() => {
                        let indices = self.arena.exprs_list(indices).to_vec();
                        let args: Vec<TypeId> =
                            indices.into_iter().map(|e| self.expr_to_type(e)).collect();
                        let args = self.arena.list_types(args);
                        self.alloc_type(Type::Named { pkg, name, args }, span)
                    }
                    _ => self.alloc_type(Type::Expr(x), span),
                }
            }
            Expr::Unary {
                op: UnaryOp::Deref,
                expr,
            } => {
                let elem = self.expr_to_type(expr);
                self.alloc_type(Type::Pointer(elem), span)
            }
            Expr::Unary {
                op: UnaryOp::Tilde,
                expr,
            } => {
                let typ = self.expr_to_type(expr);
                let terms = self.arena.list_type_terms([TypeTerm { tilde: true, typ }]);
                self.alloc_type(Type::Union { terms }, span)
            }
            Expr::Binary {
                left,
                op: BinaryOp::Or,
                right,
            } => {
                let lhs = self.expr_to_type(left);
                let rhs = self.expr_to_type(right);
                self.union_of(lhs, rhs)
            }
            Expr::Paren(inner) => {
                let inner = self.expr_to_type(inner);
                self.alloc_type(Type::Paren(inner), span)
            }
            _ => self.alloc_type(Type::Expr(x), span),
        }
    }

    fn terms_of(&self, t: TypeId) -> Vec<TypeTerm> {
        match self.arena.types[t] {
            Type::Union { terms } => self.arena.type_terms(terms).to_vec(),
            _ => vec![TypeTerm {
                tilde: false,
                typ: t,
            }],
        }
    }

    fn union_of(&mut self, lhs: TypeId, rhs: TypeId) -> TypeId {
        let mut terms = self.terms_of(lhs);
        terms.extend(self.terms_of(rhs));
        let span = self.type_span(lhs).to(self.type_span(rhs));
        let terms = self.arena.list_type_terms(terms);
        self.alloc_type(Type::Union { terms }, span)
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> PResult<TypeId> {
        match self.try_ident_or_type()? {
            Some(t) => Ok(t),
            None => Err(self.error_expected("type")),
        }
    }

    fn try_ident_or_type(&mut self) -> PResult<Option<TypeId>> {
        self.nested(|p| {
            let start = p.start();
            let t = match p.tok() {
                Tok::Ident(_) => {
                    let t = p.parse_type_name(None)?;
                    if p.at(Tok::LBrack) {
                        p.parse_type_instance(t)?
                    } else {
                        t
                    }
                }
                Tok::LBrack => {
                    let lbrack = p.bump();
                    p.parse_array_type(lbrack, None)?
                }
                Tok::KwStruct => p.parse_struct_type()?,
                Tok::Star => {
                    p.bump();
                    let elem = p.parse_type()?;
                    p.alloc_type(Type::Pointer(elem), p.finish(start))
                }
                Tok::KwFunc => p.parse_func_type()?,
                Tok::KwInterface => p.parse_interface_type()?,
                Tok::KwMap => p.parse_map_type()?,
                Tok::KwChan | Tok::Arrow => p.parse_chan_type()?,
                Tok::LParen => {
                    p.bump();
                    let inner = p.parse_type()?;
                    p.expect(Tok::RParen)?;
                    p.alloc_type(Type::Paren(inner), p.finish(start))
                }
                _ => return Ok(None),
            };
            Ok(Some(t))
        })
    }

    /// `Name` or `pkg.Name`.
    fn parse_type_name(&mut self, ident: Option<IdentName>) -> PResult<TypeId> {
        let first = match ident {
            Some(ident) => ident,
            None => self.parse_ident()?,
        };
        if self.eat(Tok::Dot).is_some() {
            let name = self.parse_ident()?;
            return Ok(self.alloc_type(
                Type::Named {
                    pkg: Some(first),
                    name,
                    args: ListRef::EMPTY,
                },
                first.pos.to(name.pos),
            ));
        }
        Ok(self.named_type(first))
    }

    fn parse_qualified_ident(&mut self, ident: Option<IdentName>) -> PResult<TypeId> {
        let t = self.parse_type_name(ident)?;
        if self.at(Tok::LBrack) {
            return self.parse_type_instance(t);
        }
        Ok(t)
    }

    fn parse_type_instance(&mut self, base: TypeId) -> PResult<TypeId> {
        self.expect(Tok::LBrack)?;
        self.expr_lev += 1;
        let mut args = Vec::new();
        while !self.at(Tok::RBrack) && !self.at(Tok::Eof) {
            args.push(self.parse_type()?);
            if !self.at_comma("type argument list", Tok::RBrack)? {
                break;
            }
            self.bump();
        }
        self.expr_lev -= 1;
        let closing = self.expect_closing(Tok::RBrack, "type argument list")?;
        if args.is_empty() {
            return Err(self.error_expected_at(closing, "type argument list"));
        }
        Ok(self.instantiate(base, args))
    }

    fn instantiate(&mut self, base: TypeId, args: Vec<TypeId>) -> TypeId {
        let span = self.finish(self.type_span(base).start);
        let args = self.arena.list_types(args);
        match self.arena.types[base] {
            Type::Named { pkg, name, .. } => self.alloc_type(Type::Named { pkg, name, args }, span),
            _ => base,
        }
    }

    /// `[len]T`, `[...]T` or `[]T`, after the `[`.
    fn parse_array_type(&mut self, lbrack: Span, len: Option<ExprId>) -> PResult<TypeId> {
        let len = match len {
            Some(x) => Some(ArrayLen::Expr(x)),
            None => {
                self.expr_lev += 1;
                let len = if self.eat(Tok::Ellipsis).is_some() {
                    Some(ArrayLen::Ellipsis)
                } else if !self.at(Tok::RBrack) {
                    Some(ArrayLen::Expr(self.parse_rhs()?))
                } else {
                    None
                };
                self.expr_lev -= 1;
                len
            }
        };
        if self.at(Tok::Comma) {
            return Err(SyntaxError::new(self.span(), "unexpected comma; expecting ]"));
        }
        self.expect(Tok::RBrack)?;
        let elem = self.parse_type()?;
        let t = match len {
            Some(len) => Type::Array { len, elem },
            None => Type::Slice(elem),
        };
        Ok(self.alloc_type(t, self.finish(lbrack.start)))
    }

    fn parse_struct_type(&mut self) -> PResult<TypeId> {
        let start = self.bump().start;
        self.expect(Tok::LBrace)?;
        let mut fields = Vec::new();
        while matches!(self.tok(), Tok::Ident(_) | Tok::Star | Tok::LParen) {
            fields.push(self.parse_field_decl()?);
        }
        self.expect(Tok::RBrace)?;
        let fields = self.arena.list_fields(fields);
        Ok(self.alloc_type(Type::Struct { fields }, self.finish(start)))
    }

    fn parse_field_decl(&mut self) -> PResult<FieldId> {
        let start = self.start();
        let (names, typ) = match self.tok() {
            Tok::Ident(_) => {
                let name = self.parse_ident()?;
                if self.at(Tok::Dot) || self.at_string() || self.at(Tok::Semi) || self.at(Tok::RBrace)
                {
                    // embedded
                    let typ = if self.at(Tok::Dot) {
                        self.parse_qualified_ident(Some(name))?
                    } else {
                        self.named_type(name)
                    };
                    (ListRef::EMPTY, typ)
                } else {
                    let mut names = vec![name];
                    while self.eat(Tok::Comma).is_some() {
                        names.push(self.parse_ident()?);
                    }
                    if names.len() == 1 && self.at(Tok::LBrack) {
                        match self.parse_array_field_or_type_instance(name)? {
                            (Some(_), typ) => (self.arena.list_ident_names(names), typ),
                            (None, typ) => (ListRef::EMPTY, typ),
                        }
                    } else {
                        let typ = self.parse_type()?;
                        (self.arena.list_ident_names(names), typ)
                    }
                }
            }
            Tok::Star => {
                self.bump();
                if self.at(Tok::LParen) {
                    return Err(SyntaxError::new(
                        self.span(),
                        "cannot parenthesize embedded type",
                    ));
                }
                let elem = self.parse_qualified_ident(None)?;
                (
                    ListRef::EMPTY,
                    self.alloc_type(Type::Pointer(elem), self.finish(start)),
                )
            }
            Tok::LParen => {
                return Err(SyntaxError::new(
                    self.span(),
                    "cannot parenthesize embedded type",
                ))
            }
            _ => return Err(self.error_expected("field name or embedded type")),
        };

        let tag = if self.at_string() {
            Some(self.bump())
        } else {
            None
        };
        let span = self.finish(start);
        self.expect_semi()?;
        Ok(self.arena.fields.alloc(
            Field {
                names,
                ellipsis_pos: None,
                typ,
                tag,
            },
            span,
        ))
    }

    /// After `name`: `name []E`, `name [N]E` (a field named `name`) or
    /// `name[A, B]` (an embedded instantiated type, name is `None`).
    fn parse_array_field_or_type_instance(
        &mut self,
        name: IdentName,
    ) -> PResult<(Option<IdentName>, TypeId)> {
        let lbrack = self.expect(Tok::LBrack)?;
        let mut trailing_comma = None;
        let mut args = Vec::new();
        if !self.at(Tok::RBrack) {
            self.expr_lev += 1;
            args.push(self.parse_rhs()?);
            while let Some(comma) = self.eat(Tok::Comma) {
                if self.at(Tok::RBrack) {
                    trailing_comma = Some(comma);
                    break;
                }
                args.push(self.parse_rhs()?);
            }
            self.expr_lev -= 1;
        }
        self.expect(Tok::RBrack)?;

        if args.is_empty() {
            let elem = self.parse_type()?;
            let t = self.alloc_type(Type::Slice(elem), self.finish(lbrack.start));
            return Ok((Some(name), t));
        }

        if let [len] = args[..] {
            if let Some(elem) = self.try_ident_or_type()? {
                if let Some(comma) = trailing_comma {
                    return Err(SyntaxError::new(comma, "unexpected comma; expecting ]"));
                }
                let t = self.alloc_type(
                    Type::Array {
                        len: ArrayLen::Expr(len),
                        elem,
                    },
                    self.finish(lbrack.start),
                );
                return Ok((Some(name), t));
            }
        }

        let base = self.named_type(name);
        let args = args.into_iter().map(|a| self.expr_to_type(a)).collect();
        Ok((None, self.instantiate(base, args)))
    }

    fn parse_interface_type(&mut self) -> PResult<TypeId> {
        let start = self.bump().start;
        self.expect(Tok::LBrace)?;
        let mut elems = Vec::new();
        loop {
            let elem = match self.tok() {
                Tok::Ident(_) => self.parse_method_spec()?,
                Tok::Tilde => InterfaceElem::Embed(self.parse_embedded_elem(None)?),
                _ => match self.try_ident_or_type()? {
                    Some(t) => InterfaceElem::Embed(self.parse_embedded_elem(Some(t))?),
                    None => break,
                },
            };
            self.expect_semi()?;
            elems.push(elem);
        }
        self.expect(Tok::RBrace)?;
        let elems = self.arena.list_interface_elems(elems);
        Ok(self.alloc_type(Type::Interface { elems }, self.finish(start)))
    }

    fn parse_method_spec(&mut self) -> PResult<InterfaceElem> {
        let ident = self.parse_ident()?;
        if self.at(Tok::Dot) {
            let t = self.parse_qualified_ident(Some(ident))?;
            return Ok(InterfaceElem::Embed(self.parse_embedded_elem(Some(t))?));
        }

        match self.tok() {
            Tok::LBrack => {
                let lbrack = self.bump();
                self.expr_lev += 1;
                let x = self.parse_rhs()?;
                self.expr_lev -= 1;

                if let Expr::Ident(sym) = self.arena.exprs[x] {
                    if !self.at(Tok::Comma) && !self.at(Tok::RBrack) {
                        let name0 = IdentName {
                            sym,
                            pos: self.expr_span(x),
                        };
                        self.parse_parameter_list(Some(name0), None, Tok::RBrack, false)?;
                        self.expect(Tok::RBrack)?;
                        return Err(SyntaxError::new(
                            lbrack,
                            "interface method must have no type parameters",
                        ));
                    }
                }

                // embedded instantiated type
                let mut args = vec![self.expr_to_type(x)];
                if self.at_comma("type argument list", Tok::RBrack)? {
                    self.expr_lev += 1;
                    self.bump();
                    while !self.at(Tok::RBrack) && !self.at(Tok::Eof) {
                        args.push(self.parse_type()?);
                        if !self.at_comma("type argument list", Tok::RBrack)? {
                            break;
                        }
                        self.bump();
                    }
                    self.expr_lev -= 1;
                }
                self.expect_closing(Tok::RBrack, "type argument list")?;
                let base = self.named_type(ident);
                let t = self.instantiate(base, args);
                Ok(InterfaceElem::Embed(self.parse_embedded_elem(Some(t))?))
            }
            Tok::LParen => {
                let sig = self.parse_signature(ident.pos.start)?;
                Ok(InterfaceElem::Method { name: ident, sig })
            }
            _ => {
                let t = self.named_type(ident);
                Ok(InterfaceElem::Embed(self.parse_embedded_elem(Some(t))?))
            }
        }
    }

    /// `T`, `~T` or a union of terms. A single plain term stays unwrapped.
    fn parse_embedded_elem(&mut self, first: Option<TypeId>) -> PResult<TypeId> {
        let start = match first {
            Some(t) => self.type_span(t).start,
            None => self.start(),
        };
        let mut terms = match first {
            Some(t) => self.terms_of(t),
            None => vec![self.parse_embedded_term()?],
        };
        while self.eat(Tok::Pipe).is_some() {
            terms.push(self.parse_embedded_term()?);
        }
        if let [TypeTerm { tilde: false, typ }] = terms[..] {
            return Ok(typ);
        }
        if let (Some(t), 1) = (first, terms.len()) {
            return Ok(t);
        }
        let terms = self.arena.list_type_terms(terms);
        Ok(self.alloc_type(Type::Union { terms }, self.finish(start)))
    }

    fn parse_embedded_term(&mut self) -> PResult<TypeTerm> {
        if self.eat(Tok::Tilde).is_some() {
            let typ = self.parse_type()?;
            return Ok(TypeTerm { tilde: true, typ });
        }
        match self.try_ident_or_type()? {
            Some(typ) => Ok(TypeTerm { tilde: false, typ }),
            None => Err(self.error_expected("~ term or type")),
        }
    }

    fn parse_map_type(&mut self) -> PResult<TypeId> {
        let start = self.bump().start;
        self.expect(Tok::LBrack)?;
        let key = self.parse_type()?;
        self.expect(Tok::RBrack)?;
        let value = self.parse_type()?;
        Ok(self.alloc_type(Type::Map { key, value }, self.finish(start)))
    }

    fn parse_chan_type(&mut self) -> PResult<TypeId> {
        let start = self.start();
        let dir = if self.eat(Tok::KwChan).is_some() {
            if self.eat(Tok::Arrow).is_some() {
                ChanDir::Send
            } else {
                ChanDir::Both
            }
        } else {
            self.expect(Tok::Arrow)?;
            self.expect(Tok::KwChan)?;
            ChanDir::Recv
        };
        let elem = self.parse_type()?;
        Ok(self.alloc_type(Type::Chan { dir, elem }, self.finish(start)))
    }

    fn parse_func_type(&mut self) -> PResult<TypeId> {
        let start = self.expect(Tok::KwFunc)?.start;
        let (tparams, params) = self.parse_parameters(true)?;
        if let Some((opening, _)) = tparams {
            return Err(SyntaxError::new(
                opening,
                "function type must have no type parameters",
            ));
        }
        let results = self.parse_result()?;
        let span = self.finish(start);
        let sig = self.arena.signatures.alloc(Signature { params, results }, span);
        Ok(self.alloc_type(Type::Func(sig), span))
    }

    /// Parameters and results of a method spec.
    fn parse_signature(&mut self, start: u32) -> PResult<SignatureId> {
        let params = self.parse_param_fields(true)?;
        let results = self.parse_result()?;
        Ok(self
            .arena
            .signatures
            .alloc(Signature { params, results }, self.finish(start)))
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Optional `[type params]` followed by `(params)`.
    #[allow(clippy::type_complexity)]
    fn parse_parameters(
        &mut self,
        accept_tparams: bool,
    ) -> PResult<(Option<(Span, ListRef<TypeParamDeclId>)>, ListRef<FieldId>)> {
        let mut tparams = None;
        if accept_tparams {
            if let Some(opening) = self.eat(Tok::LBrack) {
                let groups = self.parse_parameter_list(None, None, Tok::RBrack, false)?;
                let closing = self.expect(Tok::RBrack)?;
                if groups.is_empty() {
                    return Err(SyntaxError::new(closing, "empty type parameter list"));
                }
                tparams = Some((opening, self.type_param_decls(groups)));
            }
        }
        let params = self.parse_param_fields(true)?;
        Ok((tparams, params))
    }

    fn parse_param_fields(&mut self, dddok: bool) -> PResult<ListRef<FieldId>> {
        self.expect(Tok::LParen)?;
        let groups = if self.at(Tok::RParen) {
            Vec::new()
        } else {
            self.parse_parameter_list(None, None, Tok::RParen, dddok)?
        };
        self.expect(Tok::RParen)?;
        Ok(self.fields_of(groups))
    }

    fn parse_result(&mut self) -> PResult<ListRef<FieldId>> {
        if self.at(Tok::LParen) {
            return self.parse_param_fields(false);
        }
        match self.try_ident_or_type()? {
            Some(typ) => {
                let span = self.type_span(typ);
                let field = self.arena.fields.alloc(
                    Field {
                        names: ListRef::EMPTY,
                        ellipsis_pos: None,
                        typ,
                        tag: None,
                    },
                    span,
                );
                Ok(self.arena.list_fields([field]))
            }
            None => Ok(ListRef::EMPTY),
        }
    }

    fn fields_of(&mut self, groups: Vec<ParamGroup>) -> ListRef<FieldId> {
        let ids: Vec<FieldId> = groups
            .into_iter()
            .map(|g| {
                self.arena.fields.alloc(
                    Field {
                        names: g.names,
                        ellipsis_pos: g.dots,
                        typ: g.typ,
                        tag: None,
                    },
                    g.span,
                )
            })
            .collect();
        self.arena.list_fields(ids)
    }

    fn type_param_decls(&mut self, groups: Vec<ParamGroup>) -> ListRef<TypeParamDeclId> {
        let ids: Vec<TypeParamDeclId> = groups
            .into_iter()
            .map(|g| {
                self.arena.type_param_decls.alloc(
                    TypeParamDecl {
                        names: g.names,
                        constraint: g.typ,
                    },
                    g.span,
                )
            })
            .collect();
        self.arena.list_type_param_decls(ids)
    }

    fn param_group(
        &mut self,
        names: Vec<IdentName>,
        dots: Option<Span>,
        typ: TypeId,
        start: u32,
    ) -> ParamGroup {
        let names = if names.is_empty() {
            ListRef::EMPTY
        } else {
            self.arena.list_ident_names(names)
        };
        ParamGroup {
            names,
            dots,
            typ,
            span: Span {
                start,
                end: self.type_span(typ).end,
            },
        }
    }

    /// Parameter or type parameter list up to (not including) `closing`.
    /// `name0` and `typ0` are already parsed leading parts of the first entry.
    fn parse_parameter_list(
        &mut self,
        name0: Option<IdentName>,
        typ0: Option<TypeId>,
        closing: Tok<'src>,
        dddok: bool,
    ) -> PResult<Vec<ParamGroup>> {
        let tparams = closing == Tok::RBrack;
        let pos0 = match (name0, typ0) {
            (Some(name), _) => name.pos,
            (None, Some(t)) => self.type_span(t),
            (None, None) => self.span(),
        };

        let (mut name0, mut typ0) = (name0, typ0);
        let mut list: Vec<Param> = Vec::new();
        let mut named = 0usize; // explicit name and type
        let mut typed = 0usize; // explicit type

        while name0.is_some() || (!self.at(closing) && !self.at(Tok::Eof)) {
            let par = match typ0.take() {
                Some(t) => {
                    let t = if tparams {
                        self.parse_embedded_elem(Some(t))?
                    } else {
                        t
                    };
                    let name = name0.take();
                    let start = name.map_or(self.type_span(t).start, |n| n.pos.start);
                    Param {
                        name,
                        typ: Some(t),
                        dots: None,
                        start,
                    }
                }
                None => self.parse_param_decl(name0.take(), tparams)?,
            };
            if par.name.is_some() && par.typ.is_some() {
                named += 1;
            }
            if par.typ.is_some() {
                typed += 1;
            }
            list.push(par);

            if !self.at_comma("parameter list", closing)? {
                break;
            }
            self.bump();
        }

        if list.is_empty() {
            return Ok(Vec::new());
        }

        if named == 0 {
            // all unnamed: the names found are type names
            for par in &mut list {
                if let Some(name) = par.name.take() {
                    par.typ = Some(self.named_type(name));
                }
            }
            if tparams {
                let (at, msg) = if typed == 0 {
                    (self.span(), "missing type constraint")
                } else if list.len() == 1 {
                    (pos0, "missing type parameter name or invalid array length")
                } else {
                    (pos0, "missing type parameter name")
                };
                return Err(SyntaxError::new(at, msg));
            }
        } else if named != list.len() {
            // some named: all must be named, types distribute leftwards
            let mut err_pos = None;
            let mut typ: Option<(TypeId, Option<Span>)> = None;
            for par in list.iter_mut().rev() {
                if let Some(t) = par.typ {
                    typ = Some((t, par.dots));
                    if par.name.is_none() {
                        err_pos = Some(par.dots.unwrap_or(self.type_span(t)));
                    }
                } else if let Some((t, dots)) = typ {
                    par.typ = Some(t);
                    par.dots = dots;
                } else {
                    err_pos = par.name.map(|n| n.pos);
                }
            }
            if let Some(pos) = err_pos {
                let (at, msg) = match (named == typed, tparams) {
                    (true, true) => (self.span(), "missing type constraint"),
                    (true, false) => (self.span(), "missing parameter type"),
                    (false, true) if list.len() == 1 => {
                        (pos, "missing type parameter name or invalid array length")
                    }
                    (false, true) => (pos, "missing type parameter name"),
                    (false, false) => (pos, "missing parameter name"),
                };
                return Err(SyntaxError::new(at, msg));
            }
        }

        let last = list.len() - 1;
        for (i, par) in list.iter().enumerate() {
            if let Some(dots) = par.dots {
                if !dddok {
                    return Err(SyntaxError::new(dots, "invalid use of ..."));
                }
                if i < last {
                    return Err(SyntaxError::new(dots, "can only use ... with final parameter"));
                }
            }
        }

        let mut groups = Vec::new();
        if named == 0 {
            for par in list {
                if let Some(typ) = par.typ {
                    groups.push(self.param_group(Vec::new(), par.dots, typ, par.start));
                }
            }
            return Ok(groups);
        }

        // consecutive names sharing one parsed type form one group
        let mut names = Vec::new();
        let mut current: Option<(TypeId, Option<Span>, u32)> = None;
        for par in list {
            let Some(typ) = par.typ else { continue };
            match current {
                Some((t, _, _)) if t == typ => {}
                _ => {
                    if let Some((t, dots, start)) = current.take() {
                        let group = self.param_group(std::mem::take(&mut names), dots, t, start);
                        groups.push(group);
                    }
                    current = Some((typ, par.dots, par.start));
                }
            }
            names.extend(par.name);
        }
        if let Some((t, dots, start)) = current {
            groups.push(self.param_group(names, dots, t, start));
        }
        Ok(groups)
    }

    fn parse_param_decl(&mut self, name: Option<IdentName>, type_sets_ok: bool) -> PResult<Param> {
        let start = name.map_or(self.start(), |n| n.pos.start);
        let mut par = Param {
            name: None,
            typ: None,
            dots: None,
            start,
        };

        if name.is_none() && type_sets_ok && self.at(Tok::Tilde) {
            par.typ = Some(self.parse_embedded_elem(None)?);
            return Ok(par);
        }

        if name.is_some() || matches!(self.tok(), Tok::Ident(_)) {
            let name = match name {
                Some(name) => name,
                None => self.parse_ident()?,
            };
            par.name = Some(name);
            match self.tok() {
                Tok::Ident(_)
                | Tok::Star
                | Tok::Arrow
                | Tok::KwFunc
                | Tok::KwChan
                | Tok::KwMap
                | Tok::KwStruct
                | Tok::KwInterface
                | Tok::LParen => par.typ = Some(self.parse_type()?),
                Tok::LBrack => {
                    let (name, typ) = self.parse_array_field_or_type_instance(name)?;
                    par.name = name;
                    par.typ = Some(typ);
                }
                Tok::Ellipsis => {
                    let (dots, typ) = self.parse_dots_type()?;
                    par.dots = Some(dots);
                    par.typ = Some(typ);
                    return Ok(par);
                }
                Tok::Dot => {
                    par.typ = Some(self.parse_qualified_ident(Some(name))?);
                    par.name = None;
                }
                Tok::Tilde if type_sets_ok => {
                    par.typ = Some(self.parse_embedded_elem(None)?);
                    return Ok(par);
                }
                Tok::Pipe if type_sets_ok => {
                    let first = self.named_type(name);
                    par.typ = Some(self.parse_embedded_elem(Some(first))?);
                    par.name = None;
                    return Ok(par);
                }
                _ => {}
            }
        } else {
            match self.tok() {
                Tok::Star
                | Tok::Arrow
                | Tok::KwFunc
                | Tok::LBrack
                | Tok::KwChan
                | Tok::KwMap
                | Tok::KwStruct
                | Tok::KwInterface
                | Tok::LParen => par.typ = Some(self.parse_type()?),
                Tok::Ellipsis => {
                    let (dots, typ) = self.parse_dots_type()?;
                    par.dots = Some(dots);
                    par.typ = Some(typ);
                    return Ok(par);
                }
                _ => return Err(self.error_expected("')'")),
            }
        }

        if type_sets_ok && self.at(Tok::Pipe) {
            if let Some(t) = par.typ {
                par.typ = Some(self.parse_embedded_elem(Some(t))?);
            }
        }
        Ok(par)
    }

    fn parse_dots_type(&mut self) -> PResult<(Span, TypeId)> {
        let dots = self.expect(Tok::Ellipsis)?;
        let typ = self.parse_type()?;
        Ok((dots, typ))
    }

    fn parse_func_decl(&mut self) -> PResult<FuncDeclId> {
        let func_pos = self.expect(Tok::KwFunc)?;
        let recv = if self.at(Tok::LParen) {
            Some(self.parse_param_fields(true)?)
        } else {
            None
        };
        let name = self.parse_ident()?;
        let sig_start = self.start();
        let (tparams, params) = self.parse_parameters(true)?;
        if let (Some(_), Some((opening, _))) = (recv, tparams) {
            return Err(SyntaxError::new(opening, "method must have no type parameters"));
        }
        let results = self.parse_result()?;
        let sig = self
            .arena
            .signatures
            .alloc(Signature { params, results }, self.finish(sig_start));

        let body = if self.at(Tok::LBrace) {
            Some(self.parse_block()?)
        } else {
            None
        };
        let span = self.finish(func_pos.start);
        if body.is_none() && self.eat(Tok::Semi).is_some() {
            if self.at(Tok::LBrace) {
                return Err(SyntaxError::new(
                    self.span(),
                    "unexpected semicolon or newline before {",
                ));
            }
        } else {
            self.expect_semi()?;
        }

        Ok(self.arena.funcs.alloc(
            FuncDecl {
                func_pos,
                recv,
                name,
                type_params: tparams.map_or(ListRef::EMPTY, |(_, list)| list),
                sig,
                body,
            },
            span,
        ))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    #[inline]
    fn alloc_stmt(&mut self, s: Stmt, span: Span) -> StmtId {
        self.arena.stmts.alloc(s, span)
    }

    #[inline]
    fn alloc_simple(&mut self, s: SimpleStmt, span: Span) -> SimpleStmtId {
        self.arena.simple_stmts.alloc(s, span)
    }

    fn parse_block(&mut self) -> PResult<Block> {
        self.expect(Tok::LBrace)?;
        let stmts = self.parse_stmt_list()?;
        self.expect(Tok::RBrace)?;
        Ok(Block { stmts })
    }

    fn parse_stmt_list(&mut self) -> PResult<ListRef<StmtId>> {
        let mut list = Vec::new();
        while !matches!(
            self.tok(),
            Tok::KwCase | Tok::KwDefault | Tok::RBrace | Tok::Eof
        ) {
            list.push(self.parse_stmt()?);
        }
        Ok(self.arena.list_stmts(list))
    }

    fn parse_stmt(&mut self) -> PResult<StmtId> {
        self.nested(Self::parse_stmt_inner)
    }

    fn parse_stmt_inner(&mut self) -> PResult<StmtId> {
        let start = self.start();
        let (stmt, span) = match self.tok() {
            Tok::KwConst | Tok::KwType | Tok::KwVar => {
                let kind = match self.tok() {
                    Tok::KwConst => DeclKind::Const,
                    Tok::KwType => DeclKind::Type,
                    _ => DeclKind::Var,
                };
                let decl = self.parse_gen_decl(kind)?;
                (Stmt::Decl(decl), self.arena.decls.span(decl))
            }
            Tok::Ident(_)
            | Tok::IntLit(_)
            | Tok::FloatLit(_)
            | Tok::ImagLit(_)
            | Tok::RuneLit(_)
            | Tok::StringLit(_)
            | Tok::RawStringLit(_)
            | Tok::KwFunc
            | Tok::LParen
            | Tok::LBrack
            | Tok::KwStruct
            | Tok::KwMap
            | Tok::KwChan
            | Tok::KwInterface
            | Tok::Plus
            | Tok::Minus
            | Tok::Star
            | Tok::Amp
            | Tok::Caret
            | Tok::Arrow
            | Tok::Bang => match self.parse_simple_stmt(StmtMode::LabelOk)? {
                // no semicolon after a labeled statement
                SimpleOutcome::Labeled(id) => return Ok(id),
                SimpleOutcome::Simple(s) => {
                    let span = self.finish(start);
                    self.expect_semi()?;
                    (Stmt::Simple(s), span)
                }
                SimpleOutcome::Range { .. } => {
                    unreachable!("range clauses are only parsed in for statements")
                }
            },
            Tok::KwGo | Tok::KwDefer => {
                let go = self.at(Tok::KwGo);
                self.bump();
                let call = self.parse_call_expr(if go { "go" } else { "defer" })?;
                let span = self.finish(start);
                self.expect_semi()?;
                (if go { Stmt::Go(call) } else { Stmt::Defer(call) }, span)
            }
            Tok::KwReturn => {
                self.bump();
                let results = if !self.at(Tok::Semi) && !self.at(Tok::RBrace) {
                    let list = self.parse_expr_list()?;
                    self.arena.list_exprs(list)
                } else {
                    ListRef::EMPTY
                };
                let span = self.finish(start);
                self.expect_semi()?;
                (Stmt::Return(results), span)
            }
            Tok::KwBreak | Tok::KwContinue | Tok::KwGoto | Tok::KwFallthrough => {
                let kind = match self.tok() {
                    Tok::KwBreak => BranchKind::Break,
                    Tok::KwContinue => BranchKind::Continue,
                    Tok::KwGoto => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                };
                self.bump();
                let label = if kind != BranchKind::Fallthrough && matches!(self.tok(), Tok::Ident(_))
                {
                    Some(self.parse_ident()?)
                } else {
                    None
                };
                let span = self.finish(start);
                self.expect_semi()?;
                (Stmt::Branch { kind, label }, span)
            }
            Tok::LBrace => {
                let block = self.parse_block()?;
                let span = self.finish(start);
                self.expect_semi()?;
                (Stmt::Block(block), span)
            }
            Tok::KwIf => return self.parse_if_stmt(),
            Tok::KwSwitch => return self.parse_switch_stmt(),
            Tok::KwSelect => return self.parse_select_stmt(),
            Tok::KwFor => return self.parse_for_stmt(),
            Tok::Semi => {
                let span = self.bump();
                let empty = self.alloc_simple(SimpleStmt::Empty, span);
                (Stmt::Simple(empty), span)
            }
            Tok::RBrace => {
                // a semicolon may be omitted before a closing "}"
                let span = Span::empty_at(start as usize);
                let empty = self.alloc_simple(SimpleStmt::Empty, span);
                (Stmt::Simple(empty), span)
            }
            _ => return Err(self.error_expected("statement")),
        };
        Ok(self.alloc_stmt(stmt, span))
    }

    fn parse_simple_stmt(&mut self, mode: StmtMode) -> PResult<SimpleOutcome> {
        let start = self.start();
        let lhs = self.parse_expr_list()?;

        // `None` is `:=`
        let assign = match self.tok() {
            Tok::Define => Some(None),
            t => assign_op(t).map(Some),
        };
        if let Some(op) = assign {
            self.bump();
            if mode == StmtMode::RangeOk
                && self.at(Tok::KwRange)
                && matches!(op, None | Some(AssignOp::Assign))
            {
                self.bump();
                let expr = self.parse_rhs()?;
                return Ok(SimpleOutcome::Range {
                    lhs,
                    define: op.is_none(),
                    expr,
                });
            }
            let rhs = self.parse_expr_list()?;
            let lhs = self.arena.list_exprs(lhs);
            let rhs = self.arena.list_exprs(rhs);
            let s = match op {
                None => SimpleStmt::ShortVarDecl { lhs, rhs },
                Some(op) => SimpleStmt::Assign { lhs, op, rhs },
            };
            let span = self.finish(start);
            return Ok(SimpleOutcome::Simple(self.alloc_simple(s, span)));
        }

        if lhs.len() > 1 {
            return Err(self.error_expected_at(self.expr_span(lhs[0]), "1 expression"));
        }
        let x = lhs[0];

        let s = match self.tok() {
            Tok::Colon => {
                let colon = self.bump();
                if let (StmtMode::LabelOk, Expr::Ident(sym)) = (mode, self.arena.exprs[x]) {
                    let label = IdentName {
                        sym,
                        pos: self.expr_span(x),
                    };
                    let stmt = self.parse_stmt()?;
                    let span = self.finish(start);
                    return Ok(SimpleOutcome::Labeled(
                        self.alloc_stmt(Stmt::Labeled { label, stmt }, span),
                    ));
                }
                return Err(SyntaxError::new(colon, "illegal label declaration"));
            }
            Tok::Arrow => {
                self.bump();
                let value = self.parse_rhs()?;
                SimpleStmt::Send { chan: x, value }
            }
            Tok::Inc | Tok::Dec => {
                let op = if self.at(Tok::Inc) {
                    IncDecOp::Inc
                } else {
                    IncDecOp::Dec
                };
                self.bump();
                SimpleStmt::IncDec { expr: x, op }
            }
            _ => SimpleStmt::Expr(x),
        };
        let span = self.finish(start);
        Ok(SimpleOutcome::Simple(self.alloc_simple(s, span)))
    }

    fn parse_basic_simple_stmt(&mut self) -> PResult<SimpleStmtId> {
        match self.parse_simple_stmt(StmtMode::Basic)? {
            SimpleOutcome::Simple(id) => Ok(id),
            SimpleOutcome::Labeled(_) | SimpleOutcome::Range { .. } => {
                unreachable!("basic simple statements have no labels or range clauses")
            }
        }
    }

    /// The condition or tag expression held by a header statement.
    fn make_expr(&self, s: SimpleStmtId, want: &str) -> PResult<ExprId> {
        let found = match self.arena.simple_stmts[s] {
            SimpleStmt::Expr(x) => return Ok(x),
            SimpleStmt::Assign { .. } | SimpleStmt::ShortVarDecl { .. } => "assignment",
            _ => "simple statement",
        };
        Err(SyntaxError::new(
            self.arena.simple_stmts.span(s),
            format!("expected {want}, found {found} (missing parentheses around composite literal?)"),
        ))
    }

    fn parse_call_expr(&mut self, call_type: &str) -> PResult<ExprId> {
        let x = self.parse_rhs()?;
        let mut inner = x;
        while let Expr::Paren(e) = self.arena.exprs[inner] {
            inner = e;
        }
        if inner != x {
            return Err(SyntaxError::new(
                self.expr_span(x),
                format!("expression in {call_type} must not be parenthesized"),
            ));
        }
        if matches!(self.arena.exprs[x], Expr::Call { .. }) {
            return Ok(x);
        }
        Err(SyntaxError::new(
            Span::empty_at(self.expr_span(x).end as usize),
            format!("expression in {call_type} must be function call"),
        ))
    }

    fn parse_if_stmt(&mut self) -> PResult<StmtId> {
        let start = self.expect(Tok::KwIf)?.start;
        let (init, cond) = self.parse_if_header()?;
        let then = self.parse_block()?;

        let mut els = None;
        let span;
        if self.eat(Tok::KwElse).is_some() {
            match self.tok() {
                Tok::KwIf => {
                    let nested = self.parse_if_stmt()?;
                    span = self.finish(start).to(self.arena.stmts.span(nested));
                    els = Some(nested);
                }
                Tok::LBrace => {
                    let block_start = self.start();
                    let block = self.parse_block()?;
                    span = self.finish(start);
                    els = Some(self.alloc_stmt(Stmt::Block(block), self.finish(block_start)));
                    self.expect_semi()?;
                }
                _ => return Err(self.error_expected("if statement or block")),
            }
        } else {
            span = self.finish(start);
            self.expect_semi()?;
        }

        Ok(self.alloc_stmt(
            Stmt::If {
                init,
                cond,
                then,
                els,
            },
            span,
        ))
    }

    fn parse_if_header(&mut self) -> PResult<(Option<SimpleStmtId>, ExprId)> {
        if self.at(Tok::LBrace) {
            return Err(SyntaxError::new(
                self.span(),
                "missing condition in if statement",
            ));
        }

        let prev_lev = self.expr_lev;
        self.expr_lev = -1;

        let mut init = None;
        if !self.at(Tok::Semi) {
            if self.eat(Tok::KwVar).is_some() {
                return Err(SyntaxError::new(
                    self.span(),
                    "var declaration not allowed in if initializer",
                ));
            }
            init = Some(self.parse_basic_simple_stmt()?);
        }

        let mut cond_stmt = None;
        let mut semi = None;
        if !self.at(Tok::LBrace) {
            if self.at(Tok::Semi) {
                semi = Some((self.span(), self.at_auto_semi()));
                self.bump();
            } else {
                self.expect(Tok::Semi)?;
            }
            if !self.at(Tok::LBrace) {
                cond_stmt = Some(self.parse_basic_simple_stmt()?);
            }
        } else {
            cond_stmt = init.take();
        }

        let cond = match (cond_stmt, semi) {
            (Some(s), _) => self.make_expr(s, "boolean expression")?,
            (None, Some((at, true))) => {
                return Err(SyntaxError::new(
                    at,
                    "unexpected newline, expecting { after if clause",
                ))
            }
            (None, Some((at, false))) => {
                return Err(SyntaxError::new(at, "missing condition in if statement"))
            }
            (None, None) => {
                return Err(SyntaxError::new(
                    self.span(),
                    "missing condition in if statement",
                ))
            }
        };

        self.expr_lev = prev_lev;
        Ok((init, cond))
    }

    fn parse_switch_stmt(&mut self) -> PResult<StmtId> {
        let start = self.expect(Tok::KwSwitch)?.start;
        let (mut s1, mut s2) = (None, None);
        if !self.at(Tok::LBrace) {
            let prev_lev = self.expr_lev;
            self.expr_lev = -1;
            if !self.at(Tok::Semi) {
                s2 = Some(self.parse_basic_simple_stmt()?);
            }
            if self.eat(Tok::Semi).is_some() {
                s1 = s2.take();
                if !self.at(Tok::LBrace) {
                    s2 = Some(self.parse_basic_simple_stmt()?);
                }
            }
            self.expr_lev = prev_lev;
        }

        let guard = match s2 {
            Some(s) => self.type_switch_guard(s)?,
            None => None,
        };
        let tag = match (guard, s2) {
            (None, Some(s)) => Some(self.make_expr(s, "switch expression")?),
            _ => None,
        };

        self.expect(Tok::LBrace)?;
        let mut clauses = Vec::new();
        while self.at(Tok::KwCase) || self.at(Tok::KwDefault) {
            clauses.push(self.parse_case_clause(guard.is_some())?);
        }
        self.expect(Tok::RBrace)?;
        let span = self.finish(start);
        self.expect_semi()?;

        let clauses = self.arena.list_switch_clauses(clauses);
        let stmt = match guard {
            Some((bind, subject)) => Stmt::TypeSwitch {
                init: s1,
                bind,
                subject,
                clauses,
            },
            None => Stmt::Switch {
                init: s1,
                tag,
                clauses,
            },
        };
        Ok(self.alloc_stmt(stmt, span))
    }

    /// `x.(type)` or `v := x.(type)`: the optional binding and `x`.
    fn type_switch_guard(&self, s: SimpleStmtId) -> PResult<Option<(Option<ExprId>, ExprId)>> {
        match self.arena.simple_stmts[s] {
            SimpleStmt::Expr(x) => Ok(self.type_switch_subject(x).map(|subject| (None, subject))),
            SimpleStmt::ShortVarDecl { lhs, rhs }
            | SimpleStmt::Assign {
                lhs,
                op: AssignOp::Assign,
                rhs,
            } => {
                let (&[bind], &[value]) = (self.arena.exprs_list(lhs), self.arena.exprs_list(rhs))
                else {
                    return Ok(None);
                };
                let Some(subject) = self.type_switch_subject(value) else {
                    return Ok(None);
                };
                if matches!(self.arena.simple_stmts[s], SimpleStmt::Assign { .. }) {
                    let at = self.token_after(self.expr_span(bind).end);
                    return Err(SyntaxError::new(at, "expected ':=', found '='"));
                }
                Ok(Some((Some(bind), subject)))
            }
            _ => Ok(None),
        }
    }

    fn type_switch_subject(&self, x: ExprId) -> Option<ExprId> {
        match self.arena.exprs[x] {
            Expr::TypeAssert { expr, typ: None } => Some(expr),
            _ => None,
        }
    }

    /// Span of the first token starting at or after `offset`.
    fn token_after(&self, offset: u32) -> Span {
        let i = self.toks.partition_point(|t| (t.0 as u64) < offset as u64);
        let (start, _, end) = self.toks[i.min(self.toks.len() - 1)];
        Span::new(start, end)
    }

    fn parse_case_clause(&mut self, type_switch: bool) -> PResult<SwitchClauseId> {
        let start = self.start();
        let list = if self.eat(Tok::KwCase).is_some() {
            let exprs = if type_switch {
                let mut types = vec![self.parse_type()?];
                while self.eat(Tok::Comma).is_some() {
                    types.push(self.parse_type()?);
                }
                types
                    .into_iter()
                    .map(|t| self.type_expr(t))
                    .collect::<Vec<_>>()
            } else {
                self.parse_expr_list()?
            };
            Some(self.arena.list_exprs(exprs))
        } else {
            self.expect(Tok::KwDefault)?;
            None
        };
        self.expect(Tok::Colon)?;
        let body = self.parse_stmt_list()?;
        Ok(self
            .arena
            .switch_clauses
            .alloc(SwitchClause { list, body }, self.finish(start)))
    }

    fn parse_select_stmt(&mut self) -> PResult<StmtId> {
        let start = self.expect(Tok::KwSelect)?.start;
        self.expect(Tok::LBrace)?;
        let mut clauses = Vec::new();
        while self.at(Tok::KwCase) || self.at(Tok::KwDefault) {
            clauses.push(self.parse_comm_clause()?);
        }
        self.expect(Tok::RBrace)?;
        let span = self.finish(start);
        self.expect_semi()?;
        let clauses = self.arena.list_comm_clauses(clauses);
        Ok(self.alloc_stmt(Stmt::Select { clauses }, span))
    }

    fn parse_comm_clause(&mut self) -> PResult<CommClauseId> {
        let start = self.start();
        let comm = if self.eat(Tok::KwCase).is_some() {
            let comm_start = self.start();
            let lhs = self.parse_expr_list()?;
            let s = if self.at(Tok::Arrow) {
                if lhs.len() > 1 {
                    return Err(self.error_expected_at(self.expr_span(lhs[0]), "1 expression"));
                }
                self.bump();
                let value = self.parse_rhs()?;
                SimpleStmt::Send {
                    chan: lhs[0],
                    value,
                }
            } else if matches!(self.tok(), Tok::Assign | Tok::Define) {
                if lhs.len() > 2 {
                    return Err(
                        self.error_expected_at(self.expr_span(lhs[0]), "1 or 2 expressions")
                    );
                }
                let define = self.at(Tok::Define);
                self.bump();
                let value = self.parse_rhs()?;
                let lhs = self.arena.list_exprs(lhs);
                let rhs = self.arena.list_exprs([value]);
                if define {
                    SimpleStmt::ShortVarDecl { lhs, rhs }
                } else {
                    SimpleStmt::Assign {
                        lhs,
                        op: AssignOp::Assign,
                        rhs,
                    }
                }
            } else {
                if lhs.len() > 1 {
                    return Err(self.error_expected_at(self.expr_span(lhs[0]), "1 expression"));
                }
                SimpleStmt::Expr(lhs[0])
            };
            Some(self.alloc_simple(s, self.finish(comm_start)))
        } else {
            self.expect(Tok::KwDefault)?;
            None
        };
        self.expect(Tok::Colon)?;
        let body = self.parse_stmt_list()?;
        Ok(self
            .arena
            .comm_clauses
            .alloc(CommClause { comm, body }, self.finish(start)))
    }

    fn parse_for_stmt(&mut self) -> PResult<StmtId> {
        let start = self.expect(Tok::KwFor)?.start;
        let mut kind = ForKind::Infinite;

        if !self.at(Tok::LBrace) {
            let prev_lev = self.expr_lev;
            self.expr_lev = -1;

            let mut s2 = None;
            let mut range = None;
            if !self.at(Tok::Semi) {
                if self.eat(Tok::KwRange).is_some() {
                    // `for range x`
                    let expr = self.parse_rhs()?;
                    range = Some((Vec::new(), false, expr));
                } else {
                    match self.parse_simple_stmt(StmtMode::RangeOk)? {
                        SimpleOutcome::Simple(s) => s2 = Some(s),
                        SimpleOutcome::Range { lhs, define, expr } => {
                            range = Some((lhs, define, expr))
                        }
                        SimpleOutcome::Labeled(_) => {
                            unreachable!("labels are only parsed in statement lists")
                        }
                    }
                }
            }

            if let Some((lhs, define, expr)) = range {
                if let Some(&extra) = lhs.get(2..).and_then(|rest| rest.last()) {
                    return Err(self.error_expected_at(self.expr_span(extra), "at most 2 expressions"));
                }
                let lhs = self.arena.list_exprs(lhs);
                kind = ForKind::Range { lhs, define, expr };
            } else if self.eat(Tok::Semi).is_some() {
                let init = s2.take();
                let cond = if !self.at(Tok::Semi) {
                    Some(self.parse_basic_simple_stmt()?)
                } else {
                    None
                };
                self.expect_semi()?;
                let post = if !self.at(Tok::LBrace) {
                    Some(self.parse_basic_simple_stmt()?)
                } else {
                    None
                };
                let cond = match cond {
                    Some(s) => Some(self.make_expr(s, "boolean or range expression")?),
                    None => None,
                };
                kind = ForKind::Clause { init, cond, post };
            } else if let Some(s) = s2 {
                kind = ForKind::Cond(self.make_expr(s, "boolean or range expression")?);
            }

            self.expr_lev = prev_lev;
        }

        let body = self.parse_block()?;
        let span = self.finish(start);
        self.expect_semi()?;
        Ok(self.alloc_stmt(Stmt::For { kind, body }, span))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr_list(&mut self) -> PResult<Vec<ExprId>> {
        let mut list = vec![self.parse_rhs()?];
        while self.eat(Tok::Comma).is_some() {
            list.push(self.parse_rhs()?);
        }
        Ok(list)
    }

    #[inline]
    fn parse_rhs(&mut self) -> PResult<ExprId> {
        self.parse_binary_expr(None, 1)
    }

    fn parse_binary_expr(&mut self, lhs: Option<ExprId>, min_prec: u8) -> PResult<ExprId> {
        let x = match lhs {
            Some(x) => x,
            None => self.parse_unary_expr()?,
        };
        let depth = self.depth;
        let result = self.parse_binary_operands(x, min_prec);
        self.depth = depth;
        result
    }

    /// Every operator deepens the left spine of the result by one node, so
    /// each counts as a nesting level.
    fn parse_binary_operands(&mut self, mut x: ExprId, min_prec: u8) -> PResult<ExprId> {
        while let Some(op) = binary_op(self.tok()) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            if self.depth >= MAX_DEPTH {
                return Err(SyntaxError::new(self.span(), "exceeded max nesting depth"));
            }
            self.depth += 1;
            self.bump();
            let y = self.parse_binary_expr(None, prec + 1)?;
            let span = self.expr_span(x).to(self.expr_span(y));
            x = self.alloc_expr(
                Expr::Binary {
                    left: x,
                    op,
                    right: y,
                },
                span,
            );
        }
        Ok(x)
    }

    fn parse_unary_expr(&mut self) -> PResult<ExprId> {
        self.nested(|p| {
            let start = p.start();
            let op = match p.tok() {
                Tok::Plus => UnaryOp::Pos,
                Tok::Minus => UnaryOp::Neg,
                Tok::Bang => UnaryOp::Not,
                Tok::Caret => UnaryOp::Xor,
                Tok::Amp => UnaryOp::Addr,
                Tok::Tilde => UnaryOp::Tilde,
                Tok::Star => UnaryOp::Deref,
                Tok::Arrow => {
                    let arrow = p.bump();
                    let x = p.parse_unary_expr()?;
                    return p.finish_receive(arrow, x);
                }
                _ => return p.parse_primary_expr(None),
            };
            p.bump();
            let x = p.parse_unary_expr()?;
            Ok(p.alloc_expr(Expr::Unary { op, expr: x }, p.finish(start)))
        })
    }

    /// `<-x` is a receive unless `x` is a channel type, in which case the
    /// arrow belongs to the type: `<-chan T`.
    fn finish_receive(&mut self, arrow: Span, x: ExprId) -> PResult<ExprId> {
        let span = arrow.to(self.expr_span(x));
        let Expr::Type(t) = self.arena.exprs[x] else {
            return Ok(self.alloc_expr(
                Expr::Unary {
                    op: UnaryOp::Recv,
                    expr: x,
                },
                span,
            ));
        };
        if !matches!(self.arena.types[t], Type::Chan { .. }) {
            return Ok(self.alloc_expr(
                Expr::Unary {
                    op: UnaryOp::Recv,
                    expr: x,
                },
                span,
            ));
        }

        // <-(chan T)   => (<-chan T)
        // <-(chan<- T) => (<-chan (<-T))
        let mut dir = ChanDir::Send;
        let mut cur = t;
        let mut last = t;
        while let Type::Chan { dir: cdir, elem } = self.arena.types[cur] {
            if cdir == ChanDir::Recv {
                let s = self.type_span(cur).start as usize;
                return Err(self.error_expected_at(Span::new(s, s + 2), "'chan'"));
            }
            self.arena.types[cur] = Type::Chan {
                dir: ChanDir::Recv,
                elem,
            };
            dir = cdir;
            last = cur;
            if dir != ChanDir::Send {
                break;
            }
            cur = elem;
        }
        if dir == ChanDir::Send {
            return Err(self.error_expected_at(self.type_span(last), "channel type"));
        }
        Ok(self.alloc_expr(Expr::Type(t), span))
    }

    fn parse_primary_expr(&mut self, x: Option<ExprId>) -> PResult<ExprId> {
        let mut x = match x {
            Some(x) => x,
            None => self.parse_operand()?,
        };
        let start = self.expr_span(x).start;
        loop {
            match self.tok() {
                Tok::Dot => {
                    self.bump();
                    match self.tok() {
                        Tok::Ident(_) => {
                            let sel = self.parse_ident()?;
                            x = self.alloc_expr(Expr::Selector { expr: x, sel }, self.finish(start));
                        }
                        Tok::LParen => x = self.parse_type_assertion(x, start)?,
                        _ => return Err(self.error_expected("selector or type assertion")),
                    }
                }
                Tok::LBrack => x = self.parse_index_or_slice(x, start)?,
                Tok::LParen => x = self.parse_call(x, start)?,
                Tok::LBrace => {
                    // composite literal or the block of a control clause
                    let mut t = x;
                    while let Expr::Paren(inner) = self.arena.exprs[t] {
                        t = inner;
                    }
                    let literal_type = match self.arena.exprs[t] {
                        Expr::Ident(_) | Expr::Selector { .. } | Expr::Index { .. } => {
                            self.expr_lev >= 0
                        }
                        Expr::Type(ty) => matches!(
                            self.arena.types[ty],
                            Type::Array { .. } | Type::Slice(_) | Type::Struct { .. } | Type::Map { .. }
                        ),
                        _ => false,
                    };
                    if !literal_type {
                        return Ok(x);
                    }
                    if t != x {
                        return Err(SyntaxError::new(
                            self.expr_span(t),
                            "cannot parenthesize type in composite literal",
                        ));
                    }
                    let lit = self.parse_literal_value()?;
                    x = self.alloc_expr(Expr::CompositeLit { typ: x, lit }, self.finish(start));
                }
                _ => return Ok(x),
            }
        }
    }

    fn parse_type_assertion(&mut self, x: ExprId, start: u32) -> PResult<ExprId> {
        self.expect(Tok::LParen)?;
        let typ = if self.eat(Tok::KwType).is_some() {
            None
        } else {
            Some(self.parse_type()?)
        };
        self.expect(Tok::RParen)?;
        Ok(self.alloc_expr(Expr::TypeAssert { expr: x, typ }, self.finish(start)))
    }

    fn parse_index_or_slice(&mut self, x: ExprId, start: u32) -> PResult<ExprId> {
        self.expect(Tok::LBrack)?;
        if self.at(Tok::RBrack) {
            return Err(self.error_expected("operand"));
        }

        self.expr_lev += 1;
        let mut index: [Option<ExprId>; 3] = [None; 3];
        let mut colons: [Span; 2] = [Span::default(); 2];
        let mut ncolons = 0usize;
        let mut args = Vec::new();

        if !self.at(Tok::Colon) {
            index[0] = Some(self.parse_rhs()?);
        }
        match self.tok() {
            Tok::Colon => {
                while self.at(Tok::Colon) && ncolons < colons.len() {
                    colons[ncolons] = self.bump();
                    ncolons += 1;
                    if !matches!(self.tok(), Tok::Colon | Tok::RBrack | Tok::Eof) {
                        index[ncolons] = Some(self.parse_rhs()?);
                    }
                }
            }
            Tok::Comma => {
                // instantiation: F[A, B]
                args.extend(index[0]);
                while self.eat(Tok::Comma).is_some() {
                    if !self.at(Tok::RBrack) && !self.at(Tok::Eof) {
                        let t = self.parse_type()?;
                        args.push(self.type_expr(t));
                    }
                }
            }
            _ => {}
        }
        self.expr_lev -= 1;
        self.expect(Tok::RBrack)?;

        if ncolons > 0 {
            let full = ncolons == 2;
            if full && index[1].is_none() {
                return Err(SyntaxError::new(
                    colons[0],
                    "middle index required in 3-index slice",
                ));
            }
            if full && index[2].is_none() {
                return Err(SyntaxError::new(
                    colons[1],
                    "final index required in 3-index slice",
                ));
            }
            return Ok(self.alloc_expr(
                Expr::Slice {
                    expr: x,
                    lo: index[0],
                    hi: index[1],
                    max: index[2],
                    full,
                },
                self.finish(start),
            ));
        }

        if args.is_empty() {
            args.extend(index[0]);
        }
        let indices = self.arena.list_exprs(args);
        Ok(self.alloc_expr(Expr::Index { expr: x, indices }, self.finish(start)))
    }

    fn parse_call(&mut self, func: ExprId, start: u32) -> PResult<ExprId> {
        self.expect(Tok::LParen)?;
        self.expr_lev += 1;
        let mut args = Vec::new();
        let mut ellipsis = false;
        while !self.at(Tok::RParen) && !self.at(Tok::Eof) && !ellipsis {
            // builtins take types: make([]int, n)
            args.push(self.parse_rhs()?);
            if self.eat(Tok::Ellipsis).is_some() {
                ellipsis = true;
            }
            if !self.at_comma("argument list", Tok::RParen)? {
                break;
            }
            self.bump();
        }
        self.expr_lev -= 1;
        self.expect_closing(Tok::RParen, "argument list")?;
        let args = self.arena.list_exprs(args);
        Ok(self.alloc_expr(
            Expr::Call {
                func,
                args,
                ellipsis,
            },
            self.finish(start),
        ))
    }

    fn parse_operand(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let kind = match self.tok() {
            Tok::Ident(_) => {
                let name = self.parse_ident()?;
                return Ok(self.ident_expr(name));
            }
            Tok::IntLit(_) => BasicLitKind::Int,
            Tok::FloatLit(_) => BasicLitKind::Float,
            Tok::ImagLit(_) => BasicLitKind::Imag,
            Tok::RuneLit(_) => BasicLitKind::Rune,
            Tok::StringLit(_) | Tok::RawStringLit(_) => BasicLitKind::String,
            Tok::LParen => {
                self.bump();
                self.expr_lev += 1;
                // types may be parenthesized: (*T)(x)
                let x = self.parse_rhs()?;
                self.expr_lev -= 1;
                self.expect(Tok::RParen)?;
                return Ok(self.alloc_expr(Expr::Paren(x), self.finish(start)));
            }
            Tok::KwFunc => return self.parse_func_type_or_lit(),
            _ => {
                return match self.try_ident_or_type()? {
                    Some(t) => Ok(self.type_expr(t)),
                    None => Err(self.error_expected("operand")),
                }
            }
        };
        let span = self.bump();
        Ok(self.alloc_expr(Expr::BasicLit(kind), span))
    }

    fn parse_func_type_or_lit(&mut self) -> PResult<ExprId> {
        let t = self.parse_func_type()?;
        let Type::Func(sig) = self.arena.types[t] else {
            return Ok(self.type_expr(t));
        };
        if !self.at(Tok::LBrace) {
            return Ok(self.type_expr(t));
        }
        self.expr_lev += 1;
        let body = self.parse_block()?;
        self.expr_lev -= 1;
        let start = self.type_span(t).start;
        Ok(self.alloc_expr(Expr::FuncLit { sig, body }, self.finish(start)))
    }

    fn parse_literal_value(&mut self) -> PResult<LiteralValue> {
        self.nested(|p| {
            p.expect(Tok::LBrace)?;
            p.expr_lev += 1;
            let mut elems = Vec::new();
            while !p.at(Tok::RBrace) && !p.at(Tok::Eof) {
                elems.push(p.parse_element()?);
                if !p.at_comma("composite literal", Tok::RBrace)? {
                    break;
                }
                p.bump();
            }
            p.expr_lev -= 1;
            p.expect_closing(Tok::RBrace, "composite literal")?;
            Ok(LiteralValue {
                elems: p.arena.list_keyed_elems(elems),
            })
        })
    }

    fn parse_element(&mut self) -> PResult<KeyedElement> {
        let x = self.parse_value()?;
        if self.eat(Tok::Colon).is_some() {
            let value = self.parse_value()?;
            return Ok(KeyedElement {
                key: Some(x),
                value,
            });
        }
        Ok(KeyedElement { key: None, value: x })
    }

    fn parse_value(&mut self) -> PResult<Element> {
        if self.at(Tok::LBrace) {
            return Ok(Element::Literal(self.parse_literal_value()?));
        }
        Ok(Element::Expr(self.parse_rhs()?))
    }
}

fn binary_op(t: Tok<'_>) -> Option<BinaryOp> {
    Some(match t {
        Tok::LOr => BinaryOp::LOr,
        Tok::LAnd => BinaryOp::LAnd,
        Tok::EqEq => BinaryOp::Eq,
        Tok::NotEq => BinaryOp::Ne,
        Tok::Lt => BinaryOp::Lt,
        Tok::Le => BinaryOp::Le,
        Tok::Gt => BinaryOp::Gt,
        Tok::Ge => BinaryOp::Ge,
        Tok::Plus => BinaryOp::Add,
        Tok::Minus => BinaryOp::Sub,
        Tok::Pipe => BinaryOp::Or,
        Tok::Caret => BinaryOp::Xor,
        Tok::Star => BinaryOp::Mul,
        Tok::Slash => BinaryOp::Div,
        Tok::Percent => BinaryOp::Mod,
        Tok::Shl => BinaryOp::Shl,
        Tok::Shr => BinaryOp::Shr,
        Tok::Amp => BinaryOp::And,
        Tok::AndNot => BinaryOp::AndNot,
        _ => return None,
    })
}

fn assign_op(t: Tok<'_>) -> Option<AssignOp> {
    Some(match t {
        Tok::Assign => AssignOp::Assign,
        Tok::AddAssign => AssignOp::AddAssign,
        Tok::SubAssign => AssignOp::SubAssign,
        Tok::MulAssign => AssignOp::MulAssign,
        Tok::DivAssign => AssignOp::DivAssign,
        Tok::ModAssign => AssignOp::ModAssign,
        Tok::AndAssign => AssignOp::AndAssign,
        Tok::OrAssign => AssignOp::OrAssign,
        Tok::XorAssign => AssignOp::XorAssign,
        Tok::ShlAssign => AssignOp::ShlAssign,
        Tok::ShrAssign => AssignOp::ShrAssign,
        Tok::AndNotAssign => AssignOp::AndNotAssign,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Output {
        let (result, lex_errors) = parse(src);
        assert!(lex_errors.is_empty(), "{lex_errors:?}");
        match result {
            Ok(out) => out,
            Err(err) => panic!("{src:?}: {err}"),
        }
    }

    fn parse_err(src: &str) -> String {
        match parse(src).0 {
            Ok(_) => panic!("{src:?} parsed"),
            Err(err) => err.message,
        }
    }

    fn only_type_spec(out: &Output) -> TypeSpec {
        let decls = out.arena.top_decls(out.file.decls);
        let TopLevelDecl::Decl(id) = decls[0] else {
            panic!("not a gen decl");
        };
        match out.arena.specs_list(out.arena.decls[id].specs)[0] {
            Spec::Type(spec) => spec,
            other => panic!("not a type spec: {other:?}"),
        }
    }

    #[test]
    fn type_parameters_versus_array_length() {
        let out = parse_ok("package p\ntype A[N]int\n");
        let spec = only_type_spec(&out);
        assert!(spec.type_params.is_empty());
        assert!(matches!(out.arena.types[spec.typ], Type::Array { .. }));

        let out = parse_ok("package p\ntype G[T any] struct{ v T }\n");
        let spec = only_type_spec(&out);
        assert_eq!(spec.type_params.len(), 1);
        assert!(matches!(out.arena.types[spec.typ], Type::Struct { .. }));

        let out = parse_ok("package p\ntype P[T *int,] struct{}\n");
        assert_eq!(only_type_spec(&out).type_params.len(), 1);

        let out = parse_ok("package p\ntype U[T ~int | string] []T\n");
        let spec = only_type_spec(&out);
        let decl = out.arena.type_param_decl_ids(spec.type_params)[0];
        let constraint = out.arena.type_param_decls[decl].constraint;
        assert!(matches!(out.arena.types[constraint], Type::Union { .. }));
    }

    #[test]
    fn alias_records_assign_position() {
        let out = parse_ok("package p\ntype A = map[string]int\n");
        assert!(only_type_spec(&out).is_alias());
    }

    #[test]
    fn parameter_names_group_by_type() {
        let out = parse_ok("package p\nfunc f(a, b int, c ...string) (x, y error) {}\n");
        let TopLevelDecl::Func(id) = out.arena.top_decls(out.file.decls)[0] else {
            panic!("not a func");
        };
        let sig = out.arena.signatures[out.arena.funcs[id].sig];
        let params = out.arena.fields_list(sig.params);
        assert_eq!(params.len(), 2);
        assert_eq!(out.arena.fields[params[0]].names.len(), 2);
        assert!(out.arena.fields[params[1]].ellipsis_pos.is_some());
        assert_eq!(out.arena.fields_list(sig.results).len(), 1);
    }

    #[test]
    fn composite_literal_in_control_clause_needs_parens() {
        parse_ok("package p\nfunc f() { if x == (T{}) {} }\n");
        parse_ok("package p\nfunc f() { for _, x := range []int{1} {} }\n");
        assert_eq!(
            parse_err("package p\nfunc f() { for _, x := range T{1} {} }\n"),
            "expected ';', found '{'"
        );
    }

    #[test]
    fn statements_cover_the_grammar() {
        parse_ok(
            r#"package p

func f(ch chan<- int, in <-chan int) (err error) {
	var x, y = 1, 2
	x, y = y, x
	x++
	ch <- x
	go g()
	defer func() { recover() }()
L:
	for i := 0; i < 10; i++ {
		switch {
		case i > 5:
			break L
		default:
			continue
		}
	}
	for k, v := range m {
		_, _ = k, v
	}
	for range in {
	}
	switch v := any(x).(type) {
	case int, []string:
		_ = v
	}
	select {
	case v, ok := <-in:
		_, _ = v, ok
	case ch <- 1:
	default:
	}
	if err := g(); err != nil {
		return err
	} else if x > 0 {
		goto L
	} else {
	}
	s := a[1:2:3]
	_ = s[:]
	_ = struct{ a int }{a: 1}
	_ = map[string][]int{"a": {1, 2}}
	_ = G[int, string]{}
	_ = (<-chan int)(nil)
	return
}
"#,
        );
    }

    #[test]
    fn errors_follow_go_parser_messages() {
        for (src, want) in [
            ("type T int", "expected 'package', found 'type'"),
            ("package p\n}", "expected declaration, found '}'"),
            ("package p\ntype T struct {\n\tA int\n", "expected '}', found 'EOF'"),
            ("package p\ntype T\n", "expected type, found newline"),
            ("package p\nvar x = f(1\n)\n", "missing ',' before newline in argument list"),
            ("package p\nvar _ = T{1\n}\n", "missing ',' before newline in composite literal"),
            ("package p\nfunc f(a int, b) {}\n", "missing parameter type"),
            ("package p\nfunc f(a, b ...int) {}\n", "can only use ... with final parameter"),
            ("package p\nfunc f() (...int) {}\n", "invalid use of ..."),
            ("package p\nfunc f[]() {}\n", "empty type parameter list"),
            ("package p\nfunc (r T) m[P any]() {}\n", "method must have no type parameters"),
            ("package p\nfunc f()\n{\n}\n", "unexpected semicolon or newline before {"),
            ("package p\nfunc f() { go (g()) }\n", "expression in go must not be parenthesized"),
            ("package p\nfunc f() { defer x }\n", "expression in defer must be function call"),
            ("package p\nfunc f() { if {} }\n", "missing condition in if statement"),
            ("package p\nfunc f() { if x\n{} }\n", "unexpected newline, expecting { after if clause"),
            (
                "package p\nfunc f() { if x := 1 {} }\n",
                "expected boolean expression, found assignment (missing parentheses around composite literal?)",
            ),
            ("package p\nfunc f() { _ = a[1::3] }\n", "middle index required in 3-index slice"),
            ("package p\nfunc f() { a, b }\n", "expected 1 expression"),
            ("package p\nfunc f() { a.b: }\n", "illegal label declaration"),
            ("package p\ntype T struct { *(U) }\n", "cannot parenthesize embedded type"),
            ("package p\ntype T interface { m[P any]() }\n", "interface method must have no type parameters"),
            ("package p\nvar x int\nimport \"fmt\"\n", "imports must appear before other declarations"),
            ("package p\nimport fmt\n", "missing import path"),
            ("package p\nvar x = a[]\n", "expected operand, found ']'"),
        ] {
            assert_eq!(parse_err(src), want, "{src:?}");
        }
    }

    #[test]
    fn deep_nesting_is_an_error_not_a_crash() {
        let src = format!("package p\nvar x = {}1{}\n", "(".repeat(1000), ")".repeat(1000));
        assert_eq!(parse_err(&src), "exceeded max nesting depth");
    }

    #[test]
    fn long_operator_chains_count_as_nesting() {
        let src = format!("package p\nvar s = \"a\"{}\n", " + \"b\"".repeat(4000));
        assert_eq!(parse_err(&src), "exceeded max nesting depth");

        let src = format!("package p\nvar s = \"a\"{}\n", " + \"b\"".repeat(100));
        parse_ok(&src);
    }
}
