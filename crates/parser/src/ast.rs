//! # Go syntax tree
//!
//! Arena-allocated syntax tree for Go source files.
//!
//! - **Nodes** live in typed arenas (`SpannedArena<T>`) and are referenced by `Id<T>`.
//! - **Lists** are slices of central buffers, referenced by `ListRef<T>`.
//! - **Spans** are kept in side tables next to the nodes, as byte offsets.
//! - **Identifiers** are interned (`Interner`, `Symbol`).
//!
//! Expressions and types are separate node kinds. A type literal used as an
//! operand (`[]byte(s)`, `map[string]int{}`) is wrapped in [`Expr::Type`];
//! a type argument that was only recognisable as an expression when it was
//! parsed (`Vec[N]` in a field list) is wrapped in [`Type::Expr`].
//!
//! Walk/Visitor infrastructure lives in `crate::walk`; `#[derive(WalkAst)]`
//! generates the `Walk` impls used here.

use ast_derive::WalkAst;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut, Range};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};

// =============================================================================
// Core Foundation Types
// =============================================================================

/// Byte range `[start, end)` in the source text.
///
/// Offsets are `u32`; larger inputs are clamped to `u32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: clamp_offset(start),
            end: clamp_offset(end),
        }
    }

    #[inline]
    pub fn from_range(r: Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }

    #[inline]
    pub fn empty_at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Span from the start of `self` to the end of `other`.
    #[inline]
    pub const fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

#[inline]
fn clamp_offset(x: usize) -> u32 {
    u32::try_from(x).unwrap_or(u32::MAX)
}

/// Type-safe identifier for arena-allocated nodes.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }
}

/// Typed reference into a central list buffer of [`AstArena`].
#[derive(Debug, PartialEq, Eq)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    fn range(&self) -> Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

// =============================================================================
// Symbol Interning
// =============================================================================

/// Interned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

impl Symbol {
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identifier occurrence: interned name plus its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct IdentName {
    pub sym: Symbol,
    pub pos: Span,
}

/// Identity hasher for precomputed `u64` hashes.
#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, _b: &[u8]) {
        unreachable!("U64IdentityHasher only supports write_u64")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

/// String interner: each distinct identifier is stored once, keyed by a
/// seeded hash with a small collision bucket.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

impl Interner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.state.hash_one(s);
        let entry = self.buckets.entry(h).or_default();

        if let Some(&sym) = entry
            .iter()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
        {
            return sym;
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        entry.push(sym);
        sym
    }

    /// Text of an interned symbol. Symbols from another interner are a bug.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Arena Allocation
// =============================================================================

/// Nodes and their spans in parallel vectors.
#[derive(Debug)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        self.spans.push(span);
        id
    }

    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.to_usize()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }
}

impl<T> IndexMut<Id<T>> for SpannedArena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }
}

pub type DeclId = Id<Decl>;
pub type FuncDeclId = Id<FuncDecl>;
pub type StmtId = Id<Stmt>;
pub type SimpleStmtId = Id<SimpleStmt>;
pub type ExprId = Id<Expr>;
pub type TypeId = Id<Type>;
pub type FieldId = Id<Field>;
pub type SignatureId = Id<Signature>;
pub type SwitchClauseId = Id<SwitchClause>;
pub type CommClauseId = Id<CommClause>;
pub type TypeParamDeclId = Id<TypeParamDecl>;

// =============================================================================
// Central list storage
// =============================================================================

macro_rules! list_buffers {
    ($($field:ident: $t:ty => $push:ident, $get:ident;)*) => {
        /// Buffers that every `ListRef<T>` points into.
        #[derive(Debug, Default)]
        pub struct ExtraData {
            $(pub $field: Vec<$t>,)*
        }

        impl AstArena {
            $(
                pub fn $push(&mut self, items: impl IntoIterator<Item = $t>) -> ListRef<$t> {
                    let start = self.extras.$field.len();
                    self.extras.$field.extend(items);
                    let len = self.extras.$field.len() - start;
                    ListRef::new(start as u32, len as u32)
                }

                #[inline]
                pub fn $get(&self, r: ListRef<$t>) -> &[$t] {
                    &self.extras.$field[r.range()]
                }
            )*
        }

        $(
            impl crate::walk::ListSlice<$t> for AstArena {
                #[inline]
                fn slice(&self, r: ListRef<$t>) -> &[$t] {
                    self.$get(r)
                }
            }
        )*
    };
}

list_buffers! {
    ident_names: IdentName => list_ident_names, ident_names;
    exprs: ExprId => list_exprs, exprs_list;
    stmts: StmtId => list_stmts, stmts_list;
    types: TypeId => list_types, types_list;
    fields: FieldId => list_fields, fields_list;
    specs: Spec => list_specs, specs_list;
    keyed_elems: KeyedElement => list_keyed_elems, keyed_elems_list;
    top_decls: TopLevelDecl => list_top_decls, top_decls;
    switch_clauses: SwitchClauseId => list_switch_clauses, switch_clause_ids;
    comm_clauses: CommClauseId => list_comm_clauses, comm_clause_ids;
    type_terms: TypeTerm => list_type_terms, type_terms;
    interface_elems: InterfaceElem => list_interface_elems, interface_elems;
    type_param_decls: TypeParamDeclId => list_type_param_decls, type_param_decl_ids;
}

// =============================================================================
// Main AST Arena
// =============================================================================

/// All nodes of one parsed file.
#[derive(Debug, Default)]
pub struct AstArena {
    pub decls: SpannedArena<Decl>,
    pub funcs: SpannedArena<FuncDecl>,
    pub stmts: SpannedArena<Stmt>,
    pub simple_stmts: SpannedArena<SimpleStmt>,
    pub exprs: SpannedArena<Expr>,
    pub types: SpannedArena<Type>,
    pub signatures: SpannedArena<Signature>,
    pub fields: SpannedArena<Field>,
    pub switch_clauses: SpannedArena<SwitchClause>,
    pub comm_clauses: SpannedArena<CommClause>,
    pub type_param_decls: SpannedArena<TypeParamDecl>,
    pub extras: ExtraData,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// Source File and Declarations
// =============================================================================

/// `SourceFile = PackageClause ";" { ImportDecl ";" } { TopLevelDecl ";" }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct SourceFile {
    pub package_pos: Span,
    pub name: IdentName,
    pub decls: ListRef<TopLevelDecl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum TopLevelDecl {
    Decl(DeclId),
    Func(FuncDeclId),
}

/// `import`, `const`, `type` or `var` declaration, grouped or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Decl {
    pub kind: DeclKind,
    pub kw_pos: Span,
    pub specs: ListRef<Spec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Import,
    Const,
    Type,
    Var,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ImportSpec {
    pub name: Option<ImportName>,
    /// Span of the path string literal, quotes included.
    pub path: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ImportName {
    Dot(Span),
    Name(IdentName),
}

/// Const or var spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ValueSpec {
    pub names: ListRef<IdentName>,
    pub typ: Option<TypeId>,
    pub values: ListRef<ExprId>,
}

/// `TypeSpec = AliasDecl | TypeDef`. Not derived: walking a spec goes
/// through [`crate::walk::Visitor::visit_type_spec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: IdentName,
    pub type_params: ListRef<TypeParamDeclId>,
    /// Position of `=` for aliases.
    pub assign_pos: Option<Span>,
    pub typ: TypeId,
}

impl TypeSpec {
    #[inline]
    pub fn is_alias(&self) -> bool {
        self.assign_pos.is_some()
    }

    /// From the declared name to the end of the type, like `ast.TypeSpec`.
    #[inline]
    pub fn span(&self, a: &AstArena) -> Span {
        self.name.pos.to(a.types.span(self.typ))
    }
}

/// Function or method declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FuncDecl {
    pub func_pos: Span,
    pub recv: Option<ListRef<FieldId>>,
    pub name: IdentName,
    pub type_params: ListRef<TypeParamDeclId>,
    pub sig: SignatureId,
    pub body: Option<Block>,
}

/// `P, Q constraint` inside a type parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeParamDecl {
    pub names: ListRef<IdentName>,
    pub constraint: TypeId,
}

// =============================================================================
// Signatures and Fields
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Signature {
    pub params: ListRef<FieldId>,
    pub results: ListRef<FieldId>,
}

/// Parameter, result or struct field. Names are empty for embedded fields
/// and unnamed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Field {
    pub names: ListRef<IdentName>,
    pub ellipsis_pos: Option<Span>,
    pub typ: TypeId,
    /// Struct tag literal, verbatim.
    pub tag: Option<Span>,
}

impl Field {
    #[inline]
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum SimpleStmt {
    Empty,
    Expr(ExprId),
    Send {
        chan: ExprId,
        value: ExprId,
    },
    IncDec {
        expr: ExprId,
        op: IncDecOp,
    },
    Assign {
        lhs: ListRef<ExprId>,
        op: AssignOp,
        rhs: ListRef<ExprId>,
    },
    ShortVarDecl {
        lhs: ListRef<ExprId>,
        rhs: ListRef<ExprId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Stmt {
    Simple(SimpleStmtId),
    Decl(DeclId),
    Labeled {
        label: IdentName,
        stmt: StmtId,
    },
    Go(ExprId),
    Defer(ExprId),
    Return(ListRef<ExprId>),
    Branch {
        kind: BranchKind,
        label: Option<IdentName>,
    },
    Block(Block),
    If {
        init: Option<SimpleStmtId>,
        cond: ExprId,
        then: Block,
        els: Option<StmtId>,
    },
    For {
        kind: ForKind,
        body: Block,
    },
    Switch {
        init: Option<SimpleStmtId>,
        tag: Option<ExprId>,
        clauses: ListRef<SwitchClauseId>,
    },
    /// `switch [init;] [bind :=] subject.(type) { ... }`
    TypeSwitch {
        init: Option<SimpleStmtId>,
        bind: Option<ExprId>,
        subject: ExprId,
        clauses: ListRef<SwitchClauseId>,
    },
    Select {
        clauses: ListRef<CommClauseId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ForKind {
    Infinite,
    Cond(ExprId),
    Clause {
        init: Option<SimpleStmtId>,
        cond: Option<ExprId>,
        post: Option<SimpleStmtId>,
    },
    /// `for [lhs (:= | =)] range expr`
    Range {
        lhs: ListRef<ExprId>,
        define: bool,
        expr: ExprId,
    },
}

/// `case a, b:` or `default:` (when `list` is `None`). Type switch cases
/// hold their types as [`Expr::Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct SwitchClause {
    pub list: Option<ListRef<ExprId>>,
    pub body: ListRef<StmtId>,
}

/// Select clause; `comm` is `None` for `default:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct CommClause {
    pub comm: Option<SimpleStmtId>,
    pub body: ListRef<StmtId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Block {
    pub stmts: ListRef<StmtId>,
}

// =============================================================================
// Expressions
// =============================================================================

/// `"{" [ ElementList [ "," ] ] "}"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct LiteralValue {
    pub elems: ListRef<KeyedElement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct KeyedElement {
    pub key: Option<Element>,
    pub value: Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Element {
    Expr(ExprId),
    Literal(LiteralValue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Expr {
    Ident(Symbol),
    /// Text is the node's span.
    BasicLit(BasicLitKind),
    FuncLit {
        sig: SignatureId,
        body: Block,
    },
    /// `T{...}`. Elided types inside another literal are [`Element::Literal`].
    CompositeLit {
        typ: ExprId,
        lit: LiteralValue,
    },
    Paren(ExprId),
    Selector {
        expr: ExprId,
        sel: IdentName,
    },
    /// Indexing or generic instantiation: `a[i]`, `F[int, string]`.
    Index {
        expr: ExprId,
        indices: ListRef<ExprId>,
    },
    Slice {
        expr: ExprId,
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        max: Option<ExprId>,
        full: bool,
    },
    /// `x.(T)`, or `x.(type)` when `typ` is `None`.
    TypeAssert {
        expr: ExprId,
        typ: Option<TypeId>,
    },
    Call {
        func: ExprId,
        args: ListRef<ExprId>,
        ellipsis: bool,
    },
    Unary {
        op: UnaryOp,
        expr: ExprId,
    },
    Binary {
        left: ExprId,
        op: BinaryOp,
        right: ExprId,
    },
    /// Type literal in operand position.
    Type(TypeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicLitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Type {
    /// `Name`, `pkg.Name`, `Name[A, B]`
    Named {
        pkg: Option<IdentName>,
        name: IdentName,
        args: ListRef<TypeId>,
    },
    Pointer(TypeId),
    Array {
        len: ArrayLen,
        elem: TypeId,
    },
    Slice(TypeId),
    Map {
        key: TypeId,
        value: TypeId,
    },
    Chan {
        dir: ChanDir,
        elem: TypeId,
    },
    Struct {
        fields: ListRef<FieldId>,
    },
    Interface {
        elems: ListRef<InterfaceElem>,
    },
    Func(SignatureId),
    Paren(TypeId),
    /// Type set: `~int | string`, or a single `~T`.
    Union {
        terms: ListRef<TypeTerm>,
    },
    /// Type argument that parsed as an ordinary expression.
    Expr(ExprId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ArrayLen {
    Expr(ExprId),
    /// `[...]T`
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeTerm {
    pub tilde: bool,
    pub typ: TypeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum InterfaceElem {
    Method { name: IdentName, sig: SignatureId },
    /// Embedded interface or type set.
    Embed(TypeId),
}

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,   // +
    Neg,   // -
    Not,   // !
    Xor,   // ^
    Deref, // *
    Addr,  // &
    Recv,  // <-
    Tilde, // ~
}

impl UnaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pos => "+",
            Self::Neg => "-",
            Self::Not => "!",
            Self::Xor => "^",
            Self::Deref => "*",
            Self::Addr => "&",
            Self::Recv => "<-",
            Self::Tilde => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Mod,    // %
    And,    // &
    Or,     // |
    Xor,    // ^
    Shl,    // <<
    Shr,    // >>
    AndNot, // &^
    LAnd,   // &&
    LOr,    // ||
    Eq,     // ==
    Ne,     // !=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
}

impl BinaryOp {
    /// Go operator precedence, 1 (`||`) through 5 (`*`).
    pub const fn precedence(self) -> u8 {
        match self {
            Self::LOr => 1,
            Self::LAnd => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            Self::Mul | Self::Div | Self::Mod | Self::Shl | Self::Shr | Self::And | Self::AndNot => {
                5
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::AndNot => "&^",
            Self::LAnd => "&&",
            Self::LOr => "||",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,       // =
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    DivAssign,    // /=
    ModAssign,    // %=
    AndAssign,    // &=
    OrAssign,     // |=
    XorAssign,    // ^=
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    AndNotAssign, // &^=
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Inc,
    Dec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interner_dedups() {
        let mut i = Interner::new();
        let a = i.intern("Point");
        let b = i.intern("point");
        assert_ne!(a, b);
        assert_eq!(i.intern("Point"), a);
        assert_eq!(i.resolve(b), "point");
        assert_eq!(i.len(), 2);
    }

    #[test]
    fn span_helpers() {
        let s = Span::new(3, 9).to(Span::new(12, 20));
        assert_eq!(s, Span { start: 3, end: 20 });
        assert_eq!(s.len(), 17);
        assert!(Span::empty_at(4).is_empty());
        assert_eq!(Span::new(usize::MAX, 0).start, u32::MAX);
    }

    #[test]
    fn lists_are_contiguous_slices() {
        let mut a = AstArena::new();
        let x = a.exprs.alloc(Expr::BasicLit(BasicLitKind::Int), Span::new(0, 1));
        let y = a.exprs.alloc(Expr::BasicLit(BasicLitKind::Int), Span::new(2, 3));
        let first = a.list_exprs([x]);
        let second = a.list_exprs([y, x]);
        assert_eq!(a.exprs_list(first), &[x]);
        assert_eq!(a.exprs_list(second), &[y, x]);
        assert!(a.exprs_list(ListRef::EMPTY).is_empty());
    }
}
