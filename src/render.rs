//! One-line Go source for type expressions.
//!
//! Expressions follow `go/printer` for a node printed on its own: the
//! precedence-driven blank rules for binary expressions, collapsed double
//! parentheses, unparenthesized single results. Struct and interface bodies
//! differ from `go/printer`, which breaks a body over several lines unless it
//! has a single untagged member. Here a body is always one line, members
//! separated by `"; "`, so it fits a parameter list. Literals are copied
//! verbatim from the source.

use go_syntax::ast::*;
use go_syntax::ParsedFile;

/// Printed in place of a type that cannot be rendered.
pub const FALLBACK: &str = "interface{}";

const LOWEST_PREC: u8 = 0;
const UNARY_PREC: u8 = 6;
const HIGHEST_PREC: u8 = 7;

/// Renders `ty`, or [`FALLBACK`] if it contains a function literal.
pub fn render(file: &ParsedFile<'_>, ty: TypeId) -> String {
    let mut p = Printer::new(file);
    match p.typ(ty) {
        Ok(()) => p.out,
        Err(Unprintable) => FALLBACK.to_owned(),
    }
}

/// A node with no one-line form.
#[derive(Debug)]
struct Unprintable;

type PrintResult = Result<(), Unprintable>;

struct Printer<'a, 'src> {
    file: &'a ParsedFile<'src>,
    a: &'a AstArena,
    out: String,
    /// Last operator token written, for separating `- -x` and `a / *p`.
    last_op: Option<&'static str>,
}

impl<'a, 'src> Printer<'a, 'src> {
    fn new(file: &'a ParsedFile<'src>) -> Self {
        Self {
            file,
            a: &file.arena,
            out: String::new(),
            last_op: None,
        }
    }

    fn word(&mut self, s: &str) {
        self.out.push_str(s);
        self.last_op = None;
    }

    fn blank(&mut self) {
        self.word(" ");
    }

    fn op(&mut self, s: &'static str) {
        if let Some(prev) = self.last_op {
            if may_combine(prev, s) {
                self.out.push(' ');
            }
        }
        self.out.push_str(s);
        self.last_op = Some(s);
    }

    fn ident(&mut self, name: IdentName) {
        let file = self.file;
        self.word(file.name(name.sym));
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn typ(&mut self, id: TypeId) -> PrintResult {
        match self.a.types[id] {
            Type::Named { pkg, name, args } => {
                if let Some(pkg) = pkg {
                    self.ident(pkg);
                    self.word(".");
                }
                self.ident(name);
                if !args.is_empty() {
                    self.word("[");
                    for (i, &arg) in self.a.types_list(args).iter().enumerate() {
                        if i > 0 {
                            self.word(", ");
                        }
                        self.typ(arg)?;
                    }
                    self.word("]");
                }
            }
            Type::Pointer(elem) => {
                self.op("*");
                self.typ(elem)?;
            }
            Type::Array { len, elem } => {
                self.word("[");
                match len {
                    ArrayLen::Expr(x) => self.expr(x)?,
                    ArrayLen::Ellipsis => self.word("..."),
                }
                self.word("]");
                self.typ(elem)?;
            }
            Type::Slice(elem) => {
                self.word("[]");
                self.typ(elem)?;
            }
            Type::Map { key, value } => {
                self.word("map[");
                self.typ(key)?;
                self.word("]");
                self.typ(value)?;
            }
            Type::Chan { dir, elem } => {
                match dir {
                    ChanDir::Both => self.word("chan"),
                    ChanDir::Recv => self.word("<-chan"),
                    ChanDir::Send => self.word("chan<-"),
                }
                self.blank();
                self.typ(elem)?;
            }
            Type::Struct { fields } => {
                self.word("struct{");
                self.members(fields.is_empty(), |p| {
                    for (i, &id) in p.a.fields_list(fields).iter().enumerate() {
                        if i > 0 {
                            p.word("; ");
                        }
                        p.struct_field(id)?;
                    }
                    Ok(())
                })?;
                self.word("}");
            }
            Type::Interface { elems } => {
                self.word("interface{");
                self.members(elems.is_empty(), |p| {
                    for (i, &elem) in p.a.interface_elems(elems).iter().enumerate() {
                        if i > 0 {
                            p.word("; ");
                        }
                        match elem {
                            InterfaceElem::Method { name, sig } => {
                                p.ident(name);
                                p.signature(sig)?;
                            }
                            InterfaceElem::Embed(t) => p.typ(t)?,
                        }
                    }
                    Ok(())
                })?;
                self.word("}");
            }
            Type::Func(sig) => {
                self.word("func");
                self.signature(sig)?;
            }
            Type::Paren(inner) => {
                if matches!(self.a.types[inner], Type::Paren(_)) {
                    self.typ(inner)?;
                } else {
                    self.word("(");
                    self.typ(inner)?;
                    self.word(")");
                }
            }
            Type::Union { terms } => {
                for (i, term) in self.a.type_terms(terms).iter().enumerate() {
                    if i > 0 {
                        self.word(" | ");
                    }
                    if term.tilde {
                        self.op("~");
                    }
                    self.typ(term.typ)?;
                }
            }
            Type::Expr(x) => self.expr(x)?,
        }
        Ok(())
    }

    /// `{ ... }` contents; nothing between the braces when empty.
    fn members(&mut self, empty: bool, f: impl FnOnce(&mut Self) -> PrintResult) -> PrintResult {
        if empty {
            return Ok(());
        }
        self.blank();
        f(self)?;
        self.blank();
        Ok(())
    }

    fn struct_field(&mut self, id: FieldId) -> PrintResult {
        let field = self.a.fields[id];
        if !field.names.is_empty() {
            self.names(field.names);
            self.blank();
        }
        self.typ(field.typ)?;
        if let Some(tag) = field.tag {
            self.blank();
            self.word(self.file.text(tag));
        }
        Ok(())
    }

    fn names(&mut self, names: ListRef<IdentName>) {
        for (i, &name) in self.a.ident_names(names).iter().enumerate() {
            if i > 0 {
                self.word(", ");
            }
            self.ident(name);
        }
    }

    /// Parameters and results, without the `func` keyword.
    fn signature(&mut self, id: SignatureId) -> PrintResult {
        let sig = self.a.signatures[id];
        self.parameters(sig.params)?;

        let results = self.a.fields_list(sig.results);
        let count: u32 = results
            .iter()
            .map(|&r| self.a.fields[r].names.len().max(1))
            .sum();
        if count == 0 {
            return Ok(());
        }
        self.blank();
        if let [only] = results {
            let field = self.a.fields[*only];
            if field.names.is_empty() {
                return self.typ(self.strip_parens(field.typ));
            }
        }
        self.parameters(sig.results)
    }

    fn parameters(&mut self, fields: ListRef<FieldId>) -> PrintResult {
        self.word("(");
        for (i, &id) in self.a.fields_list(fields).iter().enumerate() {
            if i > 0 {
                self.word(", ");
            }
            let field = self.a.fields[id];
            if !field.names.is_empty() {
                self.names(field.names);
                self.blank();
            }
            if field.ellipsis_pos.is_some() {
                self.word("...");
            }
            self.typ(field.typ)?;
        }
        self.word(")");
        Ok(())
    }

    fn strip_parens(&self, mut id: TypeId) -> TypeId {
        while let Type::Paren(inner) = self.a.types[id] {
            id = inner;
        }
        id
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    #[inline]
    fn expr(&mut self, x: ExprId) -> PrintResult {
        self.expr1(x, LOWEST_PREC, 1)
    }

    #[inline]
    fn expr0(&mut self, x: ExprId, depth: u32) -> PrintResult {
        self.expr1(x, LOWEST_PREC, depth)
    }

    fn expr1(&mut self, x: ExprId, prec1: u8, depth: u32) -> PrintResult {
        match self.a.exprs[x] {
            Expr::Ident(sym) => {
                let file = self.file;
                self.word(file.name(sym));
            }
            Expr::BasicLit(_) => {
                let span = self.a.exprs.span(x);
                self.word(self.file.text(span));
            }
            Expr::FuncLit { .. } => return Err(Unprintable),
            Expr::CompositeLit { typ, lit } => {
                self.expr1(typ, HIGHEST_PREC, depth)?;
                self.literal_value(lit)?;
            }
            Expr::Paren(inner) => {
                if matches!(self.a.exprs[inner], Expr::Paren(_)) {
                    self.expr0(inner, depth)?;
                } else {
                    self.word("(");
                    self.expr0(inner, reduce_depth(depth))?;
                    self.word(")");
                }
            }
            Expr::Selector { expr, sel } => {
                self.expr1(expr, HIGHEST_PREC, depth)?;
                self.word(".");
                self.ident(sel);
            }
            Expr::Index { expr, indices } => {
                self.expr1(expr, HIGHEST_PREC, 1)?;
                self.word("[");
                self.expr_list(self.a.exprs_list(indices), depth + 1)?;
                self.word("]");
            }
            Expr::Slice {
                expr, lo, hi, max, ..
            } => self.slice_expr(expr, [lo, hi, max], max.is_some(), depth)?,
            Expr::TypeAssert { expr, typ } => {
                self.expr1(expr, HIGHEST_PREC, depth)?;
                self.word(".(");
                match typ {
                    Some(t) => self.typ(t)?,
                    None => self.word("type"),
                }
                self.word(")");
            }
            Expr::Call {
                func,
                args,
                ellipsis,
            } => {
                let args = self.a.exprs_list(args);
                let depth = if args.len() > 1 { depth + 1 } else { depth };
                // conversions to func and <-chan types need parentheses
                let paren = match self.a.exprs[func] {
                    Expr::Type(t) => matches!(
                        self.a.types[t],
                        Type::Func(_) | Type::Chan { dir: ChanDir::Recv, .. }
                    ),
                    _ => false,
                };
                if paren {
                    self.word("(");
                }
                self.expr1(func, HIGHEST_PREC, depth)?;
                if paren {
                    self.word(")");
                }
                self.word("(");
                self.expr_list(args, depth)?;
                if ellipsis {
                    self.word("...");
                }
                self.word(")");
            }
            Expr::Unary { op, expr } => {
                if UNARY_PREC < prec1 {
                    self.word("(");
                    self.expr(x)?;
                    self.word(")");
                } else {
                    self.op(op.as_str());
                    self.expr1(expr, UNARY_PREC, depth)?;
                }
            }
            Expr::Binary { .. } => {
                let cutoff = cutoff(self.a, x, depth.max(1));
                self.binary_expr(x, prec1, cutoff, depth.max(1))?;
            }
            Expr::Type(t) => self.typ(t)?,
        }
        Ok(())
    }

    fn binary_expr(&mut self, x: ExprId, prec1: u8, cutoff: u8, depth: u32) -> PrintResult {
        let Expr::Binary { left, op, right } = self.a.exprs[x] else {
            return self.expr1(x, prec1, depth);
        };
        let prec = op.precedence();
        if prec < prec1 {
            self.word("(");
            self.expr0(x, reduce_depth(depth))?;
            self.word(")");
            return Ok(());
        }
        let blanks = prec < cutoff;
        self.expr1(left, prec, depth + diff_prec(self.a, left, prec))?;
        if blanks {
            self.blank();
        }
        self.op(op.as_str());
        if blanks {
            self.blank();
        }
        self.expr1(right, prec + 1, depth + 1)
    }

    fn slice_expr(
        &mut self,
        x: ExprId,
        indices: [Option<ExprId>; 3],
        full: bool,
        depth: u32,
    ) -> PrintResult {
        self.expr1(x, HIGHEST_PREC, 1)?;
        self.word("[");
        let indices = if full { &indices[..] } else { &indices[..2] };
        // blanks around ':' when several indices include a binary expression
        let blanks = depth <= 1
            && indices.iter().flatten().count() > 1
            && indices
                .iter()
                .flatten()
                .any(|&i| matches!(self.a.exprs[i], Expr::Binary { .. }));
        for (i, index) in indices.iter().enumerate() {
            if i > 0 {
                if indices[i - 1].is_some() && blanks {
                    self.blank();
                }
                self.word(":");
                if index.is_some() && blanks {
                    self.blank();
                }
            }
            if let Some(index) = *index {
                self.expr0(index, depth + 1)?;
            }
        }
        self.word("]");
        Ok(())
    }

    fn expr_list(&mut self, list: &[ExprId], depth: u32) -> PrintResult {
        for (i, &x) in list.iter().enumerate() {
            if i > 0 {
                self.word(", ");
            }
            self.expr0(x, depth)?;
        }
        Ok(())
    }

    fn literal_value(&mut self, lit: LiteralValue) -> PrintResult {
        self.word("{");
        for (i, elem) in self.a.keyed_elems_list(lit.elems).iter().enumerate() {
            if i > 0 {
                self.word(", ");
            }
            if let Some(key) = elem.key {
                self.element(key)?;
                self.word(": ");
            }
            self.element(elem.value)?;
        }
        self.word("}");
        Ok(())
    }

    fn element(&mut self, elem: Element) -> PrintResult {
        match elem {
            Element::Expr(x) => self.expr0(x, 1),
            Element::Literal(lit) => self.literal_value(lit),
        }
    }
}

#[inline]
fn reduce_depth(depth: u32) -> u32 {
    depth.saturating_sub(1).max(1)
}

/// 0 when `x` is a binary expression at precedence `prec`, 1 otherwise.
fn diff_prec(a: &AstArena, x: ExprId, prec: u8) -> u32 {
    match a.exprs[x] {
        Expr::Binary { op, .. } if op.precedence() == prec => 0,
        _ => 1,
    }
}

/// Precedence below which operators of `x` get surrounding blanks.
fn cutoff(a: &AstArena, x: ExprId, depth: u32) -> u8 {
    let (has4, has5, max_problem) = walk_binary(a, x);
    if max_problem > 0 {
        return max_problem + 1;
    }
    match (has4 && has5, depth == 1) {
        (true, true) => 5,
        (true, false) => 4,
        (false, true) => 6,
        (false, false) => 4,
    }
}

/// Which precedence levels occur in the binary tree at `x`, and the highest
/// level whose operator would fuse with a following unary operator.
fn walk_binary(a: &AstArena, x: ExprId) -> (bool, bool, u8) {
    let Expr::Binary { left, op, right } = a.exprs[x] else {
        return (false, false, 0);
    };
    let prec = op.precedence();
    let mut has4 = prec == 4;
    let mut has5 = prec == 5;
    let mut max_problem = 0;

    if let Expr::Binary { op: l, .. } = a.exprs[left] {
        if l.precedence() >= prec {
            let (h4, h5, mp) = walk_binary(a, left);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(mp);
        }
    }
    match a.exprs[right] {
        Expr::Binary { op: r, .. } if r.precedence() > prec => {
            let (h4, h5, mp) = walk_binary(a, right);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(mp);
        }
        Expr::Unary { op: r, .. } => match (op.as_str(), r.as_str()) {
            ("/", "*") | ("&", "&") | ("&", "^") => max_problem = 5,
            ("+", "+") | ("-", "-") => max_problem = max_problem.max(4),
            _ => {}
        },
        _ => {}
    }
    (has4, has5, max_problem)
}

/// Adjacent tokens that would lex as a different token.
fn may_combine(prev: &str, next: &str) -> bool {
    let Some(c) = next.chars().next() else {
        return false;
    };
    match prev {
        "+" => c == '+',
        "-" => c == '-',
        "/" => c == '*',
        "<" => c == '-' || c == '<',
        "&" => c == '&' || c == '^',
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::{locate, Shape};
    use go_syntax::parse_source;
    use pretty_assertions::assert_eq;

    /// Renders the type of field `F` in `type T struct { F <ty> }`.
    fn rendered(ty: &str) -> String {
        let src = format!("package p\n\ntype T struct {{\n\tF {ty}\n}}\n");
        let file = parse_source(&src).unwrap_or_else(|e| panic!("{ty}: {e}"));
        let Shape::Aggregate { fields } = locate(&file, 3).unwrap().shape else {
            panic!("not a struct");
        };
        render(&file, fields[0].ty)
    }

    #[track_caller]
    fn check(cases: &[(&str, &str)]) {
        for &(src, want) in cases {
            assert_eq!(rendered(src), want, "{src}");
        }
    }

    #[test]
    fn named_and_composite_types() {
        check(&[
            ("int", "int"),
            ("pkg.Name", "pkg.Name"),
            ("List[T]", "List[T]"),
            ("Map[K,V]", "Map[K, V]"),
            ("Pair[string, []int]", "Pair[string, []int]"),
            ("* T", "*T"),
            ("[ ]string", "[]string"),
            ("[4]int", "[4]int"),
            ("map[string] []int", "map[string][]int"),
            ("chan int", "chan int"),
            ("<-chan int", "<-chan int"),
            ("chan<- int", "chan<- int"),
            ("chan (<-chan int)", "chan (<-chan int)"),
        ]);
    }

    #[test]
    fn function_types() {
        check(&[
            (
                "func(a, b int, rest ...string) (int, error)",
                "func(a, b int, rest ...string) (int, error)",
            ),
            ("func(int,string)", "func(int, string)"),
            ("func() (error)", "func() error"),
            ("func() (n int)", "func() (n int)"),
            ("func()", "func()"),
        ]);
    }

    #[test]
    fn struct_and_interface_bodies_stay_on_one_line() {
        check(&[
            ("struct{}", "struct{}"),
            ("struct {\n\t\tA int\n\t\tB string\n\t}", "struct{ A int; B string }"),
            (
                "interface {\n\t\tLen() int\n\t\tio.Closer\n\t}",
                "interface{ Len() int; io.Closer }",
            ),
            (
                r#"struct{ A, B int; io.Reader; C string "tag" }"#,
                r#"struct{ A, B int; io.Reader; C string "tag" }"#,
            ),
            ("struct{ X int `json:\"x\"` }", "struct{ X int `json:\"x\"` }"),
            ("interface{}", "interface{}"),
            (
                "interface{ Read(p []byte) (n int, err error); ~int | ~string }",
                "interface{ Read(p []byte) (n int, err error); ~int | ~string }",
            ),
        ]);
    }

    #[test]
    fn parentheses() {
        check(&[("(T)", "(T)"), ("((T))", "(T)"), ("*(T)", "*(T)")]);
    }

    #[test]
    fn array_lengths_follow_gofmt_spacing() {
        check(&[
            ("[N*2]int", "[N * 2]int"),
            ("[a+b*c]int", "[a + b*c]int"),
            ("[len(x)]int", "[len(x)]int"),
            ("[x[i+1]]int", "[x[i+1]]int"),
            ("[ (a+b) * c ]int", "[(a + b) * c]int"),
            ("[- -x]int", "[- -x]int"),
            ("[a/ *p]int", "[a / *p]int"),
            ("[len(s[a+1:b])]int", "[len(s[a+1 : b])]int"),
            ("[len(s[1:])]int", "[len(s[1:])]int"),
            ("[len([]int{1,2})]int", "[len([]int{1, 2})]int"),
            (r#"[len(map[string]int{"a":1})]int"#, r#"[len(map[string]int{"a": 1})]int"#),
            ("[unsafe.Sizeof(x)]byte", "[unsafe.Sizeof(x)]byte"),
        ]);
    }

    #[test]
    fn literals_are_verbatim() {
        check(&[("[0X1F]byte", "[0X1F]byte"), ("[1_000]byte", "[1_000]byte")]);
    }

    #[test]
    fn function_literals_fall_back() {
        assert_eq!(rendered("[len(func() []int { return nil }())]int"), FALLBACK);
    }
}
