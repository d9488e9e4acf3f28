//! Pre-order traversal over the syntax tree.
//!
//! Every node kind implements [`Walk`]; a [`Visitor`] overrides the hooks it
//! cares about and returns `ControlFlow::Break` to stop the whole walk.

use core::ops::ControlFlow;

use crate::ast::*;

pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(
        &'ast self,
        a: &'ast AstArena,
        v: &mut V,
    ) -> ControlFlow<V::Break>;
}

/// Hooks default to walking the node's children.
pub trait Visitor<'ast> {
    type Break;

    #[inline]
    fn visit_source_file(
        &mut self,
        a: &'ast AstArena,
        f: &'ast SourceFile,
    ) -> ControlFlow<Self::Break> {
        f.walk(a, self)
    }

    #[inline]
    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) -> ControlFlow<Self::Break> {
        a.decls[id].walk(a, self)
    }

    #[inline]
    fn visit_type_spec(
        &mut self,
        a: &'ast AstArena,
        spec: &'ast TypeSpec,
    ) -> ControlFlow<Self::Break> {
        walk_type_spec(a, spec, self)
    }

    #[inline]
    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) -> ControlFlow<Self::Break> {
        a.funcs[id].walk(a, self)
    }

    #[inline]
    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) -> ControlFlow<Self::Break> {
        a.stmts[id].walk(a, self)
    }

    #[inline]
    fn visit_simple_stmt(
        &mut self,
        a: &'ast AstArena,
        id: SimpleStmtId,
    ) -> ControlFlow<Self::Break> {
        a.simple_stmts[id].walk(a, self)
    }

    #[inline]
    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) -> ControlFlow<Self::Break> {
        a.exprs[id].walk(a, self)
    }

    #[inline]
    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) -> ControlFlow<Self::Break> {
        a.types[id].walk(a, self)
    }

    #[inline]
    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) -> ControlFlow<Self::Break> {
        a.fields[id].walk(a, self)
    }

    #[inline]
    fn visit_signature(&mut self, a: &'ast AstArena, id: SignatureId) -> ControlFlow<Self::Break> {
        a.signatures[id].walk(a, self)
    }

    #[inline]
    fn visit_switch_clause(
        &mut self,
        a: &'ast AstArena,
        id: SwitchClauseId,
    ) -> ControlFlow<Self::Break> {
        a.switch_clauses[id].walk(a, self)
    }

    #[inline]
    fn visit_comm_clause(&mut self, a: &'ast AstArena, id: CommClauseId) -> ControlFlow<Self::Break> {
        a.comm_clauses[id].walk(a, self)
    }

    #[inline]
    fn visit_type_param_decl(
        &mut self,
        a: &'ast AstArena,
        id: TypeParamDeclId,
    ) -> ControlFlow<Self::Break> {
        a.type_param_decls[id].walk(a, self)
    }
}

/// Children of a type spec: its type parameters, then its type.
pub fn walk_type_spec<'ast, V: Visitor<'ast> + ?Sized>(
    a: &'ast AstArena,
    spec: &'ast TypeSpec,
    v: &mut V,
) -> ControlFlow<V::Break> {
    spec.type_params.walk(a, v)?;
    spec.typ.walk(a, v)
}

impl<'ast> Walk<'ast> for TypeSpec {
    #[inline]
    fn walk<V: Visitor<'ast> + ?Sized>(
        &'ast self,
        a: &'ast AstArena,
        v: &mut V,
    ) -> ControlFlow<V::Break> {
        v.visit_type_spec(a, self)
    }
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline]
                fn walk<V: Visitor<'ast> + ?Sized>(
                    &'ast self,
                    a: &'ast AstArena,
                    v: &mut V,
                ) -> ControlFlow<V::Break> {
                    v.$visit(a, *self)
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    DeclId => visit_decl,
    FuncDeclId => visit_func_decl,
    StmtId => visit_stmt,
    SimpleStmtId => visit_simple_stmt,
    ExprId => visit_expr,
    TypeId => visit_type,
    FieldId => visit_field,
    SignatureId => visit_signature,
    SwitchClauseId => visit_switch_clause,
    CommClauseId => visit_comm_clause,
    TypeParamDeclId => visit_type_param_decl,
}

/// Access to the list buffer backing `ListRef<T>`.
pub trait ListSlice<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListSlice<T>,
    T: Walk<'ast> + 'ast,
{
    #[inline]
    fn walk<V: Visitor<'ast> + ?Sized>(
        &'ast self,
        a: &'ast AstArena,
        v: &mut V,
    ) -> ControlFlow<V::Break> {
        for item in a.slice(*self) {
            item.walk(a, v)?;
        }
        ControlFlow::Continue(())
    }
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline]
    fn walk<V: Visitor<'ast> + ?Sized>(
        &'ast self,
        a: &'ast AstArena,
        v: &mut V,
    ) -> ControlFlow<V::Break> {
        match self {
            Some(x) => x.walk(a, v),
            None => ControlFlow::Continue(()),
        }
    }
}

macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline]
                fn walk<V: Visitor<'ast> + ?Sized>(
                    &'ast self,
                    _: &'ast AstArena,
                    _: &mut V,
                ) -> ControlFlow<V::Break> {
                    ControlFlow::Continue(())
                }
            }
        )*
    };
}

impl_walk_noop! {
    Span,
    Symbol,
    bool,
    DeclKind,
    BasicLitKind,
    BranchKind,
    ChanDir,
    UnaryOp,
    BinaryOp,
    AssignOp,
    IncDecOp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    #[derive(Default)]
    struct Counter {
        exprs: usize,
        types: usize,
    }

    impl<'ast> Visitor<'ast> for Counter {
        type Break = ();

        fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) -> ControlFlow<()> {
            self.exprs += 1;
            a.exprs[id].walk(a, self)
        }

        fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) -> ControlFlow<()> {
            self.types += 1;
            a.types[id].walk(a, self)
        }
    }

    #[test]
    fn walks_every_expression_and_type() {
        let parsed = parse_source("package p\nvar x []int = f(1 + 2)\n").unwrap();
        let mut c = Counter::default();
        let flow = c.visit_source_file(&parsed.arena, &parsed.file);
        assert_eq!(flow, ControlFlow::Continue(()));
        // f(1 + 2): call, f, binary, 1, 2
        assert_eq!(c.exprs, 5);
        // []int: slice, int
        assert_eq!(c.types, 2);
    }

    struct FirstTypeName;

    impl<'ast> Visitor<'ast> for FirstTypeName {
        type Break = Symbol;

        fn visit_type_spec(&mut self, _: &'ast AstArena, spec: &'ast TypeSpec) -> ControlFlow<Symbol> {
            ControlFlow::Break(spec.name.sym)
        }
    }

    #[test]
    fn break_stops_the_walk() {
        let parsed = parse_source("package p\ntype A int\ntype B int\n").unwrap();
        let flow = FirstTypeName.visit_source_file(&parsed.arena, &parsed.file);
        match flow {
            ControlFlow::Break(sym) => assert_eq!(parsed.name(sym), "A"),
            ControlFlow::Continue(()) => panic!("no type spec visited"),
        }
    }
}
