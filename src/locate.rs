//! Finding the type declaration that spans a source line.

use core::ops::ControlFlow;

use go_syntax::ast::{AstArena, IdentName, Type, TypeId, TypeSpec};
use go_syntax::walk::Visitor;
use go_syntax::{LineRange, ParsedFile};

use crate::error::GenerateError;

/// A located `type` spec and the shape the constructor is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration<'ast> {
    pub name: &'ast str,
    /// Inclusive, from the declared name to the end of its type.
    pub lines: LineRange,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// `type T struct { ... }`
    Aggregate { fields: Vec<FieldDecl> },
    /// Every other named type: `type ID int`, `type A = B`, interfaces.
    Alias { underlying: TypeId },
}

/// One line of a struct's field list. `names` is empty for embedded fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub names: Vec<IdentName>,
    pub ty: TypeId,
}

impl FieldDecl {
    #[inline]
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// Returns the first type spec, in source order, whose lines include
/// `target_line`. Specs inside function bodies are searched too.
pub fn locate<'ast>(
    file: &'ast ParsedFile<'_>,
    target_line: usize,
) -> Result<TypeDeclaration<'ast>, GenerateError> {
    let Ok(line) = u32::try_from(target_line) else {
        return Err(GenerateError::NotFound);
    };
    let mut finder = SpecAtLine { file, line };
    match finder.visit_source_file(&file.arena, &file.file) {
        ControlFlow::Break((spec, lines)) => Ok(TypeDeclaration {
            name: file.name(spec.name.sym),
            lines,
            shape: shape_of(&file.arena, &spec),
        }),
        ControlFlow::Continue(()) => Err(GenerateError::NotFound),
    }
}

struct SpecAtLine<'a, 'src> {
    file: &'a ParsedFile<'src>,
    line: u32,
}

impl<'ast> Visitor<'ast> for SpecAtLine<'_, '_> {
    type Break = (TypeSpec, LineRange);

    fn visit_type_spec(
        &mut self,
        a: &'ast AstArena,
        spec: &'ast TypeSpec,
    ) -> ControlFlow<Self::Break> {
        let lines = self.file.lines_of(spec.span(a));
        if lines.contains(self.line) {
            return ControlFlow::Break((*spec, lines));
        }
        // function literals in array lengths can declare types too
        go_syntax::walk::walk_type_spec(a, spec, self)
    }
}

fn shape_of(a: &AstArena, spec: &TypeSpec) -> Shape {
    match a.types[spec.typ] {
        Type::Struct { fields } => Shape::Aggregate {
            fields: a
                .fields_list(fields)
                .iter()
                .map(|&id| {
                    let field = &a.fields[id];
                    FieldDecl {
                        names: a.ident_names(field.names).to_vec(),
                        ty: field.typ,
                    }
                })
                .collect(),
        },
        _ => Shape::Alias {
            underlying: spec.typ,
        },
    }
}
