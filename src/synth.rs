//! Constructor text for a located type declaration.

use std::fmt::Write as _;

use go_syntax::ParsedFile;

use crate::locate::{Shape, TypeDeclaration};
use crate::render::render;

/// Writes `func New<T>(...) T { ... }`, tab-indented, ending in one newline.
///
/// Struct fields become one parameter per name, lower-cased, in declaration
/// order; embedded fields are skipped. Names that differ only in case map to
/// the same parameter. Any other type takes a single `value` parameter and
/// is converted.
pub fn synthesize(file: &ParsedFile<'_>, decl: &TypeDeclaration<'_>) -> String {
    let name = decl.name;
    let mut out = String::new();

    match &decl.shape {
        Shape::Aggregate { fields } => {
            let mut params = Vec::new();
            let mut assignments = String::new();
            for field in fields.iter().filter(|f| !f.is_embedded()) {
                let ty = render(file, field.ty);
                for ident in &field.names {
                    let field_name = file.name(ident.sym);
                    let param = field_name.to_lowercase();
                    let _ = writeln!(assignments, "\t\t{field_name}: {param},");
                    params.push(format!("{param} {ty}"));
                }
            }
            let _ = writeln!(out, "func New{name}({}) {name} {{", params.join(", "));
            let _ = writeln!(out, "\treturn {name}{{");
            out.push_str(&assignments);
            out.push_str("\t}\n}\n");
        }
        Shape::Alias { underlying } => {
            let ty = render(file, *underlying);
            let _ = writeln!(out, "func New{name}(value {ty}) {name} {{");
            let _ = writeln!(out, "\treturn {name}(value)");
            out.push_str("}\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::locate;
    use go_syntax::parse_source;
    use pretty_assertions::assert_eq;

    fn generate(src: &str, line: usize) -> String {
        let file = parse_source(src).unwrap();
        let decl = locate(&file, line).unwrap();
        synthesize(&file, &decl)
    }

    #[test]
    fn struct_fields_become_parameters() {
        let src = "package p\n\ntype Point struct {\n\tX, Y float64\n\tLabel string\n}\n";
        assert_eq!(
            generate(src, 4),
            "func NewPoint(x float64, y float64, label string) Point {\n\
             \treturn Point{\n\
             \t\tX: x,\n\
             \t\tY: y,\n\
             \t\tLabel: label,\n\
             \t}\n\
             }\n"
        );
    }

    #[test]
    fn empty_struct_has_no_blank_line() {
        assert_eq!(
            generate("package p\ntype Empty struct{}\n", 2),
            "func NewEmpty() Empty {\n\treturn Empty{\n\t}\n}\n"
        );
    }

    #[test]
    fn embedded_fields_are_skipped() {
        let src = "package p\ntype Conn struct {\n\tnet.Conn\n\t*sync.Mutex\n\tID int\n}\n";
        assert_eq!(
            generate(src, 2),
            "func NewConn(id int) Conn {\n\treturn Conn{\n\t\tID: id,\n\t}\n}\n"
        );
    }

    #[test]
    fn non_struct_types_convert_a_value() {
        assert_eq!(
            generate("package p\ntype Handler func(w io.Writer) error\n", 2),
            "func NewHandler(value func(w io.Writer) error) Handler {\n\treturn Handler(value)\n}\n"
        );
        assert_eq!(
            generate("package p\ntype Names = []string\n", 2),
            "func NewNames(value []string) Names {\n\treturn Names(value)\n}\n"
        );
    }

    #[test]
    fn lower_casing_is_whole_identifier() {
        let src = "package p\ntype T struct {\n\tURL string\n\tÄrger int\n}\n";
        assert_eq!(
            generate(src, 3),
            "func NewT(url string, ärger int) T {\n\treturn T{\n\t\tURL: url,\n\t\tÄrger: ärger,\n\t}\n}\n"
        );
    }
}
