use go_ctor::{generate_constructor, GenerateError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SHAPES: &str = "package shapes

import \"io\"

// ID identifies a shape.
type ID int

type Point struct {
	X, Y float64
}

type Shape struct {
	ID    ID
	Name  string `json:\"name\"`
	Tags  map[string][]string
	Fill  func(io.Writer) error
	Edges chan<- Point
	io.Reader
	*Point
}

type (
	Names = []string
	Empty struct{}
)

func Area(s Shape) float64 {
	type local struct{ w, h float64 }
	return 0
}
";

fn generate(line: usize) -> Result<String, GenerateError> {
    generate_constructor(SHAPES.as_bytes(), line)
}

#[test]
fn struct_with_two_fields() {
    let src = b"package main\n\ntype User struct {\n\tA int\n\tB string\n}\n";
    assert_eq!(
        generate_constructor(src, 3).unwrap(),
        "func NewUser(a int, b string) User {\n\treturn User{\n\t\tA: a,\n\t\tB: b,\n\t}\n}\n"
    );
}

#[test]
fn alias_of_builtin() {
    assert_eq!(
        generate(6).unwrap(),
        "func NewID(value int) ID {\n\treturn ID(value)\n}\n"
    );
}

#[test]
fn every_struct_line_resolves_and_neighbours_do_not() {
    let want = generate(8).unwrap();
    assert!(want.starts_with("func NewPoint(x float64, y float64) Point {"));
    for line in 8..=10 {
        assert_eq!(generate(line).unwrap(), want, "line {line}");
    }
    assert_eq!(generate(7), Err(GenerateError::NotFound));
    assert_eq!(generate(11), Err(GenerateError::NotFound));
}

#[test]
fn doc_comment_is_outside_the_declaration() {
    assert_eq!(generate(5), Err(GenerateError::NotFound));
}

#[test]
fn field_types_are_rendered_and_embeds_skipped() {
    assert_eq!(
        generate(15).unwrap(),
        "func NewShape(id ID, name string, tags map[string][]string, fill func(io.Writer) error, edges chan<- Point) Shape {\n\
         \treturn Shape{\n\
         \t\tID: id,\n\
         \t\tName: name,\n\
         \t\tTags: tags,\n\
         \t\tFill: fill,\n\
         \t\tEdges: edges,\n\
         \t}\n\
         }\n"
    );
}

#[test]
fn grouped_declarations() {
    assert_eq!(generate(22), Err(GenerateError::NotFound));
    assert_eq!(
        generate(23).unwrap(),
        "func NewNames(value []string) Names {\n\treturn Names(value)\n}\n"
    );
    assert_eq!(
        generate(24).unwrap(),
        "func NewEmpty() Empty {\n\treturn Empty{\n\t}\n}\n"
    );
}

#[test]
fn function_local_declaration() {
    assert_eq!(
        generate(28).unwrap(),
        "func Newlocal(w float64, h float64) local {\n\treturn local{\n\t\tw: w,\n\t\th: h,\n\t}\n}\n"
    );
}

#[test]
fn lines_outside_any_declaration() {
    for line in [0, 1, 2, 3, 4, 7, 11, 21, 25, 26, 27, 29, 30, 31, 500] {
        assert_eq!(generate(line), Err(GenerateError::NotFound), "line {line}");
    }
}

#[test]
fn malformed_source_is_a_parse_error() {
    let err = generate_constructor(b"package p\ntype T struct {\n\tA int\n", 2).unwrap_err();
    assert!(matches!(err, GenerateError::Parse(_)));
    assert_eq!(
        err.to_string(),
        "could not parse source file: 4:1: expected '}', found 'EOF'"
    );

    let err = generate_constructor(b"package p\ntype T \xff\n", 2).unwrap_err();
    assert_eq!(
        err.to_string(),
        "could not parse source file: 2:8: illegal UTF-8 encoding"
    );
}

#[test]
fn long_operator_chains_fail_to_parse_instead_of_overflowing() {
    let src = format!("package p\nvar x = 1{}\ntype T int\n", "+1".repeat(5000));
    let err = generate_constructor(src.as_bytes(), 3).unwrap_err();
    assert!(err.to_string().ends_with("exceeded max nesting depth"), "{err}");

    let src = format!("package p\ntype T [1{}]int\n", "+1".repeat(20_000));
    let err = generate_constructor(src.as_bytes(), 2).unwrap_err();
    assert!(err.to_string().ends_with("exceeded max nesting depth"), "{err}");

    let src = format!("package p\nvar x = 1{}\ntype T [1+1+1]int\n", "+1".repeat(64));
    assert_eq!(
        generate_constructor(src.as_bytes(), 3).unwrap(),
        "func NewT(value [1 + 1 + 1]int) T {\n\treturn T(value)\n}\n"
    );
}

#[test]
fn output_is_deterministic() {
    assert_eq!(generate(15), generate(15));
}

fn struct_source(fields: usize, blank_lines: usize) -> String {
    let mut src = String::from("package p\n");
    src.push_str(&"\n".repeat(blank_lines));
    src.push_str("type T struct {\n");
    for i in 0..fields {
        src.push_str(&format!("\tF{i} int\n"));
    }
    src.push_str("}\n\nvar after = 1\n");
    src
}

proptest! {
    #[test]
    fn struct_span_resolves_exactly(fields in 0usize..8, blank_lines in 0usize..5) {
        let src = struct_source(fields, blank_lines);
        let start = 2 + blank_lines;
        let end = start + fields + 1;
        let total = src.lines().count() + 1;
        for line in 0..=total {
            let got = generate_constructor(src.as_bytes(), line);
            if (start..=end).contains(&line) {
                prop_assert!(got.is_ok(), "line {} of\n{}", line, src);
            } else {
                prop_assert_eq!(got, Err(GenerateError::NotFound));
            }
        }
    }

    #[test]
    fn one_parameter_per_field(fields in 0usize..8) {
        let ctor = generate_constructor(struct_source(fields, 0).as_bytes(), 2).unwrap();
        prop_assert_eq!(ctor.matches(" int").count(), fields);
        prop_assert_eq!(ctor.lines().count(), fields + 4);
    }
}
