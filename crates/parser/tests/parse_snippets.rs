use go_syntax::ast::{Spec, TopLevelDecl, Type};
use go_syntax::parse_source;

fn assert_parses(src: &str) {
    if let Err(f) = parse_source(src) {
        panic!("expected parse ok, got diagnostics: {:#?}", f.diags);
    }
}

fn first_error(src: &str) -> String {
    match parse_source(src) {
        Ok(_) => panic!("expected a parse failure"),
        Err(f) => f.to_string(),
    }
}

#[test]
fn parses_imports_and_decls() {
    assert_parses(
        r#"
package main

import (
    "fmt"
    . "math"
    _ "net/http"
)

const (
    A = iota
    B
    C int = 2
)

var (
    x = 1
    y, z int
)

type (
    T = int
    U[T any] struct { F T }
    V interface {
        M(x int) int
        ~int | ~string
    }
    W[K comparable, V any] map[K]V
)

func main() {
    fmt.Println(Sqrt(4))
}

func (u *U[T]) Get() T { return u.F }
"#,
    );
}

#[test]
fn parses_statements() {
    assert_parses(
        r#"
package p

func f(x int, ch chan int) (n int, err error) {
    if x < 0 { return -x, nil }
    for i := 0; i < 10; i++ {
        if i == 5 { break }
        continue
    }
    for range []int{1,2,3} {
    }
    for x > 0 {
        x--
    }
    switch x {
    case 0, 1:
        x++
        fallthrough
    default:
        x = 3
    }
    switch t := any(x).(type) {
    case nil:
    case interface{ M() }:
        _ = t
    }
    select {
    case ch <- x:
        return x, nil
    case v := <-ch:
        return v, nil
    default:
        return 0, nil
    }
}
"#,
    );
}

#[test]
fn parses_expressions() {
    assert_parses(
        r#"
package p

func f(a, b, c int, ch chan<- int, xs ...int) {
    _ = a + b*c - (a<<2) &^ 1
    _ = a == b || a < c && b <= c
    _ = &a
    _ = <-ch
    _ = []int{1,2,3}[0]
    _ = []int{1,2,3}[1:]
    _ = []int{1,2,3}[:2]
    _ = []int{1,2,3}[0:2:3]
    _ = map[string]int{"a":1, "b":2}["a"]
    _ = [...]string{0: "zero", 5: "five"}
    _ = []struct{ X, Y int }{{1, 2}, {X: 3}}
    _ = f(a, b, c, ch)
    _ = f(a, b, c, ch, xs...)
    _ = func(x int) int { return x * 2 }(a)
    _ = (*int)(nil)
    _ = x.(interface{ M() })
    _ = 'x' + 0x1p-2 + 1_000i
    _ = `raw
string`
}
"#,
    );
}

#[test]
fn struct_fields_accept_array_and_generic_forms() {
    let parsed = parse_source(
        "package p\ntype S struct {\n\tA [N]int\n\tB G[int]\n\tC []byte `tag`\n\tG[int]\n\t*pkg.T\n}\n",
    )
    .unwrap();
    let TopLevelDecl::Decl(decl) = parsed.arena.top_decls(parsed.file.decls)[0] else {
        panic!("not a declaration");
    };
    let Spec::Type(spec) = parsed.arena.specs_list(parsed.arena.decls[decl].specs)[0] else {
        panic!("not a type spec");
    };
    let Type::Struct { fields } = parsed.arena.types[spec.typ] else {
        panic!("not a struct");
    };
    let fields = parsed.arena.fields_list(fields);
    assert_eq!(fields.len(), 5);
    let embedded: Vec<bool> = fields
        .iter()
        .map(|&f| parsed.arena.fields[f].is_embedded())
        .collect();
    assert_eq!(embedded, [false, false, false, true, true]);
    assert!(matches!(
        parsed.arena.types[parsed.arena.fields[fields[0]].typ],
        Type::Array { .. }
    ));
}

#[test]
fn reports_first_error_with_position() {
    assert_eq!(
        first_error("package p\n\ntype T struct {\n\tA int\n"),
        "5:1: expected '}', found 'EOF'"
    );
    assert_eq!(
        first_error("package p\nfunc f() {\n\tx := 1\n\tif x {\n}\n"),
        "6:1: expected '}', found 'EOF'"
    );
    assert_eq!(first_error("package"), "1:8: expected 'IDENT', found 'EOF'");
}
