use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use go_ctor::{generate_constructor, locate, synthesize};
use go_syntax::lexer::Lexer;
use go_syntax::parse_source;
use std::hint::black_box as bb;

// =============================================================================
// Corpus
// =============================================================================

const SMALL: &str = r#"
package geometry

type Point struct {
    X, Y float64
}
"#;

const LARGE: &str = r#"
package compiler

import (
    "fmt"
    "strings"
)

type TokenKind int

const (
    TokEOF TokenKind = iota
    TokIdent
    TokNumber
)

type Token struct {
    Kind TokenKind
    Text string
    Line int
}

type Lexer struct {
    input  []byte
    pos    int
    line   int
    tokens []Token
    emit   func(Token) error
    names  map[string][]*Token
}

func (l *Lexer) NextToken() Token {
    if l.pos >= len(l.input) {
        return Token{Kind: TokEOF, Line: l.line}
    }
    ch := l.input[l.pos]
    switch {
    case ch >= 'a' && ch <= 'z':
        return l.readIdent()
    }
    l.pos++
    return Token{Kind: TokIdent, Text: string(ch), Line: l.line}
}

func (l *Lexer) readIdent() Token {
    start := l.pos
    for l.pos < len(l.input) && l.input[l.pos] != ' ' {
        l.pos++
    }
    return Token{Kind: TokIdent, Text: strings.TrimSpace(string(l.input[start:l.pos])), Line: l.line}
}

func debug(t Token) { fmt.Println(t) }
"#;

/// Line of the struct declaration `Lexer` in [`LARGE`].
const LARGE_TARGET: usize = 23;

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");
    for (name, src) in [("small", SMALL), ("large", LARGE)] {
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::new("tokens", name), &src, |b, &src| {
            b.iter(|| Lexer::new(bb(src)).count());
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, src) in [("small", SMALL), ("large", LARGE)] {
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::new("source_file", name), &src, |b, &src| {
            b.iter(|| parse_source(bb(src)).map(|f| f.arena.exprs.len()));
        });
    }
    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    let parsed = parse_source(LARGE).expect("bench corpus parses");
    group.bench_function("locate_and_synthesize", |b| {
        b.iter(|| {
            let decl = locate(&parsed, bb(LARGE_TARGET)).expect("target line holds a type");
            synthesize(&parsed, &decl)
        });
    });

    group.throughput(Throughput::Bytes(LARGE.len() as u64));
    group.bench_function("end_to_end", |b| {
        b.iter(|| generate_constructor(bb(LARGE.as_bytes()), bb(LARGE_TARGET)));
    });
    group.finish();
}

criterion_group!(benches, bench_lexer, bench_parse, bench_generate);
criterion_main!(benches);
