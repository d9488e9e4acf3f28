//! Prints a constructor for every type declared in a Go file.
//!
//! cargo run --example type_decls -- path/to/file.go

use std::env;

use go_ctor::{locate, synthesize};

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: cargo run --example type_decls -- <file.go>");
        std::process::exit(2);
    });

    let src = std::fs::read_to_string(&path).expect("read file");
    let parsed = match go_syntax::parse_source(&src) {
        Ok(parsed) => parsed,
        Err(f) => {
            eprintln!("parse failed");
            for d in &f.diags {
                eprintln!("{path}:{}: {}", d.pos, d.message);
            }
            std::process::exit(1);
        }
    };

    let mut line = 1;
    while line <= parsed.lines.line_count() {
        match locate(&parsed, line) {
            Ok(decl) => {
                println!("// {path}:{}-{} {}", decl.lines.start, decl.lines.end, decl.name);
                println!("{}", synthesize(&parsed, &decl));
                line = decl.lines.end as usize + 1;
            }
            Err(_) => line += 1,
        }
    }
}
