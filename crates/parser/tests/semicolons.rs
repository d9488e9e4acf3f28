use go_syntax::lexer::{Lexer, Tok};
use pretty_assertions::assert_eq;

/// Token spellings, with inserted semicolons shown as `;\n`.
fn lex(input: &str) -> Vec<&'static str> {
    Lexer::new(input)
        .map(|(s, t, e)| match t {
            Tok::Semi if s == e => ";\\n",
            t => t.spelling(),
        })
        .collect()
}

#[test]
fn inserted_after_line_enders() {
    let cases: &[(&str, &[&str])] = &[
        ("x\n", &["IDENT", ";\\n"]),
        ("1\n2.5\n3i\n'a'\n\"s\"\n`r`\n", &[
            "INT", ";\\n", "FLOAT", ";\\n", "IMAG", ";\\n", "CHAR", ";\\n", "STRING", ";\\n",
            "STRING", ";\\n",
        ]),
        ("break\ncontinue\nfallthrough\nreturn\n", &[
            "break", ";\\n", "continue", ";\\n", "fallthrough", ";\\n", "return", ";\\n",
        ]),
        ("i++\ni--\n", &["IDENT", "++", ";\\n", "IDENT", "--", ";\\n"]),
        (")\n]\n}\n", &[")", ";\\n", "]", ";\\n", "}", ";\\n"]),
    ];
    for &(src, want) in cases {
        assert_eq!(lex(src), want, "{src:?}");
    }
}

#[test]
fn not_inserted_after_other_tokens() {
    assert_eq!(lex("func (\n"), ["func", "("]);
    assert_eq!(lex("x +\ny"), ["IDENT", "+", "IDENT", ";\\n"]);
    assert_eq!(lex("type T struct {\n"), ["type", "IDENT", "struct", "{"]);
    assert_eq!(lex("a,\n"), ["IDENT", ","]);
}

#[test]
fn explicit_semicolon_is_not_doubled() {
    assert_eq!(lex("x;\n"), ["IDENT", ";"]);
}

#[test]
fn comments_end_lines() {
    assert_eq!(lex("x // note\ny"), ["IDENT", ";\\n", "IDENT", ";\\n"]);
    assert_eq!(lex("x /* one line */ y"), ["IDENT", "IDENT", ";\\n"]);
    assert_eq!(lex("x /* two\nlines */ y"), ["IDENT", ";\\n", "IDENT", ";\\n"]);
}

#[test]
fn carriage_returns_are_whitespace() {
    assert_eq!(lex("x\r\ny\r\n"), ["IDENT", ";\\n", "IDENT", ";\\n"]);
}

#[test]
fn inserted_semicolons_are_zero_width_at_the_line_end() {
    let toks: Vec<_> = Lexer::new("a\n\nb").collect();
    assert_eq!(toks[1], (1, Tok::Semi, 1));
    assert_eq!(toks[3], (4, Tok::Semi, 4));
}
