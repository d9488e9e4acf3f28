use go_syntax::lexer::{Lexer, Tok};
use go_syntax::{parse_bytes, parse_source, MAX_DEPTH};
use proptest::prelude::*;

const SAMPLE: &str = r#"package p

import "fmt"

type Point[T any] struct {
	X, Y T
	fmt.Stringer
}

func (p *Point[T]) Move(dx T) { p.X = dx }

func main() {
	for i, v := range []int{1, 2} {
		switch {
		case i > v:
			fmt.Println(Point[int]{X: i})
		}
	}
}
"#;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn lexer_never_panics_and_progresses(s in ".*") {
        let mut max_end = 0usize;
        let mut last_real_end = 0usize;
        let max_steps = s.len().saturating_mul(4) + 64;

        for (steps, (start, tok, end)) in Lexer::new(&s).enumerate() {
            prop_assert!(start <= end && end <= s.len(), "({start},{end}) tok={tok:?} input={s:?}");
            if matches!(tok, Tok::Semi) && start == end {
                prop_assert!(start >= max_end, "semicolon before progress at {start} input={s:?}");
            } else {
                prop_assert!(start >= last_real_end, "token moved backwards at {start} input={s:?}");
                last_real_end = end;
            }
            max_end = max_end.max(end);
            prop_assert!(steps <= max_steps, "possible hang on {s:?}");
        }
    }

    #[test]
    fn parser_never_panics_on_text(s in ".*") {
        let _ = parse_source(&s);
    }

    #[test]
    fn parser_never_panics_on_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = parse_bytes(&bytes);
    }

    #[test]
    fn truncated_source_fails_cleanly(cut in 0..SAMPLE.len()) {
        prop_assume!(SAMPLE.is_char_boundary(cut));
        if let Err(failure) = parse_source(&SAMPLE[..cut]) {
            prop_assert!(!failure.diags.is_empty());
        }
    }

    #[test]
    fn deleting_a_byte_fails_cleanly(at in 0..SAMPLE.len()) {
        let mut src = SAMPLE.to_owned();
        src.remove(at);
        let _ = parse_source(&src);
    }
}

#[test]
fn sample_parses() {
    parse_source(SAMPLE).unwrap();
}

#[test]
fn nesting_is_bounded() {
    let depth = MAX_DEPTH as usize * 4;
    for src in [
        format!("package p\nvar x = {}0{}\n", "(".repeat(depth), ")".repeat(depth)),
        format!("package p\nvar x = {}0\n", "^".repeat(depth)),
        format!("package p\ntype T {}int\n", "*".repeat(depth)),
        format!("package p\nvar x = T{}{}\n", "{".repeat(depth), "}".repeat(depth)),
        format!("package p\nfunc f() {}{}\n", "{".repeat(depth), "}".repeat(depth)),
        format!("package p\nvar x = 1{}\n", "+1".repeat(depth)),
        format!("package p\nvar x = 1{}\n", "+1".repeat(5000)),
        format!("package p\ntype T [1{}]int\n", "*2".repeat(5000)),
        format!("package p\nvar ok = a{}\n", " && a || a".repeat(depth)),
    ] {
        let failure = parse_source(&src).unwrap_err();
        assert!(
            failure.to_string().ends_with("exceeded max nesting depth"),
            "{failure}"
        );
    }
}

#[test]
fn nesting_below_the_limit_is_accepted() {
    let depth = 32;
    let src = format!("package p\nvar x = {}0{}\n", "(".repeat(depth), ")".repeat(depth));
    parse_source(&src).unwrap();

    let src = format!("package p\nvar s = \"a\"{}\n", " + \"b\"".repeat(depth));
    parse_source(&src).unwrap();
}
