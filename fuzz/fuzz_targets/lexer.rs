#![no_main]

use go_syntax::lexer::{Lexer, Tok};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let mut lx = Lexer::new(s);
    let mut max_end = 0usize;
    let mut last_real_end = 0usize;
    let max_steps = s.len().saturating_mul(4) + 64;

    for (steps, (start, tok, end)) in lx.by_ref().enumerate() {
        assert!(start <= end && end <= s.len());
        if matches!(tok, Tok::Semi) && start == end {
            assert!(start >= max_end);
        } else {
            assert!(start >= last_real_end);
            last_real_end = end;
        }
        max_end = max_end.max(end);
        assert!(steps <= max_steps);
    }

    for err in lx.take_errors() {
        assert!(err.span.end as usize <= s.len());
    }
});
