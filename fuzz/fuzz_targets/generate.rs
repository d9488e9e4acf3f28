#![no_main]

use go_ctor::{generate_constructor, GenerateError};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u16, &[u8])| {
    let (line, source) = input;
    match generate_constructor(source, usize::from(line)) {
        Ok(ctor) => {
            assert!(ctor.starts_with("func New"));
            assert!(ctor.ends_with("}\n"));
            // deterministic
            assert_eq!(generate_constructor(source, usize::from(line)).ok(), Some(ctor));
        }
        Err(GenerateError::Parse(failure)) => assert!(!failure.diags.is_empty()),
        Err(GenerateError::NotFound) => {}
    }
});
