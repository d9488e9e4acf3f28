use go_ctor::{generate_constructor, locate, GenerateError};
use go_syntax::parse_source;
use walkdir::WalkDir;

/// Parses every `.go` file under `$GO_CTOR_CORPUS` and generates a
/// constructor for every line of every file.
#[test]
fn generates_over_go_corpus_if_configured() {
    let Some(root) = std::env::var_os("GO_CTOR_CORPUS") else {
        eprintln!("GO_CTOR_CORPUS not set; skipping corpus test");
        return;
    };

    let mut files = 0usize;
    let mut constructors = 0usize;

    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        // testdata holds deliberately broken sources
        if path.components().any(|c| c.as_os_str() == "testdata") {
            continue;
        }
        let Ok(src) = std::fs::read_to_string(path) else {
            continue;
        };

        let parsed = match parse_source(&src) {
            Ok(parsed) => parsed,
            Err(f) => panic!("{}: {f}", path.display()),
        };
        files += 1;

        for line in 1..=parsed.lines.line_count() {
            let located = locate(&parsed, line).is_ok();
            match generate_constructor(src.as_bytes(), line) {
                Ok(ctor) => {
                    assert!(located, "{}:{line}", path.display());
                    assert!(ctor.starts_with("func New"), "{}:{line}", path.display());
                    assert!(ctor.ends_with("}\n"), "{}:{line}", path.display());
                    constructors += 1;
                }
                Err(GenerateError::NotFound) => assert!(!located),
                Err(e) => panic!("{}:{line}: {e}", path.display()),
            }
        }
    }

    eprintln!("{files} files, {constructors} constructors");
}
