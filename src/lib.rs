//! Generates a Go constructor for the type declared at a source line.
//!
//! ```
//! let src = b"package geo\n\ntype Point struct {\n\tX, Y int\n}\n";
//! let ctor = go_ctor::generate_constructor(src, 4).unwrap();
//! assert!(ctor.starts_with("func NewPoint(x int, y int) Point {"));
//! ```

pub mod args;
pub mod error;
pub mod locate;
pub mod render;
pub mod synth;

use tracing::debug;

pub use error::GenerateError;
pub use locate::{locate, FieldDecl, Shape, TypeDeclaration};
pub use render::render;
pub use synth::synthesize;

/// Parses `source`, finds the type declaration spanning `target_line`
/// (1-based) and returns its constructor.
pub fn generate_constructor(source: &[u8], target_line: usize) -> Result<String, GenerateError> {
    let file = go_syntax::parse_bytes(source)?;
    let decl = locate(&file, target_line)?;
    debug!(
        name = decl.name,
        start = decl.lines.start,
        end = decl.lines.end,
        aggregate = matches!(decl.shape, Shape::Aggregate { .. }),
        "located type declaration"
    );
    Ok(synthesize(&file, &decl))
}
