//! Domain Services
//!
//! Pure logic over compiler output and source text; no I/O of their own.

mod diagnostic_translator;
mod inclusion;

pub use diagnostic_translator::{parse_located_line, DiagnosticTranslator, LocatedLine, Translation};
pub use inclusion::parse_includes;
