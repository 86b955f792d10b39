//! Configuration warning value object.

use std::path::PathBuf;

/// Unknown `[tool.nuwa]` key, reported without failing the build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Dotted path of the key, e.g. `tool.nuwa.nim-flag`
    pub key: String,
    pub file: PathBuf,
    /// 1-indexed line if the key could be located
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}
