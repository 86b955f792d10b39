//! Host platform identifiers

use serde::Serialize;

/// OS family, which decides the in-place extension suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    Unix,
}

impl OsFamily {
    pub fn host() -> Self {
        if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }

    /// Suffix Python's import system loads native modules from
    pub fn extension(self) -> &'static str {
        match self {
            OsFamily::Windows => "pyd",
            OsFamily::Unix => "so",
        }
    }

    /// `<lib_name>.<ext>`
    pub fn library_file_name(self, lib_name: &str) -> String {
        format!("{lib_name}.{}", self.extension())
    }
}
