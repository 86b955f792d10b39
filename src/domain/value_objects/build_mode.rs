//! Build Mode Value Object
//!
//! Selects the compiler defaults appended after every user-supplied flag.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Debug,
    Release,
    /// In-place development build, compiled with debug defaults
    Develop,
}

impl BuildMode {
    /// Flags appended last on the compiler command line
    pub fn mode_flags(self) -> &'static [&'static str] {
        match self {
            BuildMode::Release => &["-d:release"],
            BuildMode::Debug | BuildMode::Develop => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
            BuildMode::Develop => "develop",
        }
    }

    /// `develop` and `watch` pick between these two
    pub fn from_release_flag(release: bool) -> Self {
        if release {
            BuildMode::Release
        } else {
            BuildMode::Develop
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
