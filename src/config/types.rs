//! pyproject.toml shape
//!
//! Only `[project]` and `[tool.nuwa]` are read. Other tables are captured and
//! ignored so that unknown-key warnings stay limited to Nuwa's own section.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parsed `pyproject.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: Option<ProjectTable>,

    #[serde(default)]
    pub tool: ToolTable,

    #[serde(flatten)]
    pub other: toml::Table,
}

impl ProjectConfig {
    pub fn nuwa(&self) -> &NuwaTable {
        &self.tool.nuwa
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project.as_ref().and_then(|p| p.name.as_deref())
    }
}

/// `[project]` keys that end up in archive metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectTable {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub requires_python: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub optional_dependencies: BTreeMap<String, Vec<String>>,

    #[serde(flatten)]
    pub other: toml::Table,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolTable {
    #[serde(default)]
    pub nuwa: NuwaTable,

    #[serde(flatten)]
    pub other: toml::Table,
}

/// `[tool.nuwa]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NuwaTable {
    pub nim_source: Option<String>,
    pub module_name: Option<String>,
    pub lib_name: Option<String>,
    pub entry_point: Option<String>,
    pub output_location: Option<String>,
    pub nim_flags: Option<Vec<String>>,
    pub nimble_deps: Option<Vec<String>>,
    pub bindings: Option<String>,
    pub package_data: Option<Vec<String>>,
    pub compiler: Option<String>,
    pub python: Option<String>,

    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileFlags>,

    #[serde(default)]
    pub watch: WatchTable,
}

/// `[tool.nuwa.watch]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WatchTable {
    pub debounce_ms: Option<u64>,
    pub test_command: Option<String>,
    pub abort_on_config_change: Option<bool>,
}

/// A profile's flags
///
/// Accepts both `fast = ["-d:danger"]` and `fast = { nim-flags = ["-d:danger"] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileFlags {
    pub nim_flags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ProfileFlagsDe {
    List(Vec<String>),
    Table {
        #[serde(default, rename = "nim-flags")]
        nim_flags: Vec<String>,
    },
}

impl<'de> Deserialize<'de> for ProfileFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match ProfileFlagsDe::deserialize(deserializer)? {
            ProfileFlagsDe::List(nim_flags) | ProfileFlagsDe::Table { nim_flags } => {
                Ok(Self { nim_flags })
            }
        }
    }
}
