//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::ConfigWarning;
use crate::error::{NuwaError, NuwaResult};

use super::types::ProjectConfig;

pub const PYPROJECT: &str = "pyproject.toml";

/// Path of the configuration file for a project root
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(PYPROJECT)
}

/// Load `pyproject.toml` from the project root, collecting unknown
/// `[tool.nuwa]` keys as warnings. A missing file yields defaults.
pub fn load_with_warnings(project_root: &Path) -> NuwaResult<(ProjectConfig, Vec<ConfigWarning>)> {
    let path = config_path(project_root);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no pyproject.toml, using defaults");
            return Ok((ProjectConfig::default(), Vec::new()));
        }
        Err(e) => return Err(e.into()),
    };
    parse_with_warnings(&content, &path)
}

pub fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> NuwaResult<(ProjectConfig, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: ProjectConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| NuwaError::config(format!("{}: {}", path.display(), e)))?;

    let warnings = unknown_paths
        .into_iter()
        .filter(|p| p.starts_with("tool.nuwa."))
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                line: find_line_number(content, &leaf),
                suggestion: suggest_key(&leaf),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load and apply environment overrides; callers decide how to surface warnings
pub fn load(project_root: &Path) -> NuwaResult<(ProjectConfig, Vec<ConfigWarning>)> {
    let (config, warnings) = load_with_warnings(project_root)?;
    tracing::debug!(warnings = warnings.len(), "loaded pyproject.toml");
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (NUWA_* prefix)
pub fn with_env_overrides(config: ProjectConfig) -> ProjectConfig {
    with_env_overrides_from(config, |key| std::env::var(key).ok())
}

pub(crate) fn with_env_overrides_from(
    mut config: ProjectConfig,
    get_env: impl Fn(&str) -> Option<String>,
) -> ProjectConfig {
    if let Some(compiler) = get_env("NUWA_COMPILER").filter(|v| !v.trim().is_empty()) {
        config.tool.nuwa.compiler = Some(compiler);
    }
    if let Some(python) = get_env("NUWA_PYTHON").filter(|v| !v.trim().is_empty()) {
        config.tool.nuwa.python = Some(python);
    }
    config
}

/// Profile requested through `NUWA_PROFILE`, used when the CLI names none
pub fn env_profile() -> Option<String> {
    std::env::var("NUWA_PROFILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "nim-source",
        "module-name",
        "lib-name",
        "entry-point",
        "output-location",
        "nim-flags",
        "nimble-deps",
        "bindings",
        "package-data",
        "compiler",
        "python",
        "profiles",
        "watch",
        "debounce-ms",
        "test-command",
        "abort-on-config-change",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
