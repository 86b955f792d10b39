//! In-place publication of the compiled library for `develop`

use std::path::{Path, PathBuf};

use crate::config::EffectiveConfig;
use crate::domain::value_objects::OsFamily;
use crate::error::NuwaResult;
use crate::infrastructure::fs::{ArtifactLock, StagedFile};

/// Copy `compiled` to `<package dir>/<lib>.<ext>`, replacing any earlier
/// build with a single rename while holding the artifact lock.
pub fn install_inplace(config: &EffectiveConfig, compiled: &Path, os: OsFamily) -> NuwaResult<PathBuf> {
    let target = config.inplace_artifact(os);
    let _lock = ArtifactLock::acquire(&config.project_root)?;

    let staged = StagedFile::copy_from(compiled, &target)?;
    staged.set_executable()?;
    let published = staged.commit()?;
    tracing::info!(artifact = %published.display(), "installed in place");
    Ok(published)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigResolver, Overrides, ProjectConfig};

    #[test]
    fn test_install_replaces_previous_build() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let config = ConfigResolver::new(None, Overrides::default().with_module_name("demo"))
            .resolve(&ProjectConfig::default(), root)
            .unwrap();

        let staged = root.join("build/nuwa/develop/demo_lib.so");
        std::fs::create_dir_all(staged.parent().unwrap()).unwrap();
        std::fs::write(&staged, b"v1").unwrap();
        let target = install_inplace(&config, &staged, OsFamily::Unix).unwrap();
        assert_eq!(target, root.join("demo/demo_lib.so"));

        std::fs::write(&staged, b"v2").unwrap();
        install_inplace(&config, &staged, OsFamily::Unix).unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"v2");

        let leftovers: Vec<_> = std::fs::read_dir(root.join("demo"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_windows_family_uses_pyd() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigResolver::new(None, Overrides::default().with_module_name("demo"))
            .resolve(&ProjectConfig::default(), dir.path())
            .unwrap();
        assert!(config
            .inplace_artifact(OsFamily::Windows)
            .ends_with("demo/demo_lib.pyd"));
    }
}
