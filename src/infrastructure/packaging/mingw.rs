//! MinGW runtime DLLs for Windows wheels
//!
//! Nim on Windows links extensions against the MinGW runtime. A wheel has to
//! carry those DLLs next to the `.pyd`, or the import fails on machines
//! without a MinGW toolchain on PATH.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const MINGW_RUNTIME_DLLS: &[&str] = &[
    "libgcc_s_seh-1.dll",
    "libstdc++-6.dll",
    "libwinpthread-1.dll",
];

/// Ordered directories searched for the runtime DLLs; the first hit wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MingwRuntime {
    search_dirs: Vec<PathBuf>,
}

impl MingwRuntime {
    /// PATH first, then the MinGW trees shipped around the compiler and
    /// under `NIM_DIR`
    pub fn from_env(compiler: &str) -> Self {
        Self::from_parts(
            compiler,
            std::env::var_os("PATH"),
            std::env::var_os("NIM_DIR"),
        )
    }

    pub fn from_parts(compiler: &str, path: Option<OsString>, nim_dir: Option<OsString>) -> Self {
        let path_dirs: Vec<PathBuf> = path
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();

        let mut dirs = path_dirs.clone();
        if let Some(bin) = find_executable(compiler, &path_dirs).and_then(|nim| {
            let nim = std::fs::canonicalize(&nim).unwrap_or(nim);
            nim.parent().map(Path::to_path_buf)
        }) {
            dirs.push(bin.clone());
            if let Some(root) = bin.parent() {
                dirs.extend(bundled_toolchains(root));
            }
        }
        if let Some(nim_dir) = nim_dir.filter(|d| !d.is_empty()) {
            let nim_dir = PathBuf::from(nim_dir);
            dirs.push(nim_dir.join("bin"));
            dirs.extend(bundled_toolchains(&nim_dir));
        }

        let mut search_dirs: Vec<PathBuf> = Vec::with_capacity(dirs.len());
        for dir in dirs {
            if !search_dirs.contains(&dir) {
                search_dirs.push(dir);
            }
        }
        Self { search_dirs }
    }

    pub fn with_search_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// `(file name, location)` for every runtime DLL that could be found
    pub fn find(&self) -> Vec<(&'static str, PathBuf)> {
        MINGW_RUNTIME_DLLS
            .iter()
            .filter_map(|name| {
                self.search_dirs
                    .iter()
                    .map(|dir| dir.join(name))
                    .find(|path| path.is_file())
                    .map(|path| (*name, path))
            })
            .collect()
    }
}

fn bundled_toolchains(root: &Path) -> [PathBuf; 4] {
    [
        root.join("dist").join("mingw64").join("bin"),
        root.join("dist").join("mingw32").join("bin"),
        root.join("mingw64").join("bin"),
        root.join("mingw32").join("bin"),
    ]
}

/// `name` itself when it is a path, else the first match on PATH
fn find_executable(name: &str, path_dirs: &[PathBuf]) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }
    path_dirs
        .iter()
        .flat_map(|dir| [dir.join(name), dir.join(format!("{name}.exe"))])
        .find(|path| path.is_file())
}
