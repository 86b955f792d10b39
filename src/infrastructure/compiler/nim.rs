//! Nim compiler invocation
//!
//! Command line, in this exact order:
//!
//! ```text
//! <compiler> c --app:lib --out:<staging> --path:<source dir> [--nimblePath:<pkgs>]
//!     <base flags> <profile flags> <cli flags> <mode defaults> <entry>
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::EffectiveConfig;
use crate::domain::entities::BuildResult;
use crate::domain::ports::CachedFileReader;
use crate::domain::services::DiagnosticTranslator;
use crate::domain::value_objects::{BuildMode, OsFamily};
use crate::error::{NuwaError, NuwaResult};

use super::supervisor::{ProcessOutput, ProcessSupervisor};

/// Everything needed to run one compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub compiler: String,
    pub source_dir: PathBuf,
    pub entry: PathBuf,
    pub staging: PathBuf,
    pub search_path: Option<PathBuf>,
    /// Base ++ profile ++ CLI, already resolved
    pub flags: Vec<String>,
    pub mode: BuildMode,
}

impl CompileRequest {
    pub fn new(
        config: &EffectiveConfig,
        entry: &Path,
        mode: BuildMode,
        search_path: Option<PathBuf>,
        os: OsFamily,
    ) -> Self {
        Self {
            compiler: config.compiler.clone(),
            source_dir: config.source_path(),
            entry: entry.to_path_buf(),
            staging: staging_path(config, mode, os),
            search_path,
            flags: config.nim_flags.clone(),
            mode,
        }
    }

    /// Arguments after the compiler binary
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "c".to_string(),
            "--app:lib".to_string(),
            format!("--out:{}", self.staging.display()),
            format!("--path:{}", self.source_dir.display()),
        ];
        if let Some(search_path) = &self.search_path {
            args.push(format!("--nimblePath:{}", search_path.display()));
        }
        args.extend(self.flags.iter().cloned());
        args.extend(self.mode.mode_flags().iter().map(|f| f.to_string()));
        args.push(self.entry.display().to_string());
        args
    }

    /// Shell-like rendering for logs
    pub fn display(&self) -> String {
        std::iter::once(self.compiler.clone())
            .chain(self.args())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `build/nuwa/<mode>/<lib>.<ext>` under the project root
pub fn staging_path(config: &EffectiveConfig, mode: BuildMode, os: OsFamily) -> PathBuf {
    config
        .project_root
        .join("build")
        .join("nuwa")
        .join(mode.as_str())
        .join(config.library_file_name(os))
}

/// Spawns the compiler and translates what it prints
#[derive(Debug, Clone, Default)]
pub struct CompilerInvoker {
    supervisor: ProcessSupervisor,
}

impl CompilerInvoker {
    pub fn new(supervisor: ProcessSupervisor) -> Self {
        Self { supervisor }
    }

    pub fn supervisor(&self) -> &ProcessSupervisor {
        &self.supervisor
    }

    /// Run the compiler. A missing binary is an environment error; a failed
    /// compile is a `BuildResult` with `success == false`.
    pub fn compile(&self, request: &CompileRequest) -> NuwaResult<BuildResult> {
        match std::fs::remove_file(&request.staging) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        if let Some(parent) = request.staging.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!(command = %request.display(), "compiling");
        let mut command = Command::new(&request.compiler);
        command.args(request.args()).current_dir(&request.source_dir);

        let output = self.supervisor.run(&mut command).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NuwaError::environment(
                    request.compiler.clone(),
                    "the Nim compiler is not installed or not on PATH",
                )
            } else {
                NuwaError::environment(request.compiler.clone(), e.to_string())
            }
        })?;

        tracing::info!(
            exit_code = ?output.exit_code,
            duration_ms = output.duration.as_millis() as u64,
            "compiler finished"
        );
        Ok(self.to_result(request, output))
    }

    fn to_result(&self, request: &CompileRequest, output: ProcessOutput) -> BuildResult {
        let reader = CachedFileReader::new();
        let translation =
            DiagnosticTranslator::new(&request.source_dir, &reader).translate(&output.output);

        let produced = request.staging.is_file();
        let success = output.success() && produced;
        let mut raw_log = translation.raw_log;
        if output.success() && !produced {
            let note = format!(
                "compiler exited successfully but did not write {}",
                request.staging.display()
            );
            raw_log = Some(match raw_log {
                Some(log) => format!("{log}\n{note}"),
                None => note,
            });
        }

        BuildResult {
            success,
            diagnostics: translation.diagnostics,
            raw_log,
            artifacts: if success {
                vec![request.staging.clone()]
            } else {
                Vec::new()
            },
            exit_code: output.exit_code,
            duration: output.duration,
        }
    }
}
