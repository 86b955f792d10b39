//! Isolated project environment for running the `nuwa` binary

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

use tempfile::TempDir;

use super::fixtures::*;

/// Result of running a nuwa CLI command
#[derive(Debug)]
pub struct TestResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Every stdout line parsed as one JSON object
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).unwrap_or_else(|e| panic!("not JSON ({e}): {l}"))
            })
            .collect()
    }
}

/// Scratch project with fake tools on hand
pub struct TestEnv {
    pub project_root: TempDir,
    tools: TempDir,
    nuwa_bin: PathBuf,
}

impl TestEnv {
    /// Empty project directory
    pub fn empty() -> Self {
        let tools = tempfile::tempdir().expect("create tools dir");
        write_script(&tools.path().join("nim"), FAKE_NIM);
        write_script(&tools.path().join("python"), FAKE_PYTHON);
        Self {
            project_root: tempfile::tempdir().expect("create project dir"),
            tools,
            nuwa_bin: PathBuf::from(env!("CARGO_BIN_EXE_nuwa")),
        }
    }

    /// `demo` project with a compiling entry point and a package directory
    pub fn demo() -> Self {
        let env = Self::empty();
        env.write_project_file("pyproject.toml", PYPROJECT);
        env.write_project_file("nim/demo_lib.nim", ENTRY_OK);
        env.write_project_file("demo/__init__.py", "from .demo_lib import *\n");
        env
    }

    pub fn root(&self) -> &Path {
        self.project_root.path()
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Arguments the fake compiler was called with, one line per call
    pub fn compiler_log(&self) -> PathBuf {
        self.tools.path().join("nim.log")
    }

    pub fn write_project_file(&self, relative: &str, content: &str) {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directories");
        }
        std::fs::write(&path, content).expect("write project file");
    }

    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.nuwa_bin);
        cmd.current_dir(self.root())
            .args(args)
            .env("NUWA_COMPILER", self.tools.path().join("nim"))
            .env("NUWA_PYTHON", self.tools.path().join("python"))
            .env("FAKE_NIM_LOG", self.compiler_log())
            .env("NO_COLOR", "1")
            .env("LANG", "C")
            .env_remove("NUWA_PROFILE")
            .env_remove("NUWA_LOG")
            .env_remove("GITHUB_ACTIONS");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = self.command(args);
        for (key, value) in env_vars {
            cmd.env(key, value);
        }
        to_result(cmd.output().expect("failed to execute nuwa"))
    }

    /// Long-running command with piped output
    pub fn spawn(&self, args: &[&str]) -> Child {
        self.command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to start nuwa")
    }
}

pub fn to_result(output: Output) -> TestResult {
    TestResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).expect("write script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("make script executable");
    }
}
