use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use nuwa::Overrides;

/// Nuwa - build Nim extensions for Python
#[derive(Parser, Debug)]
#[command(name = "nuwa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project directory (the nearest parent holding pyproject.toml is used)
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub project: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Overrides shared by every command that compiles
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Python module name (must be a valid identifier)
    #[arg(long)]
    pub module_name: Option<String>,

    /// Directory holding the Nim sources
    #[arg(long)]
    pub nim_source: Option<PathBuf>,

    /// Nim file to compile, relative to the source directory
    #[arg(long)]
    pub entry_point: Option<PathBuf>,

    /// Where the compiled library goes: `auto`, `src`, or a directory
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Extra compiler flag, appended after config and profile flags (repeatable)
    #[arg(long = "nim-flag", value_name = "FLAG", allow_hyphen_values = true)]
    pub nim_flags: Vec<String>,

    /// Named flag profile from [tool.nuwa.profiles]
    #[arg(short, long)]
    pub profile: Option<String>,
}

impl BuildArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            module_name: self.module_name.clone(),
            source_dir: self.nim_source.clone(),
            entry_point: self.entry_point.clone(),
            output_location: self.output_dir.clone(),
            nim_flags: self.nim_flags.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile and place the library inside the package (debug by default)
    Develop {
        #[command(flatten)]
        build: BuildArgs,

        /// Compile with -d:release
        #[arg(short, long)]
        release: bool,
    },

    /// Compile in release mode and produce a wheel
    Build {
        #[command(flatten)]
        build: BuildArgs,

        /// Output directory for archives, relative to the project
        #[arg(short, long)]
        dist_dir: Option<PathBuf>,

        /// Overwrite existing archives
        #[arg(short, long)]
        force: bool,

        /// Also produce a source archive
        #[arg(long)]
        sdist: bool,
    },

    /// Rebuild whenever a tracked source changes
    Watch {
        #[command(flatten)]
        build: BuildArgs,

        /// Run the test command after each successful build
        #[arg(short = 't', long)]
        run_tests: bool,

        /// Test command (default from [tool.nuwa.watch] or `pytest -v`)
        #[arg(long, requires = "run_tests")]
        test_command: Option<String>,

        /// Rebuild on any .nim file under the source directory
        #[arg(long)]
        watch_all_sources: bool,

        /// Compile with -d:release
        #[arg(short, long)]
        release: bool,
    },

    /// Remove build artifacts and/or installed Nim packages
    Clean {
        /// Remove locally installed Nim packages
        #[arg(long)]
        deps: bool,

        /// Remove build directories and the in-place library
        #[arg(long)]
        artifacts: bool,
    },
}

impl Commands {
    /// Command name used in JSON events
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Develop { .. } => "develop",
            Commands::Build { .. } => "build",
            Commands::Watch { .. } => "watch",
            Commands::Clean { .. } => "clean",
        }
    }
}
