//! CLI definitions using clap.

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell as CompletionShell;

use vosk_build::core::{BackendStrategy, Binding, BuildConfiguration, ConfigProfile, MathLibrary};
use vosk_build::util::shell::ColorChoice;

/// vosk-build - Automated build for vosk-api
#[derive(Parser)]
#[command(name = "vosk-build")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
Examples:
  vosk-build                          Build C++ library and Python bindings
  vosk-build --config Debug           Debug build
  vosk-build --math-lib mkl --cuda    MKL with CUDA support
  vosk-build --java --csharp          Build all bindings
  vosk-build --bindings-only          Only build language bindings
  vosk-build --install --test         Build, test and install")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Verbose output (echo subprocess output)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_name = "WHEN")]
    pub color: ColorChoice,

    /// Output format for status messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the required host tools are installed
    Doctor,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Build configuration
    #[arg(long, value_enum, default_value_t = ConfigProfile::Release)]
    pub config: ConfigProfile,

    /// Math library to use
    #[arg(long, value_enum, default_value_t = MathLibrary::Auto)]
    pub math_lib: MathLibrary,

    /// Enable CUDA support
    #[arg(long)]
    pub cuda: bool,

    /// Use CMake instead of Make
    #[arg(long)]
    pub use_cmake: bool,

    /// Build Python bindings (default)
    #[arg(long, overrides_with = "no_python")]
    pub python: bool,

    /// Skip Python bindings
    #[arg(long, overrides_with = "python")]
    pub no_python: bool,

    /// Build Java bindings
    #[arg(long)]
    pub java: bool,

    /// Build C# bindings
    #[arg(long)]
    pub csharp: bool,

    /// Only build language bindings (skip the C++ library)
    #[arg(long)]
    pub bindings_only: bool,

    /// Build a Python wheel instead of a development install
    #[arg(long)]
    pub wheel: bool,

    /// Install after building
    #[arg(long)]
    pub install: bool,

    /// Installation prefix
    #[arg(long, default_value = "/usr/local", value_name = "PATH")]
    pub install_prefix: PathBuf,

    /// Run smoke tests after building
    #[arg(long)]
    pub test: bool,

    /// Continue on non-critical errors
    #[arg(long)]
    pub force: bool,

    /// Remove the build directory first
    #[arg(long)]
    pub clean: bool,

    /// vosk-api checkout to build (defaults to current directory)
    #[arg(long, env = "VOSK_REPO_ROOT", value_name = "DIR")]
    pub repo_root: Option<PathBuf>,

    /// Python interpreter for bindings, package checks and tests
    #[arg(long, env = "PYTHON", default_value = "python3", value_name = "PROGRAM")]
    pub python_interpreter: String,
}

impl BuildArgs {
    pub fn to_config(&self, verbose: bool) -> BuildConfiguration {
        let mut bindings = BTreeSet::new();
        // Python is on unless the last of --python/--no-python was --no-python.
        if self.python || !self.no_python {
            bindings.insert(Binding::Python);
        }
        if self.java {
            bindings.insert(Binding::Java);
        }
        if self.csharp {
            bindings.insert(Binding::Csharp);
        }

        BuildConfiguration {
            profile: self.config,
            math_library: self.math_lib,
            cuda: self.cuda,
            backend: if self.use_cmake {
                BackendStrategy::Generator
            } else {
                BackendStrategy::DirectMake
            },
            bindings,
            bindings_only: self.bindings_only,
            wheel: self.wheel,
            install: self.install,
            install_prefix: self.install_prefix.clone(),
            test: self.test,
            force: self.force,
            verbose,
            clean: self.clean,
            python_interpreter: self.python_interpreter.clone(),
        }
    }
}
