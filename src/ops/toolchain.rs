//! Kaldi discovery.
//!
//! Resolution order:
//! 1. `KALDI_ROOT`, if it names an existing directory
//! 2. a fixed list of conventional locations, each accepted only when it
//!    contains a `src/` subdirectory
//!
//! A location found through the search list is exported as `KALDI_ROOT` to
//! every later subprocess. Nothing is downloaded or built here.

use std::path::{Path, PathBuf};

use crate::builder::context::BuildContext;
use crate::core::{BuildError, BuildResult, Environment, Stage, StageOutcome, TOOLCHAIN_ROOT_VAR};
use crate::util::shell::Status;

/// Steps printed when no Kaldi installation is found.
pub const KALDI_SETUP_GUIDE: &str = "\
Kaldi Setup Instructions:

1. Download and build Kaldi:
   git clone https://github.com/kaldi-asr/kaldi.git
   cd kaldi/tools
   make -j$(nproc)
   cd ../src
   ./configure --shared
   make depend -j$(nproc)
   make -j$(nproc)

2. Set KALDI_ROOT environment variable:
   export KALDI_ROOT=/path/to/kaldi

3. Re-run this build

For more details, see: https://kaldi-asr.org/doc/build_setup.html
Use --force to continue without Kaldi (for binding-only builds).";

/// Where the toolchain came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolchainLocation {
    /// `KALDI_ROOT` was already set and valid.
    FromEnv(PathBuf),
    /// Found on the search list.
    Discovered(PathBuf),
    NotConfigured,
}

/// Searches for a Kaldi tree.
#[derive(Debug, Clone)]
pub struct ToolchainLocator {
    candidates: Vec<PathBuf>,
}

impl ToolchainLocator {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        ToolchainLocator { candidates }
    }

    /// The conventional locations relative to a repository checkout.
    pub fn for_repo(repo_root: &Path) -> Self {
        let mut candidates = Vec::new();
        if let Some(parent) = repo_root.parent() {
            candidates.push(parent.join("kaldi"));
        }
        if let Some(dirs) = directories::BaseDirs::new() {
            let home = dirs.home_dir();
            candidates.push(home.join("kaldi"));
            candidates.push(home.join("travis").join("kaldi"));
        }
        candidates.push(PathBuf::from("/opt/kaldi"));
        candidates.push(PathBuf::from("/usr/local/kaldi"));
        ToolchainLocator { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Resolve the toolchain against `env`.
    pub fn locate(&self, env: &Environment) -> ToolchainLocation {
        if let Some(root) = env.get_os(TOOLCHAIN_ROOT_VAR).filter(|v| !v.is_empty()) {
            let root = PathBuf::from(root);
            if root.is_dir() {
                return ToolchainLocation::FromEnv(root);
            }
            tracing::debug!("{} points at missing {}", TOOLCHAIN_ROOT_VAR, root.display());
        }

        self.candidates
            .iter()
            .find(|c| is_toolchain_tree(c))
            .map(|c| ToolchainLocation::Discovered(c.clone()))
            .unwrap_or(ToolchainLocation::NotConfigured)
    }
}

/// Structural check: the tree has its own `src/`.
fn is_toolchain_tree(path: &Path) -> bool {
    path.is_dir() && path.join("src").is_dir()
}

/// The toolchain stage.
///
/// Returns the outcome and the variables to export downstream (empty
/// unless the toolchain was discovered on the search list).
pub fn locate_toolchain(
    ctx: &BuildContext<'_>,
    host: &Environment,
    locator: &ToolchainLocator,
) -> BuildResult<(StageOutcome, Environment)> {
    ctx.shell.status(Status::Checking, "Kaldi installation");

    match locator.locate(host) {
        ToolchainLocation::FromEnv(root) => {
            let msg = format!("using existing Kaldi installation at {}", root.display());
            ctx.shell.status(Status::Found, &msg);
            Ok((StageOutcome::ok(Stage::Toolchain, msg), Environment::new()))
        }
        ToolchainLocation::Discovered(root) => {
            let msg = format!("found Kaldi installation at {}", root.display());
            ctx.shell.status(Status::Found, &msg);
            let exported =
                Environment::new().with(TOOLCHAIN_ROOT_VAR, root.as_os_str());
            Ok((StageOutcome::ok(Stage::Toolchain, msg), exported))
        }
        ToolchainLocation::NotConfigured => {
            if !ctx.config.force {
                return Err(BuildError::ToolchainNotFound {
                    guidance: KALDI_SETUP_GUIDE.to_string(),
                });
            }
            ctx.shell.warn("Kaldi not found. Please set up Kaldi:");
            ctx.shell.print_block(KALDI_SETUP_GUIDE);
            ctx.shell.warn("continuing without Kaldi (--force enabled)");
            Ok((
                StageOutcome::warned(
                    Stage::Toolchain,
                    "Kaldi not configured; continuing because of --force",
                ),
                Environment::new(),
            ))
        }
    }
}
