//! Build configuration parsed once from the command line.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

/// Build profile handed to the native backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize)]
pub enum ConfigProfile {
    #[value(name = "Debug")]
    Debug,
    #[default]
    #[value(name = "Release")]
    Release,
    #[value(name = "RelWithDebInfo")]
    RelWithDebInfo,
}

impl ConfigProfile {
    /// The name CMake and the Makefiles expect.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigProfile::Debug => "Debug",
            ConfigProfile::Release => "Release",
            ConfigProfile::RelWithDebInfo => "RelWithDebInfo",
        }
    }
}

impl fmt::Display for ConfigProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Linear algebra backend for the native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MathLibrary {
    Openblas,
    Mkl,
    /// Let the backend pick.
    #[default]
    Auto,
}

impl fmt::Display for MathLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathLibrary::Openblas => write!(f, "openblas"),
            MathLibrary::Mkl => write!(f, "mkl"),
            MathLibrary::Auto => write!(f, "auto"),
        }
    }
}

/// How the native library is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendStrategy {
    /// CMake configure + build in an out-of-tree directory.
    Generator,
    /// Recursive make inside `src/`.
    #[default]
    DirectMake,
}

impl fmt::Display for BackendStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStrategy::Generator => write!(f, "CMake"),
            BackendStrategy::DirectMake => write!(f, "Make"),
        }
    }
}

/// An optional language binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Binding {
    Python,
    Java,
    Csharp,
}

impl Binding {
    pub const ALL: [Binding; 3] = [Binding::Python, Binding::Java, Binding::Csharp];
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Python => write!(f, "Python"),
            Binding::Java => write!(f, "Java"),
            Binding::Csharp => write!(f, "C#"),
        }
    }
}

/// Immutable description of one orchestrator run.
///
/// When `bindings_only` is set the toolchain lookup and the native build are
/// skipped entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
    pub profile: ConfigProfile,
    pub math_library: MathLibrary,
    pub cuda: bool,
    pub backend: BackendStrategy,
    pub bindings: BTreeSet<Binding>,
    pub bindings_only: bool,
    pub wheel: bool,
    pub install: bool,
    pub install_prefix: PathBuf,
    pub test: bool,
    pub force: bool,
    pub verbose: bool,
    pub clean: bool,
    /// Interpreter used for the Python binding, package checks and smoke tests.
    pub python_interpreter: String,
}

impl BuildConfiguration {
    /// Whether a binding was requested on the command line.
    pub fn wants(&self, binding: Binding) -> bool {
        self.bindings.contains(&binding)
    }

    /// Whether the native core (and therefore the toolchain) is part of this run.
    pub fn builds_native(&self) -> bool {
        !self.bindings_only
    }
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        BuildConfiguration {
            profile: ConfigProfile::default(),
            math_library: MathLibrary::default(),
            cuda: false,
            backend: BackendStrategy::default(),
            bindings: BTreeSet::from([Binding::Python]),
            bindings_only: false,
            wheel: false,
            install: false,
            install_prefix: PathBuf::from("/usr/local"),
            test: false,
            force: false,
            verbose: false,
            clean: false,
            python_interpreter: "python3".to_string(),
        }
    }
}
