//! Process environment handed to every subprocess.
//!
//! An [`Environment`] is built once per run: the host variables are
//! snapshotted, then the configuration-derived entries from [`synthesize`]
//! are laid over them. Stages receive it by reference and derive scoped
//! copies when they need an extra variable; nothing writes back to the
//! orchestrator's own process environment.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

use crate::core::config::{BuildConfiguration, ConfigProfile, MathLibrary};

/// Variable naming the Kaldi installation.
pub const TOOLCHAIN_ROOT_VAR: &str = "KALDI_ROOT";

/// Variable pointing the Python extension builder at the repository.
pub const SOURCE_ROOT_VAR: &str = "VOSK_SOURCE";

/// Ordered name -> value mapping.
///
/// Names and values are kept as OS strings so host variables that are not
/// valid unicode still reach the children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Environment::default()
    }

    /// Snapshot the current process environment.
    pub fn from_host() -> Self {
        Environment {
            vars: std::env::vars_os().collect(),
        }
    }

    /// Return a copy with one variable set.
    pub fn with(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Return a copy with every entry of `other` laid on top. Last write wins.
    pub fn overlay(mut self, other: &Environment) -> Self {
        for (k, v) in &other.vars {
            self.vars.insert(k.clone(), v.clone());
        }
        self
    }

    /// Look up a variable whose value is valid unicode.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_os(key).and_then(OsStr::to_str)
    }

    pub fn get_os(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(OsStr::new(key))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over the variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }
}

impl<K: Into<OsString>, V: Into<OsString>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Environment {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Compiler flags for a build profile.
pub fn extra_cflags(profile: ConfigProfile) -> &'static str {
    match profile {
        ConfigProfile::Release => "-O3 -DNDEBUG",
        ConfigProfile::Debug => "-g -O0",
        ConfigProfile::RelWithDebInfo => "-O2 -g",
    }
}

/// Turn a configuration into the variables the native build reads.
///
/// Pure: the same configuration always yields the same mapping. With
/// `MathLibrary::Auto` neither math flag is set and the Makefiles decide.
pub fn synthesize(config: &BuildConfiguration) -> Environment {
    let mut env = Environment::new()
        .with("CMAKE_BUILD_TYPE", config.profile.as_str())
        .with("EXTRA_CFLAGS", extra_cflags(config.profile));

    match config.math_library {
        MathLibrary::Openblas => {
            env = env.with("HAVE_OPENBLAS_CLAPACK", "1").with("HAVE_MKL", "0");
        }
        MathLibrary::Mkl => {
            env = env.with("HAVE_MKL", "1").with("HAVE_OPENBLAS_CLAPACK", "0");
        }
        MathLibrary::Auto => {}
    }

    env.with("HAVE_CUDA", if config.cuda { "1" } else { "0" })
}
