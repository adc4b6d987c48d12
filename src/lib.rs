//! vosk-build - a build orchestrator for vosk-api
//!
//! This crate verifies host tools, locates Kaldi, synthesizes the build
//! environment and then drives the native library, the language bindings,
//! the smoke tests and the install step in a fixed order.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted command runner and temporary
/// vosk-api checkouts.
#[cfg(test)]
pub mod test_support;

pub use core::{BuildConfiguration, BuildError, Environment, Workspace};
pub use ops::pipeline::PipelineReport;
