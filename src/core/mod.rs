//! Core data structures for vosk-build.
//!
//! - Build configuration and its enums
//! - The synthesized process environment
//! - Stage outcomes and the fatal error taxonomy
//! - Repository layout

pub mod config;
pub mod environment;
pub mod errors;
pub mod outcome;
pub mod workspace;

pub use config::{BackendStrategy, Binding, BuildConfiguration, ConfigProfile, MathLibrary};
pub use environment::{synthesize, Environment, SOURCE_ROOT_VAR, TOOLCHAIN_ROOT_VAR};
pub use errors::{BuildError, BuildResult, MissingTool};
pub use outcome::{Stage, StageOutcome, StageStatus};
pub use workspace::Workspace;
