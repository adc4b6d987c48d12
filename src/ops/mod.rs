//! High-level operations.
//!
//! Each stage of a build lives here, together with the coordinator that
//! sequences them.

pub mod clean;
pub mod install;
pub mod pipeline;
pub mod test;
pub mod toolchain;
pub mod verify;

pub use clean::clean;
pub use pipeline::{format_summary, run, PipelineReport, Termination};
pub use toolchain::{ToolchainLocation, ToolchainLocator};
pub use verify::{check_tools, format_report, DoctorReport, TOOL_PROBES};
