//! Native library and language binding builds.
//!
//! Everything here shells out through the [`BuildContext`]'s command runner.

pub mod backend;
pub mod bindings;
pub mod cmake;
pub mod context;
pub mod events;
pub mod make;

pub use backend::{backend_for, NativeBackend};
pub use context::BuildContext;
pub use events::BuildEvent;
