//! Ctrl-C tracking.
//!
//! The handler only records that SIGINT arrived. The child process in the
//! foreground receives the same signal from the terminal and exits; the
//! runner and the pipeline then observe the flag and stop with
//! [`BuildError::Interrupted`](crate::core::BuildError::Interrupted).

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn on_sigint(_signal: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Install the SIGINT handler. Call once from `main`.
#[cfg(unix)]
pub fn install_handler() {
    let handler: extern "C" fn(libc::c_int) = on_sigint;
    // SAFETY: the handler only performs an atomic store, which is
    // async-signal-safe.
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
pub fn install_handler() {}

/// Whether an interrupt has been received.
pub fn requested() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Whether an exit status means the child died from SIGINT.
#[cfg(unix)]
pub fn killed_by_interrupt(status: &std::process::ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(libc::SIGINT)
}

#[cfg(not(unix))]
pub fn killed_by_interrupt(_status: &std::process::ExitStatus) -> bool {
    false
}
