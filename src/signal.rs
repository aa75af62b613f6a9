//! Signal flags for log rotation and graceful shutdown.
//!
//! Handlers only set an atomic; the capture loop consumes the flags once
//! per iteration, so rotation never runs concurrently with a log write
//! and shutdown is always cooperative.

use crate::error::Result;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};

static ROTATE_REQUESTED: AtomicBool = AtomicBool::new(false);
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_rotate(_sig: libc::c_int) {
    ROTATE_REQUESTED.store(true, Ordering::SeqCst);
}

extern "C" fn on_shutdown(_sig: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// Handle to the process signal flags.
///
/// `install()` registers SIGUSR1 (rotate the snapshot log) and
/// SIGINT/SIGTERM (stop the loop); `manual()` gives the same handle
/// without touching handlers, for tests and programmatic control.
pub struct SignalFlags(());

impl SignalFlags {
    pub fn install() -> Result<Self> {
        install_handler(libc::SIGUSR1, on_rotate as usize)?;
        install_handler(libc::SIGINT, on_shutdown as usize)?;
        install_handler(libc::SIGTERM, on_shutdown as usize)?;
        Ok(Self(()))
    }

    pub fn manual() -> Self {
        ROTATE_REQUESTED.store(false, Ordering::SeqCst);
        SHUTDOWN_REQUESTED.store(false, Ordering::SeqCst);
        Self(())
    }

    /// Consumes a pending rotation request.
    pub fn take_rotate(&self) -> bool {
        ROTATE_REQUESTED.swap(false, Ordering::SeqCst)
    }

    pub fn shutdown_requested(&self) -> bool {
        SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
    }

    pub fn request_rotate(&self) {
        ROTATE_REQUESTED.store(true, Ordering::SeqCst);
    }

    pub fn request_shutdown(&self) {
        SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
    }
}

fn install_handler(signum: libc::c_int, handler: usize) -> Result<()> {
    let mut action: libc::sigaction = unsafe { mem::zeroed() };
    action.sa_sigaction = handler;
    action.sa_flags = libc::SA_RESTART;
    unsafe {
        libc::sigemptyset(&mut action.sa_mask);
        if libc::sigaction(signum, &action, std::ptr::null_mut()) != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
    }
    Ok(())
}
