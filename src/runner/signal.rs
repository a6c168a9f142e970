//! Interrupt capture
//!
//! SIGINT and SIGTERM are recorded instead of terminating the tool, so the
//! running child can be signalled and waited for before the plan stops.

use signal_hook::consts::{SIGINT, SIGTERM};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared record of the last interrupt signal received (0 when none)
#[derive(Debug, Clone)]
pub struct InterruptFlag(Arc<AtomicUsize>);

impl InterruptFlag {
    /// Register the process-wide handlers (once) and return the shared flag
    pub fn install() -> io::Result<Self> {
        static FLAG: OnceLock<Arc<AtomicUsize>> = OnceLock::new();

        if let Some(flag) = FLAG.get() {
            return Ok(InterruptFlag(Arc::clone(flag)));
        }

        let flag = Arc::new(AtomicUsize::new(0));
        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register_usize(signal, Arc::clone(&flag), signal as usize)?;
        }
        Ok(InterruptFlag(Arc::clone(FLAG.get_or_init(|| flag))))
    }

    /// A flag no handler writes to
    pub fn detached() -> Self {
        InterruptFlag(Arc::new(AtomicUsize::new(0)))
    }

    /// Signal number received so far, if any
    pub fn received(&self) -> Option<i32> {
        match self.0.load(Ordering::SeqCst) {
            0 => None,
            signal => Some(signal as i32),
        }
    }

    /// Record `signal` as received
    pub fn trigger(&self, signal: i32) {
        self.0.store(signal as usize, Ordering::SeqCst);
    }
}
