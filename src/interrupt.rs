//! Environment interrupts (Ctrl+C / SIGINT)

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::error::Result;

/// Shared flag raised by an environment interrupt
///
/// The main loop checks it before each poll and after each dispatched record
/// and stops exactly as it does on the quit signal.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.raised.store(false, Ordering::SeqCst);
    }
}

/// Raises `flag` on Ctrl+C
///
/// Only one handler can be installed per process.
///
/// # Errors
/// Returns [`crate::Error::InterruptHandler`] if a handler is already set or
/// the signal cannot be hooked.
pub fn install(flag: &InterruptFlag) -> Result<()> {
    let flag = flag.clone();
    ctrlc::set_handler(move || {
        info!("Interrupt received");
        flag.trigger();
    })?;
    Ok(())
}
