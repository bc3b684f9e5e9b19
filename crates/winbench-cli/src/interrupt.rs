//! Process interruption tracking.
//!
//! SIGINT and SIGTERM raise a shared flag instead of killing the process so
//! the driver can stop between calls and exit with a dedicated status. A
//! second SIGINT after the flag is raised terminates immediately.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};

#[cfg(unix)]
use crate::INTERRUPTED_EXIT_STATUS;

#[derive(Debug, Clone, Default)]
pub(crate) struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    /// Registers signal handlers that raise the returned flag.
    pub(crate) fn install() -> io::Result<Self> {
        let flag = Self::default();
        #[cfg(unix)]
        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register_conditional_shutdown(
                signal,
                i32::from(INTERRUPTED_EXIT_STATUS),
                Arc::clone(&flag.raised),
            )?;
            signal_hook::flag::register(signal, Arc::clone(&flag.raised))?;
        }
        Ok(flag)
    }

    pub(crate) fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(crate) fn raise(&self) {
        self.raised.store(true, Ordering::Relaxed);
    }
}
