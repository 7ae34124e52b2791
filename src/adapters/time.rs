//! Clock and sleep adapters for the host.
//!
//! - [`SystemClock`] reads local wall-clock time via `chrono`.
//! - [`ShutdownSleeper`] sleeps in short slices and returns early once a
//!   shutdown has been requested, either by SIGINT/SIGTERM (see
//!   [`install_signal_handlers`]) or by [`request_shutdown`].
//!
//! The shutdown flag is a process-wide atomic because the signal handler
//! cannot carry state.

use core::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

use crate::app::ports::{ClockPort, Sleeper};

/// Set from the signal handler; read by every [`ShutdownSleeper`].
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Upper bound on how late a shutdown is noticed.
const SLICE: Duration = Duration::from_millis(250);

/// Ask the main loop to stop.  Async-signal-safe.
pub fn request_shutdown() {
    SHUTDOWN_REQUESTED.store(true, Ordering::Release);
}

pub fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::Acquire)
}

extern "C" fn on_terminate(_signal: nix::libc::c_int) {
    request_shutdown();
}

/// Route SIGINT and SIGTERM to [`request_shutdown`].
pub fn install_signal_handlers() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_terminate),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only stores to an atomic.
        unsafe { sigaction(signal, &action) }?;
    }
    Ok(())
}

// ── Clock ─────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

// ── Sleeper ───────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
pub struct ShutdownSleeper;

impl Sleeper for ShutdownSleeper {
    fn sleep(&mut self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if shutdown_requested() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(SLICE.min(deadline - now));
        }
    }

    fn shutdown_requested(&self) -> bool {
        shutdown_requested()
    }
}
