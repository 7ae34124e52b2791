//! Blocking delay backed by `std::thread::sleep`.

use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// [`DelayNs`] for a hosted target.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
