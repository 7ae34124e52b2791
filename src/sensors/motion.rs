//! PIR motion detector with confirm-after-delay debounce.
//!
//! An HC-SR501-style module drives its output high on detection.  A
//! single high read is not trusted: after the debounce delay the line
//! must still be active before motion is reported.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::{debug, warn};

pub struct MotionDetector<P, D> {
    pin: P,
    delay: D,
    active_high: bool,
    debounce_ms: u32,
}

impl<P: InputPin, D: DelayNs> MotionDetector<P, D> {
    pub fn new(pin: P, delay: D, active_high: bool, debounce_ms: u32) -> Self {
        Self {
            pin,
            delay,
            active_high,
            debounce_ms,
        }
    }

    fn active(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => high == self.active_high,
            Err(e) => {
                warn!("motion detector read failed: {:?}", e);
                false
            }
        }
    }

    /// Debounced detection.  Blocks for the debounce delay only when the
    /// first read is active.
    pub fn is_motion(&mut self) -> bool {
        if !self.active() {
            return false;
        }
        self.delay.delay_ms(self.debounce_ms);
        let confirmed = self.active();
        if !confirmed {
            debug!("motion: spurious trigger rejected after {} ms", self.debounce_ms);
        }
        confirmed
    }
}
