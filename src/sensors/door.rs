//! Magnetic reed-switch door contact.
//!
//! Wired to a GPIO with a pull-up: the magnet holds the switch closed
//! (line low) while the door is shut, so the line reads high when open.
//! Polarity is configurable for normally-open switches.

use embedded_hal::digital::InputPin;
use log::warn;

pub struct DoorContact<P> {
    pin: P,
    open_high: bool,
}

impl<P: InputPin> DoorContact<P> {
    pub fn new(pin: P, open_high: bool) -> Self {
        Self { pin, open_high }
    }

    /// `true` when the door reads open.  Read errors count as closed.
    pub fn is_open(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => high == self.open_high,
            Err(e) => {
                warn!("door contact read failed: {:?}", e);
                false
            }
        }
    }
}
