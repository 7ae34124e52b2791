//! Peripheral drivers for the Linux host.

pub mod delay;
pub mod gpio;
