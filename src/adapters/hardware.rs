//! Hardware adapter: bridges the sensor drivers to [`SensorPort`].
//!
//! Generic over the pin and delay types so integration tests can drive it
//! with mock pins; production uses [`SysfsInputPin`] and [`StdDelay`]
//! (see [`HardwareAdapter::open`]).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::app::ports::SensorPort;
use crate::config::SystemConfig;
use crate::drivers::delay::StdDelay;
use crate::drivers::gpio::{GpioError, SysfsInputPin};
use crate::sensors::door::DoorContact;
use crate::sensors::motion::MotionDetector;

/// Concrete adapter that combines both sensors behind [`SensorPort`].
pub struct HardwareAdapter<DP, MP, D> {
    door: DoorContact<DP>,
    motion: MotionDetector<MP, D>,
}

impl<DP: InputPin, MP: InputPin, D: DelayNs> HardwareAdapter<DP, MP, D> {
    pub fn new(door: DoorContact<DP>, motion: MotionDetector<MP, D>) -> Self {
        Self { door, motion }
    }
}

impl HardwareAdapter<SysfsInputPin, SysfsInputPin, StdDelay> {
    /// Export both GPIO lines named in `config`.
    pub fn open(config: &SystemConfig) -> Result<Self, GpioError> {
        let door = DoorContact::new(
            SysfsInputPin::export(config.door_gpio)?,
            config.door_open_high,
        );
        let motion = MotionDetector::new(
            SysfsInputPin::export(config.motion_gpio)?,
            StdDelay,
            config.motion_active_high,
            config.motion_debounce_ms,
        );
        Ok(Self::new(door, motion))
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<DP: InputPin, MP: InputPin, D: DelayNs> SensorPort for HardwareAdapter<DP, MP, D> {
    fn is_door_open(&mut self) -> bool {
        self.door.is_open()
    }

    fn is_motion(&mut self) -> bool {
        self.motion.is_motion()
    }
}
