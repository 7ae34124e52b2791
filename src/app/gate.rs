//! Sensor gate: decides whether a capture cycle should run.
//!
//! Trigger condition: `active_window(now) && (door_open || motion)`.
//! Sensors are only read inside the window, and the (debounced, slower)
//! motion read is skipped when the door already reads open.

use chrono::NaiveDateTime;

use super::cycle::TriggerSource;
use super::ports::SensorPort;
use crate::window::ActiveWindow;

/// One sample of the gate inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateSnapshot {
    /// `now` was inside the active window.
    pub active: bool,
    pub door_open: bool,
    pub motion: bool,
}

impl GateSnapshot {
    /// The sensor that fired, if the gate is open.
    pub fn trigger(&self) -> Option<TriggerSource> {
        if !self.active {
            None
        } else if self.door_open {
            Some(TriggerSource::Door)
        } else if self.motion {
            Some(TriggerSource::Motion)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SensorGate {
    window: ActiveWindow,
}

impl SensorGate {
    pub fn new(window: ActiveWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> ActiveWindow {
        self.window
    }

    pub fn is_active_time(&self, now: NaiveDateTime) -> bool {
        self.window.contains(now.time())
    }

    /// Evaluate the window and, if active, the sensors.
    pub fn sample(&self, now: NaiveDateTime, sensors: &mut dyn SensorPort) -> GateSnapshot {
        if !self.is_active_time(now) {
            return GateSnapshot::default();
        }
        let door_open = sensors.is_door_open();
        let motion = !door_open && sensors.is_motion();
        GateSnapshot {
            active: true,
            door_open,
            motion,
        }
    }

    pub fn should_trigger(&self, now: NaiveDateTime, sensors: &mut dyn SensorPort) -> bool {
        self.sample(now, sensors).trigger().is_some()
    }
}
