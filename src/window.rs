//! Active time window.
//!
//! Sensor triggers are only acted upon while the wall-clock time of day
//! falls inside the window.  The window is half-open, `[start, end)`, and
//! may wrap midnight:
//!
//! ```text
//!   start < end   09:00 ─────────── 17:00          start <= t < end
//!   start > end   ──── 08:00        18:00 ────      t >= start || t < end
//!   start == end  always active
//! ```

use core::fmt;
use core::str::FromStr;

use chrono::{NaiveTime, Timelike};

/// Time-of-day interval, evaluated fresh on every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl ActiveWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Build from hour/minute pairs.  Returns `None` on out-of-range values.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0)?,
            end: NaiveTime::from_hms_opt(end.0, end.1, 0)?,
        })
    }

    /// Parse `"HH:MM"` start and end strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, WindowParseError> {
        Ok(Self {
            start: parse_hm(start)?,
            end: parse_hm(end)?,
        })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether `now` falls inside the window.
    pub fn contains(&self, now: NaiveTime) -> bool {
        if self.start < self.end {
            now >= self.start && now < self.end
        } else if self.start > self.end {
            now >= self.start || now < self.end
        } else {
            true
        }
    }
}

impl Default for ActiveWindow {
    /// Overnight watch: 18:00-08:00.
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl fmt::Display for ActiveWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowParseError(pub String);

impl fmt::Display for WindowParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time of day '{}' (expected HH:MM)", self.0)
    }
}

fn parse_hm(s: &str) -> Result<NaiveTime, WindowParseError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| WindowParseError(s.to_string()))
}

impl FromStr for ActiveWindow {
    type Err = WindowParseError;

    /// Parse `"HH:MM-HH:MM"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| WindowParseError(s.to_string()))?;
        Self::parse(start, end)
    }
}
