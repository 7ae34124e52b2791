//! Sysfs GPIO input driver.
//!
//! ## Hardware
//!
//! The door reed switch and the PIR output are plain digital lines read
//! through `/sys/class/gpio`.  On construction the line is exported (if
//! it isn't already) and switched to input; each read is a fresh read of
//! the `value` file, so no state is cached here.
//!
//! Lines are configured as offsets on the header controller (BCM numbers).
//! Since Linux 6.6 the Raspberry Pi kernels number sysfs lines from the
//! chip's `base` (512 and up), so the offset is added to the base of the
//! `pinctrl-*` gpiochip before exporting.
//!
//! The driver implements [`embedded_hal::digital::InputPin`], keeping the
//! sensor drivers in [`crate::sensors`] independent of the GPIO backend.

use core::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use log::debug;

/// Default sysfs root.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// Label prefix of the SoC pin controller driving the 40-pin header.
const HEADER_CHIP_PREFIX: &str = "pinctrl-";

/// udev needs a moment to fix permissions on a freshly exported line.
const EXPORT_SETTLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// Reading or writing a sysfs attribute failed.
    Io { line: u32, detail: String },
    /// `value` held something other than `0` or `1`.
    BadValue { line: u32, raw: String },
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { line, detail } => write!(f, "gpio{line}: {detail}"),
            Self::BadValue { line, raw } => write!(f, "gpio{line}: unexpected value {raw:?}"),
        }
    }
}

impl std::error::Error for GpioError {}

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A single exported GPIO line configured as input.
#[derive(Debug)]
pub struct SysfsInputPin {
    line: u32,
    value_path: PathBuf,
}

impl SysfsInputPin {
    /// Export header offset `offset` under the default sysfs root.
    pub fn export(offset: u32) -> Result<Self, GpioError> {
        Self::export_at(Path::new(SYSFS_GPIO_ROOT), offset)
    }

    /// Export header offset `offset` under `root`.
    pub fn export_at(root: &Path, offset: u32) -> Result<Self, GpioError> {
        let line = header_chip_base(root) + offset;
        let io = |e: std::io::Error| GpioError::Io {
            line,
            detail: e.to_string(),
        };

        let dir = root.join(format!("gpio{line}"));
        if !dir.exists() {
            debug!("gpio{}: exporting", line);
            fs::write(root.join("export"), line.to_string()).map_err(io)?;
            thread::sleep(EXPORT_SETTLE);
        }
        fs::write(dir.join("direction"), "in").map_err(io)?;

        Ok(Self {
            line,
            value_path: dir.join("value"),
        })
    }

    /// Global sysfs line number (chip base + offset).
    pub fn line(&self) -> u32 {
        self.line
    }

    fn read_level(&self) -> Result<bool, GpioError> {
        let raw = fs::read_to_string(&self.value_path).map_err(|e| GpioError::Io {
            line: self.line,
            detail: e.to_string(),
        })?;
        match raw.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(GpioError::BadValue {
                line: self.line,
                raw: other.to_string(),
            }),
        }
    }
}

/// Base of the header pin controller.
///
/// Prefers a chip labelled `pinctrl-*`; otherwise the lowest base present.
/// A root with no `gpiochip*` entries yields 0.
fn header_chip_base(root: &Path) -> u32 {
    let Ok(entries) = fs::read_dir(root) else {
        return 0;
    };
    let chips: Vec<(String, u32)> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("gpiochip"))
        .filter_map(|e| {
            let dir = e.path();
            let base = fs::read_to_string(dir.join("base")).ok()?.trim().parse().ok()?;
            let label = fs::read_to_string(dir.join("label")).unwrap_or_default();
            Some((label.trim().to_string(), base))
        })
        .collect();

    let base = chips
        .iter()
        .filter(|(label, _)| label.starts_with(HEADER_CHIP_PREFIX))
        .map(|(_, base)| *base)
        .min()
        .or_else(|| chips.iter().map(|(_, base)| *base).min())
        .unwrap_or(0);
    debug!("gpio: header chip base {}", base);
    base
}

impl ErrorType for SysfsInputPin {
    type Error = GpioError;
}

impl InputPin for SysfsInputPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.read_level()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.read_level().map(|high| !high)
    }
}
