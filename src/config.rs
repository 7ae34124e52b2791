//! System configuration parameters
//!
//! All tunable parameters for the SentryCam monitor.  Values start from
//! [`SystemConfig::default()`] and can be overridden by a JSON file or
//! environment variables (see [`EnvConfig`](crate::adapters::env_config::EnvConfig)).
//!
//! Secrets live in [`Credentials`], which is never serialised.

use core::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::retry::RetryPolicy;
use crate::window::ActiveWindow;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Active window ---
    /// Window start, local time `HH:MM` (inclusive)
    pub active_start: String,
    /// Window end, local time `HH:MM` (exclusive)
    pub active_end: String,

    // --- Polling cadence ---
    /// Sensor poll interval while inside the window (seconds)
    pub poll_interval_secs: u32,
    /// Sleep between window checks while outside it (seconds)
    pub idle_interval_secs: u32,
    /// Motion must still read active after this long (milliseconds)
    pub motion_debounce_ms: u32,

    // --- Capture ---
    /// Still-capture program (invoked as `<program> <args..> -o <path>`)
    pub capture_program: String,
    /// Extra arguments placed before `-o <path>`
    pub capture_args: Vec<String>,
    /// Kill the capture program after this long (seconds)
    pub capture_timeout_secs: u32,
    /// Directory for captured images
    pub image_dir: PathBuf,

    // --- Upload ---
    /// Object store bucket
    pub bucket: String,
    /// Per-request timeout for the object store (seconds)
    pub upload_timeout_secs: u32,
    /// Wait after a successful upload before notifying (seconds)
    pub storage_settle_secs: u32,

    // --- Notify ---
    /// Message body sent with every alert
    pub message_body: String,
    /// Per-attempt transport timeout (seconds)
    pub notify_timeout_secs: u32,
    /// Retry schedule for transient messaging failures
    pub notify_retry: RetryPolicy,
    /// Wait after notifying before deleting the media (seconds)
    pub settle_secs: u32,

    // --- GPIO ---
    /// Door contact GPIO offset on the header controller (BCM number)
    pub door_gpio: u32,
    /// Door reads open when the line is high (reed switch with pull-up)
    pub door_open_high: bool,
    /// PIR motion detector GPIO offset on the header controller (BCM number)
    pub motion_gpio: u32,
    /// Motion is active when the line is high
    pub motion_active_high: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Window
            active_start: "18:00".into(),
            active_end: "08:00".into(),

            // Cadence
            poll_interval_secs: 10,
            idle_interval_secs: 60,
            motion_debounce_ms: 1_000,

            // Capture
            capture_program: "rpicam-still".into(),
            capture_args: Vec::new(),
            capture_timeout_secs: 30,
            image_dir: PathBuf::from("images"),

            // Upload
            bucket: "security-camera-images".into(),
            upload_timeout_secs: 30,
            storage_settle_secs: 3,

            // Notify
            message_body: "Motion detected!".into(),
            notify_timeout_secs: 10,
            notify_retry: RetryPolicy::default(),
            settle_secs: 20,

            // GPIO (BCM numbering)
            door_gpio: 17,
            door_open_high: true,
            motion_gpio: 22,
            motion_active_high: true,
        }
    }
}

impl SystemConfig {
    /// Parsed active window.
    pub fn window(&self) -> Result<ActiveWindow, ConfigError> {
        ActiveWindow::parse(&self.active_start, &self.active_end)
            .map_err(|_| ConfigError::ValidationFailed("active_start/active_end must be HH:MM"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.poll_interval_secs))
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.idle_interval_secs))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.settle_secs))
    }

    pub fn storage_settle_delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.storage_settle_secs))
    }

    pub fn motion_debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.motion_debounce_ms))
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window()?;
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_secs must be > 0"));
        }
        if self.idle_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("idle_interval_secs must be > 0"));
        }
        if self.capture_program.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("capture_program must not be empty"));
        }
        if self.capture_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed("capture_timeout_secs must be > 0"));
        }
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("bucket must not be empty"));
        }
        if self.upload_timeout_secs == 0 || self.notify_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed("network timeouts must be > 0"));
        }
        if self.notify_retry.max_attempts == 0 {
            return Err(ConfigError::ValidationFailed("notify_retry.max_attempts must be > 0"));
        }
        if self.notify_retry.base_delay_ms > self.notify_retry.max_delay_ms {
            return Err(ConfigError::ValidationFailed(
                "notify_retry.base_delay_ms must not exceed max_delay_ms",
            ));
        }
        if self.door_gpio == self.motion_gpio {
            return Err(ConfigError::ValidationFailed("door and motion must use different GPIO lines"));
        }
        Ok(())
    }
}

/// Service credentials and phone numbers.  Sourced from the environment only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Object store base URL, e.g. `https://<project>.supabase.co`
    pub storage_url: String,
    /// Object store service key
    pub storage_key: String,
    /// Messaging account identifier
    pub account_sid: String,
    /// Messaging auth token
    pub auth_token: String,
    /// Sender number, e.g. `whatsapp:+14155238886`
    pub from_number: String,
    /// Recipient number
    pub to_number: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("storage_url", &self.storage_url)
            .field("storage_key", &"<redacted>")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("to_number", &self.to_number)
            .finish()
    }
}
