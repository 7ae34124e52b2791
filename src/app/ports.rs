//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (GPIO sensors, camera program, object store, messaging
//! API, clock, sleeper, event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) holds them behind `&mut dyn`
//! handles, so the domain core never touches hardware or the network directly.
//!
//! ## Security notes
//!
//! - **ConfigPort** implementations MUST validate before returning.
//! - Credentials never pass through [`EventSink`]; adapters MUST NOT log them.

use core::fmt;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDateTime;

use crate::config::{Credentials, SystemConfig};
use crate::error::{CaptureError, NotifyError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to sample the door and PIR sensors.
pub trait SensorPort {
    /// `true` when the door contact reads open.
    fn is_door_open(&mut self) -> bool;

    /// `true` when the motion detector reports an active detection.
    /// May block for the debounce period before answering.
    fn is_motion(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Camera port
// ───────────────────────────────────────────────────────────────

pub trait CameraPort {
    /// Capture one still image to `path`.
    fn capture(&mut self, path: &Path) -> Result<(), CaptureError>;
}

// ───────────────────────────────────────────────────────────────
// Object store port
// ───────────────────────────────────────────────────────────────

/// Remote object storage for captured images.
pub trait ObjectStorePort {
    /// Store `bytes` under `key`.  With `allow_overwrite == false` an existing
    /// object MUST cause [`StoreError::AlreadyExists`].  Returns the stored key.
    fn put(
        &mut self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
        allow_overwrite: bool,
    ) -> Result<String, StoreError>;

    /// Publicly fetchable URL for `key`.
    fn public_url(&self, key: &str) -> String;

    /// Delete `keys`.  Returns [`StoreError::NotFound`] when none of them existed.
    fn delete(&mut self, keys: &[&str]) -> Result<(), StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Messaging port
// ───────────────────────────────────────────────────────────────

/// One outbound alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub body: String,
    pub media_url: String,
}

pub trait MessagingPort {
    /// Send a single message.  Returns the provider's message id.
    /// No retries here: the notify step owns the retry policy.
    fn send(&mut self, message: &OutboundMessage) -> Result<String, NotifyError>;
}

// ───────────────────────────────────────────────────────────────
// Clock + sleeper
// ───────────────────────────────────────────────────────────────

/// Local wall-clock time.
pub trait ClockPort {
    fn now(&self) -> NaiveDateTime;
}

/// Blocking, cancellable sleep.  The only suspension point in the system.
pub trait Sleeper {
    /// Sleep for `duration`.  Returns `false` if cut short by a shutdown request.
    fn sleep(&mut self, duration: Duration) -> bool;

    /// Whether shutdown has been requested.
    fn shutdown_requested(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads configuration and credentials at start-up.
///
/// # Security
///
/// Invalid ranges MUST be rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load and validate tunables.  Falls back to [`SystemConfig::default()`]
    /// for anything not overridden.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Load service credentials.  Every field is required.
    fn credentials(&self) -> Result<Credentials, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    Missing(&'static str),
    /// A config source exists but could not be read or parsed.
    Corrupted(String),
    /// A config field failed range validation.
    ValidationFailed(&'static str),
}

/// Errors from [`ObjectStorePort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key already present and overwrite was not allowed.
    AlreadyExists,
    /// Key (or every key in a batch) does not exist.
    NotFound,
    /// The store answered with a non-success status.
    Rejected { status: u16, detail: String },
    /// Connection, TLS, or timeout failure.
    Transport(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(var) => write!(f, "missing required setting {}", var),
            Self::Corrupted(msg) => write!(f, "config unreadable: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => write!(f, "object already exists"),
            Self::NotFound => write!(f, "object not found"),
            Self::Rejected { status, detail } => write!(f, "HTTP {}: {}", status, detail),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
