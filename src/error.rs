//! Error taxonomy for the capture-cycle pipeline.
//!
//! Each pipeline step owns one error type.  Steps never propagate these
//! past themselves: they are logged, folded into the step's outcome value,
//! and the orchestrator decides which later steps still run.

use core::fmt;

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

/// The still-capture program could not produce an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The capture program could not be started at all.
    Spawn(String),
    /// The program ran but exited unsuccessfully (`None` = killed by signal).
    ExitStatus(Option<i32>),
    /// The program did not finish within the configured timeout.
    TimedOut { secs: u64 },
    /// The program reported success but the output file is missing.
    MissingOutput,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(msg) => write!(f, "failed to start capture program: {msg}"),
            Self::ExitStatus(Some(code)) => write!(f, "capture program exited with status {code}"),
            Self::ExitStatus(None) => write!(f, "capture program terminated by signal"),
            Self::TimedOut { secs } => write!(f, "capture program timed out after {secs}s"),
            Self::MissingOutput => write!(f, "capture program produced no output file"),
        }
    }
}

impl std::error::Error for CaptureError {}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// Nothing to upload: the capture step failed.
    NoCapture,
    /// The local image could not be opened or read.
    Open(String),
    /// An object with the same key already exists in the bucket.
    AlreadyExists(String),
    /// The object store rejected the request or could not be reached.
    Store(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCapture => write!(f, "no captured image to upload"),
            Self::Open(msg) => write!(f, "cannot read local image: {msg}"),
            Self::AlreadyExists(key) => write!(f, "object '{key}' already exists"),
            Self::Store(msg) => write!(f, "object store error: {msg}"),
        }
    }
}

impl std::error::Error for UploadError {}

// ---------------------------------------------------------------------------
// Notify
// ---------------------------------------------------------------------------

/// Messaging failures, split by whether a retry can help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Rate limiting, provider-side 5xx, gateway errors, timeouts.
    Transient(String),
    /// Bad credentials, malformed recipient, rejected media URL.
    Permanent(String),
}

impl NotifyError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient(msg) => write!(f, "transient: {msg}"),
            Self::Permanent(msg) => write!(f, "permanent: {msg}"),
        }
    }
}

impl std::error::Error for NotifyError {}

// ---------------------------------------------------------------------------
// Cleanup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupError {
    /// Removing the remote object failed.
    Remote(String),
    /// Removing the local file failed for a reason other than absence.
    Local(String),
}

impl fmt::Display for CleanupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(msg) => write!(f, "remote delete failed: {msg}"),
            Self::Local(msg) => write!(f, "local delete failed: {msg}"),
        }
    }
}

impl std::error::Error for CleanupError {}
