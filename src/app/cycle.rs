//! Cycle-scoped data passed between pipeline steps.
//!
//! ```text
//!   CaptureResult ──▶ UploadResult ──▶ NotifyOutcome
//!         │                 │
//!         └──────┬──────────┘
//!                ▼
//!          CleanupReport
//! ```
//!
//! Nothing here outlives a single capture cycle.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::error::{CaptureError, CleanupError, NotifyError, UploadError};

/// Which sensor tripped the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Door,
    Motion,
}

impl TriggerSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Door => "door",
            Self::Motion => "motion",
        }
    }
}

/// Output of the capture step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    /// Intended image path.  May not exist when `success` is false.
    pub local_path: PathBuf,
    pub captured_at: NaiveDateTime,
    pub success: bool,
    pub error: Option<CaptureError>,
}

impl CaptureResult {
    /// File name used as the remote object key.
    pub fn file_name(&self) -> Option<&str> {
        self.local_path.file_name().and_then(|n| n.to_str())
    }
}

/// Output of the upload step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Publicly fetchable URL.  Only set on success.
    pub public_url: Option<String>,
    /// Key the object was (or would have been) stored under.
    pub remote_key: String,
    pub success: bool,
    pub error: Option<UploadError>,
}

impl UploadResult {
    pub(crate) fn failed(remote_key: String, error: UploadError) -> Self {
        Self {
            public_url: None,
            remote_key,
            success: false,
            error: Some(error),
        }
    }

    /// The key to delete remotely, present only after a successful upload.
    pub fn uploaded_key(&self) -> Option<&str> {
        (self.success && self.public_url.is_some()).then_some(self.remote_key.as_str())
    }
}

/// Output of the notify step.  Informational only; never gates cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyOutcome {
    pub delivered: bool,
    /// Provider message id when delivered.
    pub message_id: Option<String>,
    /// Number of send attempts made.
    pub attempts: u32,
    pub error: Option<NotifyError>,
}

/// Result of one cleanup sub-action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupAction {
    /// Nothing to do on this branch (e.g. remote delete after a failed upload).
    Skipped,
    Removed,
    NotFound,
    Failed(CleanupError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub remote: CleanupAction,
    pub local: CleanupAction,
}

/// Summary of a finished cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub trigger: Option<TriggerSource>,
    pub capture: CaptureResult,
    pub upload: UploadResult,
    /// `None` when the upload failed and notify was skipped.
    pub notify: Option<NotifyOutcome>,
    pub cleanup: CleanupReport,
}
