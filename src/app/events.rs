//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (log lines, test recorders).

use std::path::PathBuf;

use log::Level;

use super::cycle::{CleanupAction, CycleReport, TriggerSource};
use crate::error::{CaptureError, NotifyError, UploadError};
use crate::fsm::StateId;
use crate::window::ActiveWindow;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries initial state and window).
    Started { state: StateId, window: ActiveWindow },

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A still was written to disk.
    Captured {
        path: PathBuf,
        trigger: Option<TriggerSource>,
    },
    CaptureFailed { path: PathBuf, error: CaptureError },

    /// The still is in the object store.
    Uploaded { key: String, url: String },
    UploadFailed { key: String, error: UploadError },

    /// The alert was accepted by the messaging provider.
    Notified { message_id: String, attempts: u32 },
    NotifyFailed { attempts: u32, error: NotifyError },

    /// Remote object cleanup result.
    RemoteCleanup { key: String, action: CleanupAction },

    /// Local file cleanup result.
    LocalCleanup { path: PathBuf, action: CleanupAction },

    /// End-of-cycle summary.
    CycleCompleted(Box<CycleReport>),

    /// The loop is exiting after a shutdown request.
    Stopped,
}

impl AppEvent {
    /// Severity used when the event is written to the log.
    pub fn level(&self) -> Level {
        match self {
            Self::Started { .. } | Self::Stopped => Level::Info,
            Self::StateChanged { .. } | Self::CycleCompleted(_) => Level::Debug,
            Self::Captured { .. } | Self::Uploaded { .. } | Self::Notified { .. } => Level::Info,
            Self::CaptureFailed { .. } | Self::UploadFailed { .. } => Level::Error,
            Self::NotifyFailed { .. } => Level::Warn,
            Self::RemoteCleanup { action, .. } | Self::LocalCleanup { action, .. } => match action {
                CleanupAction::Removed | CleanupAction::NotFound => Level::Info,
                CleanupAction::Skipped => Level::Debug,
                CleanupAction::Failed(_) => Level::Warn,
            },
        }
    }
}
