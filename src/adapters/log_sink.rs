//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! structured line through the `log` facade, at the level returned by
//! [`AppEvent::level`].  `env_logger` sends it to stderr, where journald
//! (or whatever supervises the process) takes over.

use log::log;

use crate::app::cycle::CleanupAction;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn action_str(action: &CleanupAction) -> String {
    match action {
        CleanupAction::Skipped => "skipped".into(),
        CleanupAction::Removed => "removed".into(),
        CleanupAction::NotFound => "not found".into(),
        CleanupAction::Failed(e) => format!("failed: {e}"),
    }
}

/// Render an event as a single log line.
pub fn format_event(event: &AppEvent) -> String {
    match event {
        AppEvent::Started { state, window } => {
            format!("START | initial_state={:?} | window={}", state, window)
        }
        AppEvent::StateChanged { from, to } => format!("STATE | {:?} -> {:?}", from, to),
        AppEvent::Captured { path, trigger } => format!(
            "CAPTURE | {} | trigger={}",
            path.display(),
            trigger.map_or("unknown", |t| t.as_str())
        ),
        AppEvent::CaptureFailed { path, error } => {
            format!("CAPTURE | {} | failed: {}", path.display(), error)
        }
        AppEvent::Uploaded { key, url } => format!("UPLOAD | {} | url={}", key, url),
        AppEvent::UploadFailed { key, error } => format!("UPLOAD | {} | failed: {}", key, error),
        AppEvent::Notified {
            message_id,
            attempts,
        } => format!("NOTIFY | sent id={} | attempts={}", message_id, attempts),
        AppEvent::NotifyFailed { attempts, error } => {
            format!("NOTIFY | failed after {} attempt(s): {}", attempts, error)
        }
        AppEvent::RemoteCleanup { key, action } => {
            format!("CLEANUP | remote {} | {}", key, action_str(action))
        }
        AppEvent::LocalCleanup { path, action } => {
            format!("CLEANUP | local {} | {}", path.display(), action_str(action))
        }
        AppEvent::CycleCompleted(report) => format!(
            "CYCLE | trigger={} | captured={} uploaded={} notified={}",
            report.trigger.map_or("unknown", |t| t.as_str()),
            report.capture.success,
            report.upload.success,
            report.notify.as_ref().is_some_and(|n| n.delivered),
        ),
        AppEvent::Stopped => "STOP | shutdown requested".into(),
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        log!(event.level(), "{}", format_event(event));
    }
}
