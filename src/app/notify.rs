//! Notify step.
//!
//! Sends the alert with the uploaded image attached, retrying transient
//! failures on the [`RetryPolicy`] schedule.  Permanent failures stop
//! immediately.  The outcome is informational: cleanup runs either way.

use log::{debug, warn};

use super::cycle::{NotifyOutcome, UploadResult};
use super::ports::{MessagingPort, OutboundMessage, Sleeper};
use crate::error::NotifyError;
use crate::retry::RetryPolicy;

/// Fixed sender, recipient and body for every alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRoute {
    pub from: String,
    pub to: String,
    pub body: String,
}

impl MessageRoute {
    fn message(&self, media_url: &str) -> OutboundMessage {
        OutboundMessage {
            from: self.from.clone(),
            to: self.to.clone(),
            body: self.body.clone(),
            media_url: media_url.to_string(),
        }
    }
}

/// Notify about a finished upload.  Returns `None` (and sends nothing)
/// unless the upload succeeded with a public URL.
pub fn notify(
    messenger: &mut dyn MessagingPort,
    sleeper: &mut dyn Sleeper,
    policy: &RetryPolicy,
    route: &MessageRoute,
    upload: &UploadResult,
) -> Option<NotifyOutcome> {
    let url = upload.public_url.as_deref().filter(|_| upload.success)?;
    Some(send_with_retry(messenger, sleeper, policy, &route.message(url)))
}

/// Send `message`, retrying transient failures.
pub fn send_with_retry(
    messenger: &mut dyn MessagingPort,
    sleeper: &mut dyn Sleeper,
    policy: &RetryPolicy,
    message: &OutboundMessage,
) -> NotifyOutcome {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let err = match messenger.send(message) {
            Ok(id) => {
                debug!("notify: delivered as {} on attempt {}", id, attempt);
                return NotifyOutcome {
                    delivered: true,
                    message_id: Some(id),
                    attempts: attempt,
                    error: None,
                };
            }
            Err(e) => e,
        };

        let retry_in = match &err {
            NotifyError::Transient(_) => policy.delay_after(attempt),
            NotifyError::Permanent(_) => None,
        };
        let Some(delay) = retry_in else {
            return failed(attempt, err);
        };

        warn!(
            "notify: attempt {}/{} failed ({}), retrying in {:?}",
            attempt, policy.max_attempts, err, delay
        );
        if !sleeper.sleep(delay) {
            warn!("notify: shutdown requested, abandoning retries");
            return failed(attempt, err);
        }
    }
}

fn failed(attempts: u32, error: NotifyError) -> NotifyOutcome {
    NotifyOutcome {
        delivered: false,
        message_id: None,
        attempts,
        error: Some(error),
    }
}
