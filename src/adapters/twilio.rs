//! Twilio Messages API adapter (WhatsApp or SMS).
//!
//! One form-encoded `POST /2010-04-01/Accounts/{sid}/Messages.json` per
//! attempt, authenticated with HTTP basic auth.  Retrying is the caller's
//! job; this adapter only classifies failures:
//!
//! - transport errors, 408, 429 and 5xx → [`NotifyError::Transient`]
//! - any other status → [`NotifyError::Permanent`]
//!
//! A 2xx means the message is queued, even when its body cannot be read.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, warn};
use serde::Deserialize;

use crate::app::ports::{MessagingPort, OutboundMessage};
use crate::error::NotifyError;

pub const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Message id reported when a 2xx body carries no readable `sid`.
pub const UNKNOWN_SID: &str = "unknown";

pub struct TwilioMessenger {
    agent: ureq::Agent,
    api_base: String,
    account_sid: String,
    authorization: String,
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<u32>,
    message: Option<String>,
}

impl TwilioMessenger {
    pub fn new(account_sid: &str, auth_token: &str, timeout: Duration) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, account_sid, auth_token, timeout)
    }

    pub fn with_api_base(
        api_base: &str,
        account_sid: &str,
        auth_token: &str,
        timeout: Duration,
    ) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            agent,
            api_base: api_base.trim_end_matches('/').to_string(),
            account_sid: account_sid.to_string(),
            authorization: basic_auth(account_sid, auth_token),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }
}

impl MessagingPort for TwilioMessenger {
    fn send(&mut self, message: &OutboundMessage) -> Result<String, NotifyError> {
        let form = [
            ("From", message.from.as_str()),
            ("To", message.to.as_str()),
            ("Body", message.body.as_str()),
            ("MediaUrl", message.media_url.as_str()),
        ];
        let result = self
            .agent
            .post(&self.messages_url())
            .set("authorization", &self.authorization)
            .send_form(&form);

        match result {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.into_string().unwrap_or_default();
                let sid = queued_sid(status, &body);
                debug!("twilio: queued message {}", sid);
                Ok(sid)
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(classify_status(code, &body))
            }
            Err(ureq::Error::Transport(t)) => Err(NotifyError::Transient(t.to_string())),
        }
    }
}

fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user}:{password}")))
}

fn queued_sid(status: u16, body: &str) -> String {
    match serde_json::from_str::<MessageResource>(body) {
        Ok(created) => created.sid,
        Err(e) => {
            warn!("twilio: HTTP {status} with unreadable body ({e}); treating as sent");
            UNKNOWN_SID.to_string()
        }
    }
}

fn classify_status(status: u16, body: &str) -> NotifyError {
    let detail = match serde_json::from_str::<ApiError>(body) {
        Ok(ApiError {
            code: Some(code),
            message: Some(msg),
        }) => format!("HTTP {status} ({code}): {msg}"),
        _ => format!("HTTP {status}"),
    };
    match status {
        408 | 429 | 500..=599 => NotifyError::Transient(detail),
        _ => NotifyError::Permanent(detail),
    }
}
