//! Environment-backed configuration adapter.
//!
//! Load order for [`SystemConfig`]:
//!
//! 1. [`SystemConfig::default()`]
//! 2. JSON file named by `SENTRYCAM_CONFIG` (partial files are fine)
//! 3. individual `SENTRYCAM_*` overrides (see [`EnvConfig::load`])
//! 4. [`SystemConfig::validate`]
//!
//! Credentials come from the environment only.  Twilio variables accept
//! both the `TWILIO_*` names and the older lowercase ones
//! (`account_sid`, `auth_token`, `from_number`, `to_number`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::{Credentials, SystemConfig};
use crate::window::ActiveWindow;

pub const CONFIG_FILE_VAR: &str = "SENTRYCAM_CONFIG";

/// Snapshot of the process environment.
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn require(&self, names: &[&'static str]) -> Result<String, ConfigError> {
        names
            .iter()
            .find_map(|n| self.get(n))
            .map(str::to_string)
            .ok_or(ConfigError::Missing(names[0]))
    }

    fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, ConfigError> {
        self.get(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| ConfigError::Corrupted(format!("{name}={raw:?} is not valid")))
            })
            .transpose()
    }

    fn base(&self) -> Result<SystemConfig, ConfigError> {
        let Some(path) = self.get(CONFIG_FILE_VAR) else {
            return Ok(SystemConfig::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Corrupted(format!("{path}: {e}")))?;
        let cfg = serde_json::from_str(&text)
            .map_err(|e| ConfigError::Corrupted(format!("{path}: {e}")))?;
        info!("EnvConfig: loaded {}", path);
        Ok(cfg)
    }
}

/// Assign `$field` from `$var` when set.
macro_rules! overlay {
    ($env:expr, $cfg:expr, { $($var:literal => $field:ident),* $(,)? }) => {
        $(
            if let Some(v) = $env.parse($var)? {
                $cfg.$field = v;
            }
        )*
    };
}

impl ConfigPort for EnvConfig {
    /// Recognised overrides: `SENTRYCAM_WINDOW` (`HH:MM-HH:MM`),
    /// `SENTRYCAM_ACTIVE_START`, `SENTRYCAM_ACTIVE_END`,
    /// `SENTRYCAM_POLL_INTERVAL_SECS`, `SENTRYCAM_IDLE_INTERVAL_SECS`,
    /// `SENTRYCAM_MOTION_DEBOUNCE_MS`, `SENTRYCAM_CAPTURE_PROGRAM`,
    /// `SENTRYCAM_CAPTURE_TIMEOUT_SECS`, `SENTRYCAM_IMAGE_DIR`,
    /// `SENTRYCAM_BUCKET`, `SENTRYCAM_MESSAGE_BODY`, `SENTRYCAM_SETTLE_SECS`,
    /// `SENTRYCAM_DOOR_GPIO`, `SENTRYCAM_MOTION_GPIO`.
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let mut cfg = self.base()?;

        if let Some(window) = self.parse::<ActiveWindow>("SENTRYCAM_WINDOW")? {
            cfg.active_start = window.start().format("%H:%M").to_string();
            cfg.active_end = window.end().format("%H:%M").to_string();
        }
        overlay!(self, cfg, {
            "SENTRYCAM_ACTIVE_START" => active_start,
            "SENTRYCAM_ACTIVE_END" => active_end,
            "SENTRYCAM_POLL_INTERVAL_SECS" => poll_interval_secs,
            "SENTRYCAM_IDLE_INTERVAL_SECS" => idle_interval_secs,
            "SENTRYCAM_MOTION_DEBOUNCE_MS" => motion_debounce_ms,
            "SENTRYCAM_CAPTURE_PROGRAM" => capture_program,
            "SENTRYCAM_CAPTURE_TIMEOUT_SECS" => capture_timeout_secs,
            "SENTRYCAM_BUCKET" => bucket,
            "SENTRYCAM_MESSAGE_BODY" => message_body,
            "SENTRYCAM_SETTLE_SECS" => settle_secs,
            "SENTRYCAM_DOOR_GPIO" => door_gpio,
            "SENTRYCAM_MOTION_GPIO" => motion_gpio,
        });
        if let Some(dir) = self.parse::<PathBuf>("SENTRYCAM_IMAGE_DIR")? {
            cfg.image_dir = dir;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn credentials(&self) -> Result<Credentials, ConfigError> {
        Ok(Credentials {
            storage_url: self.require(&["SUPABASE_URL"])?,
            storage_key: self.require(&["SUPABASE_SERVICE_KEY"])?,
            account_sid: self.require(&["TWILIO_ACCOUNT_SID", "account_sid"])?,
            auth_token: self.require(&["TWILIO_AUTH_TOKEN", "auth_token"])?,
            from_number: self.require(&["TWILIO_FROM_NUMBER", "from_number"])?,
            to_number: self.require(&["TWILIO_TO_NUMBER", "to_number"])?,
        })
    }
}
