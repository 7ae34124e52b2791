//! Supabase Storage adapter.
//!
//! Implements [`ObjectStorePort`] over the Storage REST API:
//!
//! | Operation    | Request                                             |
//! |--------------|-----------------------------------------------------|
//! | `put`        | `POST   /storage/v1/object/{bucket}/{key}`          |
//! | `delete`     | `DELETE /storage/v1/object/{bucket}` `{"prefixes"}` |
//! | `public_url` | `/storage/v1/object/public/{bucket}/{key}` (no I/O) |
//!
//! The bucket must be public for the messaging provider to fetch media.

use std::time::Duration;

use log::debug;

use crate::app::ports::{ObjectStorePort, StoreError};

pub struct SupabaseStore {
    agent: ureq::Agent,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStore {
    pub fn new(base_url: &str, service_key: &str, bucket: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }

    fn bucket_url(&self) -> String {
        format!("{}/storage/v1/object/{}", self.base_url, self.bucket)
    }

    fn authorized(&self, req: ureq::Request) -> ureq::Request {
        req.set("apikey", &self.service_key)
            .set("authorization", &format!("Bearer {}", self.service_key))
    }
}

impl ObjectStorePort for SupabaseStore {
    fn put(
        &mut self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
        allow_overwrite: bool,
    ) -> Result<String, StoreError> {
        let req = self
            .authorized(self.agent.post(&self.object_url(key)))
            .set("content-type", content_type)
            .set("x-upsert", if allow_overwrite { "true" } else { "false" });

        match req.send_bytes(bytes) {
            Ok(resp) => {
                debug!("supabase: stored {} (HTTP {})", key, resp.status());
                Ok(key.to_string())
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(classify_put_status(code, &body))
            }
            Err(ureq::Error::Transport(t)) => Err(StoreError::Transport(t.to_string())),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }

    fn delete(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        let req = self.authorized(self.agent.delete(&self.bucket_url()));
        match req.send_json(serde_json::json!({ "prefixes": keys })) {
            Ok(resp) => {
                // One JSON object per removed file; only the count matters.
                let deleted: Vec<serde_json::Value> = resp
                    .into_json()
                    .map_err(|e| StoreError::Transport(format!("bad delete response: {e}")))?;
                debug!("supabase: deleted {} of {} object(s)", deleted.len(), keys.len());
                if deleted.is_empty() {
                    Err(StoreError::NotFound)
                } else {
                    Ok(())
                }
            }
            Err(ureq::Error::Status(404, _)) => Err(StoreError::NotFound),
            Err(ureq::Error::Status(code, resp)) => Err(StoreError::Rejected {
                status: code,
                detail: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(t)) => Err(StoreError::Transport(t.to_string())),
        }
    }
}

/// Map an upload rejection.  Storage reports duplicates as 409, or as 400
/// with a `Duplicate` error body on older deployments.
fn classify_put_status(status: u16, body: &str) -> StoreError {
    let duplicate = body.contains("Duplicate") || body.contains("already exists");
    match status {
        409 => StoreError::AlreadyExists,
        400 if duplicate => StoreError::AlreadyExists,
        _ => StoreError::Rejected {
            status,
            detail: body.to_string(),
        },
    }
}
