//! Upload step.
//!
//! Reads the captured file and stores it under its file name with
//! overwriting disabled.  No retries: a failure here sends the cycle
//! straight to local-only cleanup.

use std::fs;

use log::debug;

use super::cycle::{CaptureResult, UploadResult};
use super::ports::{ObjectStorePort, StoreError};
use crate::error::UploadError;

pub const CONTENT_TYPE: &str = "image/jpeg";

pub fn upload(store: &mut dyn ObjectStorePort, capture: &CaptureResult) -> UploadResult {
    let key = capture.file_name().unwrap_or_default().to_string();
    if !capture.success || key.is_empty() {
        return UploadResult::failed(key, UploadError::NoCapture);
    }

    let bytes = match fs::read(&capture.local_path) {
        Ok(b) => b,
        Err(e) => return UploadResult::failed(key, UploadError::Open(e.to_string())),
    };
    debug!("upload: {} ({} bytes)", key, bytes.len());

    match store.put(&key, &bytes, CONTENT_TYPE, false) {
        Ok(stored) => UploadResult {
            public_url: Some(store.public_url(&stored)),
            remote_key: stored,
            success: true,
            error: None,
        },
        Err(StoreError::AlreadyExists) => {
            UploadResult::failed(key.clone(), UploadError::AlreadyExists(key))
        }
        Err(e) => UploadResult::failed(key, UploadError::Store(e.to_string())),
    }
}
