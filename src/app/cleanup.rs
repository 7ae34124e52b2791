//! Cleanup step: terminal step of every cycle branch.
//!
//! Two independent, best-effort sub-actions:
//!
//! 1. delete the remote object, only if the upload succeeded;
//! 2. delete the local file.
//!
//! Absence is reported as [`CleanupAction::NotFound`], so running cleanup
//! twice on the same results is harmless.

use std::io;
use std::path::Path;

use super::cycle::{CaptureResult, CleanupAction, CleanupReport, UploadResult};
use super::ports::{ObjectStorePort, StoreError};
use crate::error::CleanupError;

pub fn cleanup(
    store: &mut dyn ObjectStorePort,
    upload: &UploadResult,
    capture: &CaptureResult,
) -> CleanupReport {
    let remote = match upload.uploaded_key() {
        None => CleanupAction::Skipped,
        Some(key) => match store.delete(&[key]) {
            Ok(()) => CleanupAction::Removed,
            Err(StoreError::NotFound) => CleanupAction::NotFound,
            Err(e) => CleanupAction::Failed(CleanupError::Remote(e.to_string())),
        },
    };
    let local = remove_local(&capture.local_path);
    CleanupReport { remote, local }
}

/// Remove a local file; a missing file is a no-op.
pub fn remove_local(path: &Path) -> CleanupAction {
    match std::fs::remove_file(path) {
        Ok(()) => CleanupAction::Removed,
        Err(e) if e.kind() == io::ErrorKind::NotFound => CleanupAction::NotFound,
        Err(e) => CleanupAction::Failed(CleanupError::Local(e.to_string())),
    }
}
