//! Capture step.
//!
//! Derives a sortable, second-resolution file name from the wall clock and
//! asks the [`CameraPort`] to write a still there.  Never fails outward:
//! errors end up in [`CaptureResult::error`].

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::debug;

use super::cycle::CaptureResult;
use super::ports::{CameraPort, ClockPort};
use crate::error::CaptureError;

/// `<dir>/capture_YYYYmmdd_HHMMSS.jpg`
pub fn image_path(dir: &Path, at: NaiveDateTime) -> PathBuf {
    dir.join(format!("capture_{}.jpg", at.format("%Y%m%d_%H%M%S")))
}

pub fn capture(camera: &mut dyn CameraPort, clock: &dyn ClockPort, image_dir: &Path) -> CaptureResult {
    let captured_at = clock.now();
    let local_path = image_path(image_dir, captured_at);
    debug!("capture: writing {}", local_path.display());

    let outcome = camera.capture(&local_path).and_then(|()| {
        if local_path.is_file() {
            Ok(())
        } else {
            Err(CaptureError::MissingOutput)
        }
    });

    match outcome {
        Ok(()) => CaptureResult {
            local_path,
            captured_at,
            success: true,
            error: None,
        },
        Err(e) => CaptureResult {
            local_path,
            captured_at,
            success: false,
            error: Some(e),
        },
    }
}
