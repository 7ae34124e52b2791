//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  The service writes the latest gate sample and step results
//! into it; handlers read them to pick the next state and write a
//! [`StepRequest`] back for the service to execute.  Think of it as the
//! "blackboard" in a blackboard architecture.

use crate::app::cycle::{CaptureResult, CleanupReport, NotifyOutcome, TriggerSource, UploadResult};
use crate::app::gate::GateSnapshot;

// ---------------------------------------------------------------------------
// Step requests (written by state handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// A pipeline step a state handler wants run before the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRequest {
    Capture,
    Upload,
    Notify,
    Cleanup,
}

// ---------------------------------------------------------------------------
// Cycle data (written by the service; read by state handlers)
// ---------------------------------------------------------------------------

/// Results accumulated over one capture cycle.  Reset when `Cleaning` exits.
#[derive(Debug, Clone, Default)]
pub struct CycleData {
    pub trigger: Option<TriggerSource>,
    pub capture: Option<CaptureResult>,
    pub upload: Option<UploadResult>,
    pub notify: Option<NotifyOutcome>,
    pub cleanup: Option<CleanupReport>,
}

impl CycleData {
    /// Whether the upload step ran and succeeded.
    pub fn upload_succeeded(&self) -> bool {
        self.upload.as_ref().is_some_and(|u| u.success)
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
#[derive(Debug, Default)]
pub struct FsmContext {
    // -- Inputs --
    /// Latest gate sample.  Updated before each FSM tick.
    pub gate: GateSnapshot,

    // -- Cycle --
    pub cycle: CycleData,

    // -- Outputs --
    /// Step the service should run after this tick.
    pub request: Option<StepRequest>,
}

impl FsmContext {
    pub fn new() -> Self {
        Self::default()
    }
}
