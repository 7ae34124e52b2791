//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the FSM, the sensor gate and the shared context.
//! Every tick it samples the world through the ports, advances the FSM,
//! runs whatever pipeline step the new state requested, and returns how
//! long the caller should sleep before the next tick.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!  ClockPort  ──▶ │        AppService        │
//!  CameraPort ◀── │  Gate · FSM · Pipeline   │ ──▶ ObjectStorePort
//!     Sleeper ◀── └──────────────────────────┘ ──▶ MessagingPort
//! ```

use std::path::PathBuf;
use std::time::Duration;

use log::info;

use crate::config::SystemConfig;
use crate::error::UploadError;
use crate::fsm::context::{FsmContext, StepRequest};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::retry::RetryPolicy;

use super::cycle::{CleanupAction, CycleReport, UploadResult};
use super::events::AppEvent;
use super::gate::{GateSnapshot, SensorGate};
use super::notify::MessageRoute;
use super::ports::{
    CameraPort, ClockPort, ConfigError, EventSink, MessagingPort, ObjectStorePort, SensorPort,
    Sleeper,
};
use super::{capture, cleanup, notify, upload};

// ───────────────────────────────────────────────────────────────
// Ports bundle
// ───────────────────────────────────────────────────────────────

/// Borrowed adapters the service drives.  Built once in `main` (or a test)
/// and passed to every [`AppService::tick`].
pub struct Ports<'a> {
    pub sensors: &'a mut dyn SensorPort,
    pub camera: &'a mut dyn CameraPort,
    pub store: &'a mut dyn ObjectStorePort,
    pub messenger: &'a mut dyn MessagingPort,
    pub clock: &'a dyn ClockPort,
    pub sleeper: &'a mut dyn Sleeper,
    pub sink: &'a mut dyn EventSink,
}

// ───────────────────────────────────────────────────────────────
// Cadence
// ───────────────────────────────────────────────────────────────

/// Sleep durations between ticks, derived from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub idle: Duration,
    pub poll: Duration,
    pub storage_settle: Duration,
    pub settle: Duration,
}

impl Cadence {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            idle: config.idle_interval(),
            poll: config.poll_interval(),
            storage_settle: config.storage_settle_delay(),
            settle: config.settle_delay(),
        }
    }

    /// Delay after a tick that moved `from` → `to`.
    fn after(&self, from: StateId, to: StateId, upload_ok: bool) -> Duration {
        match to {
            // Window just opened: poll straight away.
            StateId::ActivePoll if from == StateId::Idle => Duration::ZERO,
            StateId::Idle => self.idle,
            StateId::ActivePoll => self.poll,
            StateId::Dispatching if upload_ok => self.storage_settle,
            StateId::Settling => self.settle,
            StateId::Triggered | StateId::Dispatching | StateId::Cleaning => Duration::ZERO,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    gate: SensorGate,
    cadence: Cadence,
    image_dir: PathBuf,
    route: MessageRoute,
    retry: RetryPolicy,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig, route: MessageRoute) -> Result<Self, ConfigError> {
        let gate = SensorGate::new(config.window()?);
        Ok(Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: FsmContext::new(),
            gate,
            cadence: Cadence::from_config(config),
            image_dir: config.image_dir.clone(),
            route,
            retry: config.notify_retry,
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in Idle.
    pub fn start(&mut self, sink: &mut dyn EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started {
            state: self.fsm.current_state(),
            window: self.gate.window(),
        });
    }

    /// Tick until a shutdown is requested while no cycle is in flight.
    ///
    /// A shutdown mid-cycle cuts the remaining waits short but still lets
    /// the cycle reach cleanup, so no capture is left behind.
    pub fn run(&mut self, ports: &mut Ports<'_>) {
        loop {
            if ports.sleeper.shutdown_requested() && self.state().is_polling() {
                break;
            }
            let delay = self.tick(ports);
            if !delay.is_zero() {
                ports.sleeper.sleep(delay);
            }
        }
        info!("AppService stopping in {:?}", self.state());
        ports.sink.emit(&AppEvent::Stopped);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one tick: gate → FSM → requested step.  Returns the delay
    /// before the next tick.
    pub fn tick(&mut self, ports: &mut Ports<'_>) -> Duration {
        self.tick_count += 1;
        let prev = self.fsm.current_state();

        // 1. Sample.  Sensors are only touched while actively polling.
        let now = ports.clock.now();
        self.ctx.gate = if prev == StateId::ActivePoll {
            self.gate.sample(now, &mut *ports.sensors)
        } else {
            GateSnapshot {
                active: self.gate.is_active_time(now),
                ..GateSnapshot::default()
            }
        };

        // 2. FSM tick (pure state logic)
        self.fsm.tick(&mut self.ctx);

        // 3. Run the step the new state asked for
        if let Some(step) = self.ctx.request.take() {
            self.execute(step, ports);
        }

        // 4. Emit state change if the FSM moved
        let next = self.fsm.current_state();
        if next != prev {
            ports.sink.emit(&AppEvent::StateChanged {
                from: prev,
                to: next,
            });
        }

        self.cadence
            .after(prev, next, self.ctx.cycle.upload_succeeded())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    // ── Internal ──────────────────────────────────────────────

    fn execute(&mut self, step: StepRequest, ports: &mut Ports<'_>) {
        let cycle = &mut self.ctx.cycle;
        match step {
            StepRequest::Capture => {
                let result = capture::capture(&mut *ports.camera, ports.clock, &self.image_dir);
                ports.sink.emit(&match &result.error {
                    None => AppEvent::Captured {
                        path: result.local_path.clone(),
                        trigger: cycle.trigger,
                    },
                    Some(e) => AppEvent::CaptureFailed {
                        path: result.local_path.clone(),
                        error: e.clone(),
                    },
                });
                cycle.capture = Some(result);
            }

            StepRequest::Upload => {
                let Some(captured) = &cycle.capture else {
                    return;
                };
                let result = upload::upload(&mut *ports.store, captured);
                ports.sink.emit(&match &result.error {
                    None => AppEvent::Uploaded {
                        key: result.remote_key.clone(),
                        url: result.public_url.clone().unwrap_or_default(),
                    },
                    Some(e) => AppEvent::UploadFailed {
                        key: result.remote_key.clone(),
                        error: e.clone(),
                    },
                });
                cycle.upload = Some(result);
            }

            StepRequest::Notify => {
                let Some(uploaded) = &cycle.upload else {
                    return;
                };
                let outcome = notify::notify(
                    &mut *ports.messenger,
                    &mut *ports.sleeper,
                    &self.retry,
                    &self.route,
                    uploaded,
                );
                if let Some(out) = &outcome {
                    ports.sink.emit(&match &out.error {
                        None => AppEvent::Notified {
                            message_id: out.message_id.clone().unwrap_or_default(),
                            attempts: out.attempts,
                        },
                        Some(e) => AppEvent::NotifyFailed {
                            attempts: out.attempts,
                            error: e.clone(),
                        },
                    });
                }
                cycle.notify = outcome;
            }

            StepRequest::Cleanup => {
                let Some(captured) = cycle.capture.clone() else {
                    return;
                };
                let uploaded = cycle.upload.clone().unwrap_or_else(|| {
                    UploadResult::failed(
                        captured.file_name().unwrap_or_default().to_string(),
                        UploadError::NoCapture,
                    )
                });
                let report = cleanup::cleanup(&mut *ports.store, &uploaded, &captured);

                if report.remote != CleanupAction::Skipped {
                    ports.sink.emit(&AppEvent::RemoteCleanup {
                        key: uploaded.remote_key.clone(),
                        action: report.remote.clone(),
                    });
                }
                ports.sink.emit(&AppEvent::LocalCleanup {
                    path: captured.local_path.clone(),
                    action: report.local.clone(),
                });
                ports
                    .sink
                    .emit(&AppEvent::CycleCompleted(Box::new(CycleReport {
                        trigger: cycle.trigger,
                        capture: captured,
                        upload: uploaded,
                        notify: cycle.notify.clone(),
                        cleanup: report.clone(),
                    })));
                cycle.cleanup = Some(report);
            }
        }
    }
}
