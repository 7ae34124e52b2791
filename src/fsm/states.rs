//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers; no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!  IDLE ──[window opens]──▶ ACTIVE_POLL ◀──[window open]──┐
//!   ▲                        │      │                       │
//!   └──────[window closes]───┘  [door | motion]             │
//!   ▲                               ▼                       │
//!   │                          TRIGGERED (capture)          │
//!   │                               │                       │
//!   │                               ▼                       │
//!   │                         DISPATCHING (upload)          │
//!   │                     [ok] │          │ [failed]        │
//!   │                          ▼          │                 │
//!   │              SETTLING (notify)      │                 │
//!   │                          │          │                 │
//!   │                          ▼          ▼                 │
//!   └──────[window closed]── CLEANING (cleanup) ────────────┘
//! ```
//!
//! Work is requested from `on_enter` through [`FsmContext::request`]; the
//! service runs it right after the tick and stores the result, which the
//! next `on_update` inspects.

use super::context::{FsmContext, StepRequest};
use super::{StateDescriptor, StateId};
use log::debug;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: ActivePoll
        StateDescriptor {
            id: StateId::ActivePoll,
            name: "ActivePoll",
            on_enter: None,
            on_exit: None,
            on_update: active_poll_update,
        },
        // Index 2: Triggered
        StateDescriptor {
            id: StateId::Triggered,
            name: "Triggered",
            on_enter: Some(triggered_enter),
            on_exit: None,
            on_update: triggered_update,
        },
        // Index 3: Dispatching
        StateDescriptor {
            id: StateId::Dispatching,
            name: "Dispatching",
            on_enter: Some(dispatching_enter),
            on_exit: None,
            on_update: dispatching_update,
        },
        // Index 4: Settling
        StateDescriptor {
            id: StateId::Settling,
            name: "Settling",
            on_enter: Some(settling_enter),
            on_exit: None,
            on_update: settling_update,
        },
        // Index 5: Cleaning
        StateDescriptor {
            id: StateId::Cleaning,
            name: "Cleaning",
            on_enter: Some(cleaning_enter),
            on_exit: Some(cleaning_exit),
            on_update: cleaning_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE: outside the active window
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.request = None;
    debug!("IDLE: outside active window, sensors not polled");
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.gate.active.then_some(StateId::ActivePoll)
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE_POLL: inside the window, waiting for a sensor
// ═══════════════════════════════════════════════════════════════════════════

fn active_poll_update(ctx: &mut FsmContext) -> Option<StateId> {
    if !ctx.gate.active {
        return Some(StateId::Idle);
    }
    ctx.gate.trigger().map(|_| StateId::Triggered)
}

// ═══════════════════════════════════════════════════════════════════════════
//  TRIGGERED: capture
// ═══════════════════════════════════════════════════════════════════════════

fn triggered_enter(ctx: &mut FsmContext) {
    ctx.cycle.trigger = ctx.gate.trigger();
    ctx.request = Some(StepRequest::Capture);
}

fn triggered_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.cycle.capture.as_ref().map(|_| StateId::Dispatching)
}

// ═══════════════════════════════════════════════════════════════════════════
//  DISPATCHING: upload
// ═══════════════════════════════════════════════════════════════════════════

fn dispatching_enter(ctx: &mut FsmContext) {
    ctx.request = Some(StepRequest::Upload);
}

fn dispatching_update(ctx: &mut FsmContext) -> Option<StateId> {
    match &ctx.cycle.upload {
        Some(u) if u.success => Some(StateId::Settling),
        // Upload failed: skip notify and the settle delay.
        Some(_) => Some(StateId::Cleaning),
        None => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SETTLING: notify, then let the provider fetch the media
// ═══════════════════════════════════════════════════════════════════════════

fn settling_enter(ctx: &mut FsmContext) {
    ctx.request = Some(StepRequest::Notify);
}

fn settling_update(_ctx: &mut FsmContext) -> Option<StateId> {
    // Notify ran on entry and the settle delay has elapsed.
    Some(StateId::Cleaning)
}

// ═══════════════════════════════════════════════════════════════════════════
//  CLEANING: remote + local cleanup
// ═══════════════════════════════════════════════════════════════════════════

fn cleaning_enter(ctx: &mut FsmContext) {
    ctx.request = Some(StepRequest::Cleanup);
}

fn cleaning_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.cycle.cleanup.as_ref()?;
    if ctx.gate.active {
        Some(StateId::ActivePoll)
    } else {
        Some(StateId::Idle)
    }
}

fn cleaning_exit(ctx: &mut FsmContext) {
    ctx.cycle = Default::default();
    ctx.request = None;
}
