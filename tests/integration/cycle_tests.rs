//! End-to-end capture cycle tests: AppService → FSM → pipeline → mocks.

use std::collections::VecDeque;
use std::time::Duration;

use sentrycam::app::cycle::{CleanupAction, TriggerSource};
use sentrycam::app::events::AppEvent;
use sentrycam::app::ports::StoreError;
use sentrycam::error::{NotifyError, UploadError};
use sentrycam::fsm::StateId;

use crate::mock_hw::{Call, Rig, STORE_BASE, at};

const KEY: &str = "capture_20250101_200000.jpg";

fn evening_rig() -> Rig {
    Rig::new(at(2025, 1, 1, 20, 0, 0))
}

// ── Happy path ────────────────────────────────────────────────

#[test]
fn motion_in_window_runs_full_cycle() {
    let mut rig = evening_rig();
    rig.sensors.motion = true;
    let mut svc = rig.service();

    rig.run_one_cycle(&mut svc, 10);

    // Captured, uploaded, notified with the public URL, then both copies gone.
    assert_eq!(rig.camera.captures.len(), 1);
    assert!(rig.camera.captures[0].ends_with(KEY));
    assert_eq!(rig.store.puts, vec![KEY.to_string()]);
    assert_eq!(rig.messenger.sent.len(), 1);
    let msg = &rig.messenger.sent[0];
    assert_eq!(msg.media_url, format!("{STORE_BASE}/{KEY}"));
    assert_eq!(msg.body, "Motion detected!");
    assert_eq!(msg.from, "whatsapp:+14155238886");
    assert_eq!(msg.to, "whatsapp:+15550001111");
    assert!(rig.store.objects.is_empty());
    assert_eq!(rig.image_count(), 0);

    // Storage settle, then the 20 s notify settle.
    assert!(rig.sleeper.slept.contains(&Duration::from_secs(3)));
    assert!(rig.sleeper.slept.contains(&Duration::from_secs(20)));

    assert_eq!(svc.state(), StateId::ActivePoll);
}

#[test]
fn media_is_deleted_only_after_notify_settle() {
    let mut rig = evening_rig();
    rig.sensors.motion = true;
    let mut svc = rig.service();
    rig.run_one_cycle(&mut svc, 10);

    let calls = rig.calls();
    let pos = |c: &Call| calls.iter().position(|x| x == c).unwrap();
    let put = pos(&Call::Put(KEY.into()));
    let send = pos(&Call::Send);
    let delete = pos(&Call::Delete(KEY.into()));

    // put → 3 s storage settle → send → 20 s settle → delete
    assert!(put < send && send < delete, "{calls:?}");
    assert_eq!(calls[put + 1], Call::Sleep(Duration::from_secs(3)));
    assert_eq!(calls[send + 1], Call::Sleep(Duration::from_secs(20)));
    assert_eq!(delete, send + 2, "{calls:?}");
}

#[test]
fn successful_cycle_logs_five_info_events_in_order() {
    let mut rig = evening_rig();
    rig.sensors.motion = true;
    let mut svc = rig.service();
    rig.run_one_cycle(&mut svc, 10);

    let info: Vec<_> = rig
        .sink
        .info_and_above()
        .into_iter()
        .filter(|e| !matches!(e, AppEvent::Started { .. }))
        .collect();
    assert_eq!(info.len(), 5, "got {:?}", info);
    assert!(matches!(
        info[0],
        AppEvent::Captured {
            trigger: Some(TriggerSource::Motion),
            ..
        }
    ));
    assert!(matches!(info[1], AppEvent::Uploaded { key, .. } if key == KEY));
    assert!(matches!(info[2], AppEvent::Notified { attempts: 1, .. }));
    assert!(matches!(
        info[3],
        AppEvent::RemoteCleanup {
            action: CleanupAction::Removed,
            ..
        }
    ));
    assert!(matches!(
        info[4],
        AppEvent::LocalCleanup {
            action: CleanupAction::Removed,
            ..
        }
    ));
}

#[test]
fn cycle_report_summarises_the_run() {
    let mut rig = evening_rig();
    rig.sensors.door_open = true;
    let mut svc = rig.service();
    rig.run_one_cycle(&mut svc, 10);

    let report = rig
        .sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::CycleCompleted(r) => Some(r.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(report.trigger, Some(TriggerSource::Door));
    assert!(report.capture.success);
    assert!(report.upload.success);
    assert!(report.notify.as_ref().unwrap().delivered);
    assert_eq!(report.cleanup.remote, CleanupAction::Removed);
    assert_eq!(report.cleanup.local, CleanupAction::Removed);
}

// ── Gate behaviour ────────────────────────────────────────────

#[test]
fn outside_window_never_reads_sensors() {
    let mut rig = Rig::new(at(2025, 1, 1, 12, 0, 0));
    rig.sensors.motion = true;
    rig.sensors.door_open = true;
    let mut svc = rig.service();

    for _ in 0..5 {
        assert_eq!(rig.step(&mut svc), Duration::from_secs(60));
    }
    assert_eq!(svc.state(), StateId::Idle);
    assert_eq!(rig.sensors.door_reads, 0);
    assert_eq!(rig.sensors.motion_reads, 0);
    assert!(rig.camera.captures.is_empty());
}

#[test]
fn window_opening_starts_polling() {
    // 17:58 with a 60 s idle cadence: the window opens on the third tick.
    let mut rig = Rig::new(at(2025, 1, 1, 17, 58, 0));
    let mut svc = rig.service();

    rig.step(&mut svc);
    rig.step(&mut svc);
    assert_eq!(svc.state(), StateId::Idle);
    rig.step(&mut svc);
    assert_eq!(svc.state(), StateId::ActivePoll);
    assert_eq!(rig.step(&mut svc), Duration::from_secs(10));
    assert_eq!(rig.sensors.door_reads, 1);
}

#[test]
fn open_door_skips_motion_read() {
    let mut rig = evening_rig();
    rig.sensors.door_open = true;
    rig.sensors.motion = true;
    let mut svc = rig.service();
    rig.run_one_cycle(&mut svc, 10);

    assert_eq!(rig.sensors.motion_reads, 0);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::Captured {
            trigger: Some(TriggerSource::Door),
            ..
        }
    )));
}

#[test]
fn quiet_sensors_keep_polling() {
    let mut rig = evening_rig();
    let mut svc = rig.service();
    rig.step(&mut svc);
    for _ in 0..3 {
        assert_eq!(rig.step(&mut svc), Duration::from_secs(10));
    }
    assert_eq!(svc.state(), StateId::ActivePoll);
    assert_eq!(rig.sensors.motion_reads, 3);
    assert!(rig.camera.captures.is_empty());
}

// ── Failure branches ──────────────────────────────────────────

#[test]
fn upload_failure_skips_notify_and_cleans_local() {
    let mut rig = evening_rig();
    rig.sensors.motion = true;
    rig.store.put_error = Some(StoreError::Rejected {
        status: 503,
        detail: "unavailable".into(),
    });
    let mut svc = rig.service();
    rig.run_one_cycle(&mut svc, 10);

    assert!(rig.messenger.sent.is_empty());
    assert!(rig.store.deletes.is_empty());
    assert_eq!(rig.image_count(), 0);
    assert!(!rig.sleeper.slept.contains(&Duration::from_secs(20)));
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::UploadFailed { error: UploadError::Store(_), .. })),
        1
    );
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::RemoteCleanup { .. })),
        0
    );
}

#[test]
fn existing_remote_object_is_never_deleted() {
    let mut rig = evening_rig();
    rig.sensors.motion = true;
    rig.store.objects.insert(KEY.into(), b"older".to_vec());
    let mut svc = rig.service();
    rig.run_one_cycle(&mut svc, 10);

    assert_eq!(rig.store.objects.get(KEY).map(Vec::as_slice), Some(&b"older"[..]));
    assert!(rig.store.deletes.is_empty());
    assert!(rig.messenger.sent.is_empty());
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::UploadFailed {
                error: UploadError::AlreadyExists(_),
                ..
            }
        )),
        1
    );
}

#[test]
fn capture_failure_ends_in_cleanup() {
    let mut rig = evening_rig();
    rig.sensors.motion = true;
    rig.camera.fail = true;
    let mut svc = rig.service();
    rig.run_one_cycle(&mut svc, 10);

    assert!(rig.store.puts.is_empty());
    assert!(rig.messenger.sent.is_empty());
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::CaptureFailed { .. })),
        1
    );
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::LocalCleanup {
                action: CleanupAction::NotFound,
                ..
            }
        )),
        1
    );
}

#[test]
fn transient_notify_failures_are_retried() {
    let mut rig = evening_rig();
    rig.sensors.motion = true;
    rig.messenger.replies = VecDeque::from(vec![
        Err(NotifyError::Transient("HTTP 429".into())),
        Err(NotifyError::Transient("HTTP 503".into())),
        Ok("SM42".into()),
    ]);
    let mut svc = rig.service();
    rig.run_one_cycle(&mut svc, 10);

    assert_eq!(rig.messenger.sent.len(), 3);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::Notified { message_id, attempts: 3 } if message_id == "SM42"
    )));
    let s = &rig.sleeper.slept;
    let first = s.iter().position(|d| *d == Duration::from_secs(1)).unwrap();
    assert_eq!(s[first + 1], Duration::from_secs(2));
}

#[test]
fn permanent_notify_failure_still_cleans_up() {
    let mut rig = evening_rig();
    rig.sensors.motion = true;
    rig.messenger.replies =
        VecDeque::from(vec![Err(NotifyError::Permanent("HTTP 401".into()))]);
    let mut svc = rig.service();
    rig.run_one_cycle(&mut svc, 10);

    assert_eq!(rig.messenger.sent.len(), 1);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::NotifyFailed { .. })), 1);
    assert!(rig.store.objects.is_empty());
    assert_eq!(rig.image_count(), 0);
}

#[test]
fn consecutive_cycles_use_distinct_files() {
    let mut rig = evening_rig();
    rig.sensors.motion = true;
    let mut svc = rig.service();
    rig.run_one_cycle(&mut svc, 10);
    rig.sink.events.clear();
    rig.run_one_cycle(&mut svc, 10);

    assert_eq!(rig.camera.captures.len(), 2);
    assert_ne!(rig.camera.captures[0], rig.camera.captures[1]);
    assert_eq!(rig.image_count(), 0);
}
