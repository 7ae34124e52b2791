//! `AppService::run` start-up and shutdown behaviour.

use std::time::Duration;

use sentrycam::app::events::AppEvent;
use sentrycam::app::service::AppService;
use sentrycam::config::SystemConfig;
use sentrycam::fsm::StateId;

use crate::mock_hw::{Rig, at};

#[test]
fn started_event_carries_window() {
    let mut rig = Rig::new(at(2025, 1, 1, 12, 0, 0));
    let _svc = rig.service();
    match &rig.sink.events[0] {
        AppEvent::Started { state, window } => {
            assert_eq!(*state, StateId::Idle);
            assert_eq!(window.to_string(), "18:00-08:00");
        }
        other => panic!("expected Started, got {other:?}"),
    }
}

#[test]
fn idle_shutdown_stops_promptly() {
    let mut rig = Rig::new(at(2025, 1, 1, 12, 0, 0));
    rig.sleeper.shutdown_after = Some(3);
    let mut svc = rig.service();

    svc.run(&mut rig.ports());

    assert_eq!(rig.sleeper.slept, vec![Duration::from_secs(60); 3]);
    assert_eq!(svc.tick_count(), 3);
    assert!(matches!(rig.sink.events.last(), Some(AppEvent::Stopped)));
}

#[test]
fn shutdown_mid_cycle_still_cleans_up() {
    let mut rig = Rig::new(at(2025, 1, 1, 20, 0, 0));
    rig.sensors.motion = true;
    // Lands during the notify settle wait.
    rig.sleeper.shutdown_after = Some(2);
    let mut svc = rig.service();

    svc.run(&mut rig.ports());

    assert_eq!(rig.messenger.sent.len(), 1);
    assert!(rig.store.objects.is_empty(), "remote copy left behind");
    assert_eq!(rig.image_count(), 0, "local copy left behind");
    assert!(svc.state().is_polling());
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::CycleCompleted(_))),
        1
    );
    assert!(matches!(rig.sink.events.last(), Some(AppEvent::Stopped)));
}

#[test]
fn custom_window_and_cadence_are_honoured() {
    let mut rig = Rig::new(at(2025, 1, 1, 17, 30, 0));
    rig.config = SystemConfig {
        active_start: "17:20".into(),
        active_end: "17:50".into(),
        poll_interval_secs: 5,
        ..rig.config.clone()
    };
    let mut svc: AppService = rig.service();

    rig.step(&mut svc);
    assert_eq!(svc.state(), StateId::ActivePoll);
    assert_eq!(rig.step(&mut svc), Duration::from_secs(5));
}
