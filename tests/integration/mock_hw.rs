//! Mock adapters for integration tests.
//!
//! Every mock records what it was asked to do so tests can assert on the
//! full history without a camera, GPIO lines or network access.  The clock
//! and sleeper share one simulated "now": sleeping advances it.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use log::Level;

use sentrycam::app::events::AppEvent;
use sentrycam::app::notify::MessageRoute;
use sentrycam::app::ports::{
    CameraPort, ClockPort, EventSink, MessagingPort, ObjectStorePort, OutboundMessage, SensorPort,
    Sleeper, StoreError,
};
use sentrycam::app::service::{AppService, Ports};
use sentrycam::config::SystemConfig;
use sentrycam::error::{CaptureError, NotifyError};

pub const STORE_BASE: &str = "https://store.test/storage/v1/object/public/security-camera-images";

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

// ── Call journal ──────────────────────────────────────────────

/// One outward call, in the order the service made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Put(String),
    Send,
    Sleep(Duration),
    Delete(String),
}

/// Shared between the store, messenger and sleeper so tests can check
/// ordering across them.
pub type Journal = Rc<RefCell<Vec<Call>>>;

// ── Sensors ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSensors {
    pub door_open: bool,
    pub motion: bool,
    pub door_reads: u32,
    pub motion_reads: u32,
}

impl SensorPort for MockSensors {
    fn is_door_open(&mut self) -> bool {
        self.door_reads += 1;
        self.door_open
    }

    fn is_motion(&mut self) -> bool {
        self.motion_reads += 1;
        self.motion
    }
}

// ── Camera ────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockCamera {
    pub fail: bool,
    pub captures: Vec<PathBuf>,
}

impl CameraPort for MockCamera {
    fn capture(&mut self, path: &Path) -> Result<(), CaptureError> {
        self.captures.push(path.to_path_buf());
        if self.fail {
            return Err(CaptureError::ExitStatus(Some(255)));
        }
        std::fs::write(path, b"\xff\xd8jpeg").map_err(|e| CaptureError::Spawn(e.to_string()))
    }
}

// ── Object store ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockStore {
    pub objects: HashMap<String, Vec<u8>>,
    pub put_error: Option<StoreError>,
    pub puts: Vec<String>,
    pub deletes: Vec<String>,
    pub journal: Journal,
}

impl ObjectStorePort for MockStore {
    fn put(
        &mut self,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
        allow_overwrite: bool,
    ) -> Result<String, StoreError> {
        self.puts.push(key.to_string());
        self.journal.borrow_mut().push(Call::Put(key.to_string()));
        if let Some(e) = &self.put_error {
            return Err(e.clone());
        }
        if !allow_overwrite && self.objects.contains_key(key) {
            return Err(StoreError::AlreadyExists);
        }
        self.objects.insert(key.to_string(), bytes.to_vec());
        Ok(key.to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{STORE_BASE}/{key}")
    }

    fn delete(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        self.deletes.extend(keys.iter().map(|k| k.to_string()));
        self.journal
            .borrow_mut()
            .extend(keys.iter().map(|k| Call::Delete(k.to_string())));
        let removed = keys
            .iter()
            .filter(|k| self.objects.remove(**k).is_some())
            .count();
        if removed == 0 {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }
}

// ── Messenger ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockMessenger {
    /// Scripted replies; once empty every send succeeds.
    pub replies: VecDeque<Result<String, NotifyError>>,
    pub sent: Vec<OutboundMessage>,
    pub journal: Journal,
}

impl MessagingPort for MockMessenger {
    fn send(&mut self, message: &OutboundMessage) -> Result<String, NotifyError> {
        self.sent.push(message.clone());
        self.journal.borrow_mut().push(Call::Send);
        self.replies
            .pop_front()
            .unwrap_or_else(|| Ok(format!("SM{}", self.sent.len())))
    }
}

// ── Clock + sleeper ───────────────────────────────────────────

pub struct MockClock {
    pub now: Rc<Cell<NaiveDateTime>>,
}

impl ClockPort for MockClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

pub struct MockSleeper {
    pub now: Rc<Cell<NaiveDateTime>>,
    pub slept: Vec<Duration>,
    /// Request shutdown once this many sleeps have happened.
    pub shutdown_after: Option<usize>,
    pub journal: Journal,
}

impl Sleeper for MockSleeper {
    fn sleep(&mut self, duration: Duration) -> bool {
        self.slept.push(duration);
        self.journal.borrow_mut().push(Call::Sleep(duration));
        let advanced = self.now.get() + chrono::Duration::from_std(duration).unwrap();
        self.now.set(advanced);
        !self.shutdown_requested()
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown_after.is_some_and(|n| self.slept.len() >= n)
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events that would be logged at `info` or louder.
    pub fn info_and_above(&self) -> Vec<&AppEvent> {
        self.events
            .iter()
            .filter(|e| e.level() <= Level::Info)
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn cycle_completed(&self) -> bool {
        self.count(|e| matches!(e, AppEvent::CycleCompleted(_))) > 0
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// All mocks plus a temporary image directory.
pub struct Rig {
    pub sensors: MockSensors,
    pub camera: MockCamera,
    pub store: MockStore,
    pub messenger: MockMessenger,
    pub clock: MockClock,
    pub sleeper: MockSleeper,
    pub sink: LogSink,
    pub config: SystemConfig,
    pub dir: tempfile::TempDir,
    pub journal: Journal,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(start: NaiveDateTime) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let now = Rc::new(Cell::new(start));
        let journal = Journal::default();
        let config = SystemConfig {
            image_dir: dir.path().to_path_buf(),
            ..SystemConfig::default()
        };
        Self {
            sensors: MockSensors::default(),
            camera: MockCamera::default(),
            store: MockStore {
                journal: journal.clone(),
                ..MockStore::default()
            },
            messenger: MockMessenger {
                journal: journal.clone(),
                ..MockMessenger::default()
            },
            clock: MockClock { now: now.clone() },
            sleeper: MockSleeper {
                now,
                slept: Vec::new(),
                shutdown_after: None,
                journal: journal.clone(),
            },
            sink: LogSink::new(),
            config,
            dir,
            journal,
        }
    }

    pub fn route() -> MessageRoute {
        MessageRoute {
            from: "whatsapp:+14155238886".into(),
            to: "whatsapp:+15550001111".into(),
            body: "Motion detected!".into(),
        }
    }

    /// Build and start a service over the rig's config.
    pub fn service(&mut self) -> AppService {
        let mut svc = AppService::new(&self.config, Self::route()).unwrap();
        svc.start(&mut self.sink);
        svc
    }

    pub fn ports(&mut self) -> Ports<'_> {
        Ports {
            sensors: &mut self.sensors,
            camera: &mut self.camera,
            store: &mut self.store,
            messenger: &mut self.messenger,
            clock: &self.clock,
            sleeper: &mut self.sleeper,
            sink: &mut self.sink,
        }
    }

    /// One tick followed by the sleep it asked for.
    pub fn step(&mut self, svc: &mut AppService) -> Duration {
        let delay = svc.tick(&mut self.ports());
        if !delay.is_zero() {
            self.sleeper.sleep(delay);
        }
        delay
    }

    /// Step until a cycle completes (or `limit` ticks pass), then one more
    /// tick so the FSM leaves `Cleaning`.
    pub fn run_one_cycle(&mut self, svc: &mut AppService, limit: usize) {
        for _ in 0..limit {
            self.step(svc);
            if self.sink.cycle_completed() {
                self.step(svc);
                return;
            }
        }
        panic!("no cycle completed within {limit} ticks");
    }

    /// Snapshot of every journaled call so far.
    pub fn calls(&self) -> Vec<Call> {
        self.journal.borrow().clone()
    }

    pub fn image_count(&self) -> usize {
        std::fs::read_dir(self.dir.path()).unwrap().count()
    }
}
