//! SentryCam: Main Entry Point
//!
//! Hexagonal architecture driven by a polling FSM.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   CommandCamera   SupabaseStore  TwilioMessenger│
//! │  (SensorPort)      (CameraPort)    (ObjectStore)  (Messaging)  │
//! │  SystemClock       ShutdownSleeper LogEventSink   EnvConfig    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Gate · FSM · Capture → Upload → Notify → Cleanup      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use sentrycam::adapters::camera::CommandCamera;
use sentrycam::adapters::env_config::EnvConfig;
use sentrycam::adapters::hardware::HardwareAdapter;
use sentrycam::adapters::log_sink::LogEventSink;
use sentrycam::adapters::supabase::SupabaseStore;
use sentrycam::adapters::time::{self, ShutdownSleeper, SystemClock};
use sentrycam::adapters::twilio::TwilioMessenger;
use sentrycam::app::notify::MessageRoute;
use sentrycam::app::ports::ConfigPort;
use sentrycam::app::service::{AppService, Ports};

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("SentryCam v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config + credentials ───────────────────────────────
    let env = EnvConfig::from_env();
    let config = env.load().context("loading configuration")?;
    let creds = env.credentials().context("loading credentials")?;
    info!(
        "Config: window {}-{}, poll {}s, bucket '{}'",
        config.active_start, config.active_end, config.poll_interval_secs, config.bucket
    );

    std::fs::create_dir_all(&config.image_dir)
        .with_context(|| format!("creating {}", config.image_dir.display()))?;

    // ── 3. Signals ────────────────────────────────────────────
    time::install_signal_handlers().context("installing signal handlers")?;

    // ── 4. Adapters ───────────────────────────────────────────
    let mut sensors = HardwareAdapter::open(&config).context("opening GPIO lines")?;
    let mut camera = CommandCamera::from_config(&config);
    let mut store = SupabaseStore::new(
        &creds.storage_url,
        &creds.storage_key,
        &config.bucket,
        Duration::from_secs(u64::from(config.upload_timeout_secs)),
    );
    let mut messenger = TwilioMessenger::new(
        &creds.account_sid,
        &creds.auth_token,
        Duration::from_secs(u64::from(config.notify_timeout_secs)),
    );
    let clock = SystemClock;
    let mut sleeper = ShutdownSleeper;
    let mut sink = LogEventSink::new();

    // ── 5. Service ────────────────────────────────────────────
    let route = MessageRoute {
        from: creds.from_number.clone(),
        to: creds.to_number.clone(),
        body: config.message_body.clone(),
    };
    let mut service = AppService::new(&config, route).context("building service")?;
    service.start(&mut sink);

    let mut ports = Ports {
        sensors: &mut sensors,
        camera: &mut camera,
        store: &mut store,
        messenger: &mut messenger,
        clock: &clock,
        sleeper: &mut sleeper,
        sink: &mut sink,
    };
    service.run(&mut ports);

    info!("SentryCam stopped after {} ticks", service.tick_count());
    Ok(())
}
