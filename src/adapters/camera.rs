//! External still-capture program adapter.
//!
//! Runs `<program> <args..> -o <path>` (by default `rpicam-still`) and
//! waits for it with a hard timeout.  A hung camera stack is killed so the
//! polling loop never wedges on a capture.

use std::path::Path;
use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::app::ports::CameraPort;
use crate::config::SystemConfig;
use crate::error::CaptureError;

const WAIT_POLL: Duration = Duration::from_millis(50);

pub struct CommandCamera {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandCamera {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(
            config.capture_program.clone(),
            config.capture_args.clone(),
            Duration::from_secs(u64::from(config.capture_timeout_secs)),
        )
    }
}

impl CameraPort for CommandCamera {
    fn capture(&mut self, path: &Path) -> Result<(), CaptureError> {
        debug!("camera: {} {:?} -o {}", self.program, self.args, path.display());
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("-o")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CaptureError::Spawn(format!("{}: {}", self.program, e)))?;

        wait_with_deadline(&mut child, &self.program, self.timeout)
    }
}

/// The parts of a spawned process the wait loop needs.
trait Reapable {
    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>>;
    fn kill(&mut self) -> io::Result<()>;
    fn wait(&mut self) -> io::Result<ExitStatus>;
}

impl Reapable for Child {
    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        Child::try_wait(self)
    }

    fn kill(&mut self) -> io::Result<()> {
        Child::kill(self)
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        Child::wait(self)
    }
}

/// Poll `child` until it exits or `timeout` passes.  Every early return
/// other than a normal exit kills and reaps the process.
fn wait_with_deadline(
    child: &mut dyn Reapable,
    program: &str,
    timeout: Duration,
) -> Result<(), CaptureError> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => return Ok(()),
            Ok(Some(status)) => return Err(CaptureError::ExitStatus(status.code())),
            Ok(None) if Instant::now() >= deadline => {
                warn!("camera: {} still running after {:?}, killing", program, timeout);
                stop(child);
                return Err(CaptureError::TimedOut {
                    secs: timeout.as_secs(),
                });
            }
            Ok(None) => thread::sleep(WAIT_POLL),
            Err(e) => {
                warn!("camera: lost track of {} ({}), killing", program, e);
                stop(child);
                return Err(CaptureError::Spawn(e.to_string()));
            }
        }
    }
}

fn stop(child: &mut dyn Reapable) {
    // Already-exited races are fine: the result is the same.
    let _ = child.kill();
    let _ = child.wait();
}
