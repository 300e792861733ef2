//! Supervised execution of the external memory imaging tool.
//!
//! The tool runs as an independent OS process with the destination file path
//! as its single positional argument. Completion is observed by polling
//! process liveness at a fixed short interval so a cooperative cancel flag
//! can be acted on within one tick; the controller thread never blocks
//! indefinitely on the child.

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Local;
use log::{debug, info, warn};

use crate::constants::DEFAULT_POLL_INTERVAL_MS;
use crate::errors::AcquisitionError;
use crate::models::{AcquisitionRun, AcquisitionTarget, PlatformProfile, RunStatus};

/// Cooperative cancellation flag, shareable across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observed at the runner's next poll tick.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to one in-flight imaging run.
pub struct RunHandle {
    child: Child,
    tool: String,
    run: AcquisitionRun,
}

impl RunHandle {
    /// Snapshot of the run record while the tool is still executing.
    pub fn run(&self) -> &AcquisitionRun {
        &self.run
    }
}

/// Launches and supervises the external imaging tool.
///
/// The poll interval and cancel flag are explicit fields so several runners
/// can coexist in one process without shared global state.
pub struct AcquisitionRunner {
    poll_interval: Duration,
    cancel: CancelToken,
}

impl Default for AcquisitionRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl AcquisitionRunner {
    pub fn new() -> Self {
        Self::with_poll_interval(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS))
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        AcquisitionRunner {
            poll_interval,
            cancel: CancelToken::new(),
        }
    }

    /// Clone of this runner's cancel flag, for cancelling from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Request cancellation of the current run.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Spawn the imaging tool with the destination path as its single
    /// positional argument.
    ///
    /// Fails with `UnsupportedPlatform` when the profile carries no tool
    /// (macOS), without spawning anything. Stdout/stderr are redirected to
    /// null so the child can never block on a full pipe buffer.
    pub fn start(
        &self,
        profile: &PlatformProfile,
        target: &AcquisitionTarget,
    ) -> Result<RunHandle, AcquisitionError> {
        let tool = match profile.tool_command.first() {
            Some(tool) => tool.clone(),
            None => {
                return Err(AcquisitionError::UnsupportedPlatform(format!(
                    "no acquisition tool available for {}",
                    profile.os_family
                )))
            }
        };

        let mut run = AcquisitionRun::pending();

        let mut command = Command::new(&tool);
        command
            .args(&profile.tool_command[1..])
            .arg(&target.destination_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(target_os = "windows")]
        {
            use std::os::windows::process::CommandExt;
            use winapi::um::winbase::CREATE_NO_WINDOW;

            if profile.launch_mode == crate::models::LaunchMode::HiddenElevated {
                command.creation_flags(CREATE_NO_WINDOW);
            }
        }

        info!(
            "Launching imaging tool: {} {}",
            tool,
            target.destination_path.display()
        );

        let child = command.spawn().map_err(|source| AcquisitionError::ToolLaunch {
            tool: tool.clone(),
            source,
        })?;

        run.started_at = Local::now();
        run.status = RunStatus::Running;
        debug!("Imaging tool spawned with pid {}", child.id());

        Ok(RunHandle { child, tool, run })
    }

    /// Supervise the child to a terminal state.
    ///
    /// Polls liveness every `poll_interval`; a cancel request is observed
    /// within one tick and forcibly terminates the child. The partially
    /// written destination file is left in place for the caller's cleanup
    /// policy. Exit observation always wins over a concurrent cancel, so
    /// cancelling after completion has no effect.
    pub fn wait(&self, handle: RunHandle) -> Result<AcquisitionRun, AcquisitionError> {
        let RunHandle {
            mut child,
            tool,
            mut run,
        } = handle;

        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    run.ended_at = Some(Local::now());
                    run.exit_code = status.code();
                    if status.success() {
                        run.status = RunStatus::Completed;
                        info!("Imaging tool finished successfully");
                    } else {
                        run.status = RunStatus::Failed;
                        warn!("Imaging tool reported failure: {}", status);
                    }
                    return Ok(run);
                }
                Ok(None) => {}
                Err(source) => {
                    return Err(AcquisitionError::ToolLaunch { tool, source });
                }
            }

            if self.cancel.is_cancelled() {
                warn!("Cancellation requested, terminating imaging tool");
                if let Err(e) = child.kill() {
                    debug!("Kill failed (process likely already exited): {}", e);
                }
                // Reap the child so no zombie is left behind.
                let _ = child.wait();
                run.ended_at = Some(Local::now());
                run.status = RunStatus::Cancelled;
                return Ok(run);
            }

            thread::sleep(self.poll_interval);
        }
    }
}
