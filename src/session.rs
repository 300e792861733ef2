//! Session-level orchestration of one complete acquisition.
//!
//! A session walks a single path through detection, imaging, hashing, and
//! reporting. Sessions are single-flight: once an acquisition has run to a
//! terminal state the session keeps that state for inspection and refuses
//! further runs.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::errors::AcquisitionError;
use crate::hashing;
use crate::models::{
    AcquisitionTarget, CaseRecord, ExaminerRecord, HashAlgorithm, PlatformProfile, RunStatus,
    SessionOutcome,
};
use crate::platform;
use crate::report::{self, ReportContext};
use crate::runner::{AcquisitionRunner, CancelToken};

/// Lifecycle of an acquisition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No platform profile yet.
    Idle,
    /// Platform detected, ready to acquire.
    ProfileReady,
    /// Imaging tool is executing.
    Running,
    /// Artifact imaged, hashed, and reported.
    Completed,
    /// Run stopped on request; partial artifact left in place, no report.
    Cancelled,
    /// Any stage failed; the error was surfaced to the caller.
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Cancelled | SessionState::Failed
        )
    }
}

/// Coordinates one acquisition from detection through the final report.
pub struct AcquisitionSession {
    state: SessionState,
    output_dir: PathBuf,
    runner: AcquisitionRunner,
    profile: Option<PlatformProfile>,
}

impl AcquisitionSession {
    /// New idle session; the platform is detected lazily on [`prepare`] or
    /// first [`acquire`].
    ///
    /// [`prepare`]: AcquisitionSession::prepare
    /// [`acquire`]: AcquisitionSession::acquire
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        AcquisitionSession {
            state: SessionState::Idle,
            output_dir: output_dir.into(),
            runner: AcquisitionRunner::new(),
            profile: None,
        }
    }

    /// New session with a pre-built profile, skipping detection.
    pub fn with_profile(output_dir: impl Into<PathBuf>, profile: PlatformProfile) -> Self {
        AcquisitionSession {
            state: SessionState::ProfileReady,
            output_dir: output_dir.into(),
            runner: AcquisitionRunner::new(),
            profile: Some(profile),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The detected profile, if detection has run.
    pub fn profile(&self) -> Option<&PlatformProfile> {
        self.profile.as_ref()
    }

    /// Cancel flag for the in-flight (or upcoming) run; hand a clone to a
    /// signal handler or UI thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.runner.cancel_token()
    }

    /// Detect the platform and move to `ProfileReady`.
    ///
    /// Idempotent while no acquisition has started.
    pub fn prepare(&mut self) -> Result<&PlatformProfile, AcquisitionError> {
        if self.state != SessionState::Idle && self.state != SessionState::ProfileReady {
            return Err(AcquisitionError::SessionBusy);
        }
        if self.profile.is_none() {
            let profile = platform::detect()?;
            info!(
                "Detected platform: {} on {} {}",
                profile.os_family, profile.manufacturer, profile.model
            );
            self.profile = Some(profile);
        }
        self.state = SessionState::ProfileReady;
        // Profile is always Some here.
        Ok(self.profile.as_ref().ok_or(AcquisitionError::SessionBusy)?)
    }

    /// Run one full acquisition: image, hash, report.
    ///
    /// Cancelled runs return an outcome with no digests and no report;
    /// failed runs return the error. Either way the session ends in a
    /// terminal state and subsequent calls fail with `SessionBusy`.
    pub fn acquire(
        &mut self,
        case: &CaseRecord,
        examiner: &ExaminerRecord,
        requested_filename: Option<&str>,
        extension: &str,
    ) -> Result<SessionOutcome, AcquisitionError> {
        if self.state == SessionState::Running || self.state.is_terminal() {
            return Err(AcquisitionError::SessionBusy);
        }
        if self.state == SessionState::Idle {
            self.prepare()?;
        }

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| AcquisitionError::file_access(&self.output_dir, e))?;

        let target = AcquisitionTarget::build(&self.output_dir, requested_filename, extension);
        info!("Acquisition target: {}", target.destination_path.display());

        // prepare() above guarantees the profile; clone it out so the
        // borrow does not pin &mut self across the run.
        let profile = match self.profile.clone() {
            Some(profile) => profile,
            None => return Err(AcquisitionError::SessionBusy),
        };

        self.state = SessionState::Running;

        let handle = match self.runner.start(&profile, &target) {
            Ok(handle) => handle,
            Err(e) => {
                self.state = SessionState::Failed;
                return Err(e);
            }
        };

        let run = match self.runner.wait(handle) {
            Ok(run) => run,
            Err(e) => {
                self.state = SessionState::Failed;
                return Err(e);
            }
        };

        match run.status {
            RunStatus::Cancelled => {
                warn!("Acquisition cancelled; partial artifact retained, no report generated");
                self.state = SessionState::Cancelled;
                Ok(SessionOutcome {
                    run,
                    artifact_path: target.destination_path.clone(),
                    digests: None,
                    report_path: None,
                })
            }
            RunStatus::Failed => {
                self.state = SessionState::Failed;
                Err(AcquisitionError::AcquisitionFailed {
                    code: run.exit_code,
                })
            }
            RunStatus::Completed => {
                let digests = match hashing::hash_file(&target.destination_path, &HashAlgorithm::ALL)
                {
                    Ok(digests) => digests,
                    Err(e) => {
                        self.state = SessionState::Failed;
                        return Err(e);
                    }
                };

                let ctx = ReportContext {
                    case,
                    examiner,
                    profile: &profile,
                    run: &run,
                    digests: &digests,
                    target: &target,
                };
                let report_path = match report::generate(&ctx, &self.output_dir) {
                    Ok(path) => path,
                    Err(e) => {
                        self.state = SessionState::Failed;
                        return Err(e);
                    }
                };

                self.state = SessionState::Completed;
                info!("Acquisition session completed");
                Ok(SessionOutcome {
                    run,
                    artifact_path: target.destination_path.clone(),
                    digests: Some(digests),
                    report_path: Some(report_path),
                })
            }
            // The runner only ever returns terminal runs.
            RunStatus::Pending | RunStatus::Running => {
                self.state = SessionState::Failed;
                Err(AcquisitionError::AcquisitionFailed {
                    code: run.exit_code,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LaunchMode, OsFamily};
    use tempfile::TempDir;

    fn profile_with_tool(tool_command: Vec<String>) -> PlatformProfile {
        PlatformProfile {
            os_family: OsFamily::Linux,
            manufacturer: "TestVendor".to_string(),
            model: "TestModel".to_string(),
            os_build: String::new(),
            os_name: "Linux".to_string(),
            os_version: "6.1".to_string(),
            hostname: "test-host".to_string(),
            architecture: "x86_64".to_string(),
            total_physical_memory: 8 * 1024 * 1024 * 1024,
            total_virtual_memory: 2 * 1024 * 1024 * 1024,
            tool_command,
            launch_mode: LaunchMode::Direct,
            inventory_degraded: false,
        }
    }

    fn sh_tool(script: &str) -> Vec<String> {
        vec!["/bin/sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_with_profile_starts_ready() {
        let session = AcquisitionSession::with_profile("Output", profile_with_tool(Vec::new()));
        assert_eq!(session.state(), SessionState::ProfileReady);
        assert!(session.profile().is_some());
    }

    #[test]
    fn test_new_starts_idle() {
        let session = AcquisitionSession::new("Output");
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.profile().is_none());
    }

    #[test]
    fn test_session_state_terminal() {
        assert!(!SessionState::Idle.is_terminal());
        assert!(!SessionState::ProfileReady.is_terminal());
        assert!(!SessionState::Running.is_terminal());
        assert!(SessionState::Completed.is_terminal());
        assert!(SessionState::Cancelled.is_terminal());
        assert!(SessionState::Failed.is_terminal());
    }

    #[cfg(unix)]
    #[test]
    fn test_acquire_completes_and_reports() {
        let dir = TempDir::new().unwrap();
        let mut session = AcquisitionSession::with_profile(
            dir.path(),
            profile_with_tool(sh_tool("printf '0123456789' > \"$0\"")),
        );

        let case = CaseRecord::default();
        let examiner = ExaminerRecord::default();
        let outcome = session
            .acquire(&case, &examiner, Some("memdump_test"), ".raw")
            .unwrap();

        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(outcome.run.status, RunStatus::Completed);
        assert_eq!(outcome.artifact_path, dir.path().join("memdump_test.raw"));

        let digests = outcome.digests.unwrap();
        assert_eq!(
            digests.get(HashAlgorithm::Md5),
            Some("781e5e245d69b566979b86e28d23f2c7")
        );

        let report_path = outcome.report_path.unwrap();
        assert_eq!(report_path, dir.path().join("Report_memdump_test.txt"));
        assert!(report_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_second_acquire_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut session = AcquisitionSession::with_profile(
            dir.path(),
            profile_with_tool(sh_tool("printf 'x' > \"$0\"")),
        );

        let case = CaseRecord::default();
        let examiner = ExaminerRecord::default();
        session
            .acquire(&case, &examiner, Some("first"), ".raw")
            .unwrap();

        match session.acquire(&case, &examiner, Some("second"), ".raw") {
            Err(AcquisitionError::SessionBusy) => {}
            other => panic!("expected SessionBusy, got {:?}", other.map(|_| ())),
        }
        // Terminal state survives the rejected call.
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_tool_surfaces_exit_code() {
        let dir = TempDir::new().unwrap();
        let mut session =
            AcquisitionSession::with_profile(dir.path(), profile_with_tool(sh_tool("exit 3")));

        let case = CaseRecord::default();
        let examiner = ExaminerRecord::default();
        match session.acquire(&case, &examiner, Some("memdump_test"), ".raw") {
            Err(AcquisitionError::AcquisitionFailed { code: Some(3) }) => {}
            other => panic!("expected AcquisitionFailed(3), got {:?}", other.map(|_| ())),
        }
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[cfg(unix)]
    #[test]
    fn test_cancelled_run_yields_no_report() {
        let dir = TempDir::new().unwrap();
        let mut session =
            AcquisitionSession::with_profile(dir.path(), profile_with_tool(sh_tool("sleep 30")));

        let token = session.cancel_token();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(150));
            token.cancel();
        });

        let case = CaseRecord::default();
        let examiner = ExaminerRecord::default();
        let outcome = session
            .acquire(&case, &examiner, Some("memdump_test"), ".raw")
            .unwrap();
        canceller.join().unwrap();

        assert_eq!(session.state(), SessionState::Cancelled);
        assert_eq!(outcome.run.status, RunStatus::Cancelled);
        assert!(outcome.digests.is_none());
        assert!(outcome.report_path.is_none());
        assert!(!dir.path().join("Report_memdump_test.txt").exists());
    }

    #[test]
    fn test_acquire_without_tool_fails_unsupported() {
        let dir = TempDir::new().unwrap();
        let mut session =
            AcquisitionSession::with_profile(dir.path(), profile_with_tool(Vec::new()));

        let case = CaseRecord::default();
        let examiner = ExaminerRecord::default();
        match session.acquire(&case, &examiner, Some("memdump_test"), ".raw") {
            Err(AcquisitionError::UnsupportedPlatform(_)) => {}
            other => panic!("expected UnsupportedPlatform, got {:?}", other.map(|_| ())),
        }
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[cfg(unix)]
    #[test]
    fn test_output_dir_is_created() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("evidence").join("Output");
        let mut session = AcquisitionSession::with_profile(
            &nested,
            profile_with_tool(sh_tool("printf 'x' > \"$0\"")),
        );

        let case = CaseRecord::default();
        let examiner = ExaminerRecord::default();
        session
            .acquire(&case, &examiner, Some("memdump_test"), ".raw")
            .unwrap();
        assert!(nested.join("memdump_test.raw").exists());
    }
}
