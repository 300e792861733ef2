//! Core data models shared across the acquisition pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DUMP_PREFIX, DUMP_TIMESTAMP_FORMAT};

/// Host OS family supported by the acquisition pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Linux,
    MacOs,
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Windows => write!(f, "Windows"),
            OsFamily::Linux => write!(f, "Linux"),
            OsFamily::MacOs => write!(f, "macOS"),
        }
    }
}

/// How the external imaging tool is launched.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Child runs with its console window hidden (Windows elevated tools).
    HiddenElevated,
    /// Plain child process, no special flags.
    Direct,
}

/// Read-only description of the host, computed once per session at startup.
///
/// Carries everything the report generator needs about the target device so
/// no component re-queries the system after detection.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlatformProfile {
    pub os_family: OsFamily,
    pub manufacturer: String,
    pub model: String,
    pub os_build: String,
    pub os_name: String,
    pub os_version: String,
    pub hostname: String,
    pub architecture: String,
    /// Total physical memory in bytes
    pub total_physical_memory: u64,
    /// Total swap/virtual memory in bytes
    pub total_virtual_memory: u64,
    /// External imaging tool and its leading arguments; empty on macOS,
    /// where no acquisition tool is available.
    pub tool_command: Vec<String>,
    pub launch_mode: LaunchMode,
    /// True when the hardware inventory query failed and `model` holds the
    /// kernel machine identifier instead of a vendor model.
    pub inventory_degraded: bool,
}

impl PlatformProfile {
    /// Whether this platform has a usable acquisition tool.
    pub fn has_acquisition_tool(&self) -> bool {
        !self.tool_command.is_empty()
    }
}

/// Destination of one acquisition; immutable once the run starts.
#[derive(Debug, Clone)]
pub struct AcquisitionTarget {
    pub destination_path: PathBuf,
    pub file_extension: String,
    pub requested_filename: Option<String>,
    /// Base file name without extension, also used for the report name.
    pub base_name: String,
}

impl AcquisitionTarget {
    /// Build a target inside `output_dir`, defaulting the base name to
    /// `memdump_<timestamp>` when no filename was requested.
    pub fn build(output_dir: &Path, requested_filename: Option<&str>, extension: &str) -> Self {
        let base_name = match requested_filename {
            Some(name) => name.to_string(),
            None => format!(
                "{}_{}",
                DEFAULT_DUMP_PREFIX,
                Local::now().format(DUMP_TIMESTAMP_FORMAT)
            ),
        };
        let destination_path = output_dir.join(format!("{}{}", base_name, extension));
        AcquisitionTarget {
            destination_path,
            file_extension: extension.to_string(),
            requested_filename: requested_filename.map(|s| s.to_string()),
            base_name,
        }
    }
}

/// Lifecycle status of one acquisition run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Cancelled | RunStatus::Failed
        )
    }
}

/// Record of one supervised run of the external imaging tool.
///
/// Created by the runner at start and mutated only by it; terminal once
/// `status` is `Completed`, `Cancelled`, or `Failed`.
#[derive(Debug, Clone)]
pub struct AcquisitionRun {
    pub started_at: DateTime<Local>,
    pub ended_at: Option<DateTime<Local>>,
    pub status: RunStatus,
    pub exit_code: Option<i32>,
}

impl AcquisitionRun {
    pub fn pending() -> Self {
        AcquisitionRun {
            started_at: Local::now(),
            ended_at: None,
            status: RunStatus::Pending,
            exit_code: None,
        }
    }

    /// Elapsed wall-clock time; zero while the run is still in flight.
    pub fn elapsed(&self) -> chrono::Duration {
        match self.ended_at {
            Some(ended) => ended - self.started_at,
            None => chrono::Duration::zero(),
        }
    }
}

/// Digest algorithms supported by the integrity hasher.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    /// Every supported algorithm, in report order.
    pub const ALL: [HashAlgorithm; 3] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Hex digests of the completed artifact, keyed by algorithm.
///
/// Populated only after a run reaches `Completed`; never partial.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HashDigestSet {
    digests: BTreeMap<HashAlgorithm, String>,
}

impl HashDigestSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, algorithm: HashAlgorithm, hex_digest: String) {
        self.digests.insert(algorithm, hex_digest);
    }

    pub fn get(&self, algorithm: HashAlgorithm) -> Option<&str> {
        self.digests.get(&algorithm).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HashAlgorithm, &str)> {
        self.digests.iter().map(|(a, d)| (*a, d.as_str()))
    }
}

/// Case metadata supplied externally; passed through verbatim into the report.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CaseRecord {
    pub number: String,
    pub name: String,
    pub description: String,
}

/// Examiner metadata supplied externally; passed through verbatim into the report.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ExaminerRecord {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub organization: String,
}

/// Artifacts handed back to the caller after one acquisition.
#[derive(Debug)]
pub struct SessionOutcome {
    pub run: AcquisitionRun,
    pub artifact_path: PathBuf,
    /// Present only for completed runs.
    pub digests: Option<HashDigestSet>,
    /// Present only for completed runs; cancelled/failed runs leave no report.
    pub report_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_target_with_requested_filename() {
        let target = AcquisitionTarget::build(Path::new("Output"), Some("evidence_01"), ".raw");
        assert_eq!(target.base_name, "evidence_01");
        assert_eq!(target.destination_path, Path::new("Output/evidence_01.raw"));
        assert_eq!(target.file_extension, ".raw");
        assert_eq!(target.requested_filename.as_deref(), Some("evidence_01"));
    }

    #[test]
    fn test_target_default_filename() {
        let target = AcquisitionTarget::build(Path::new("Output"), None, ".lime");
        assert!(target.base_name.starts_with("memdump_"));
        assert!(target
            .destination_path
            .to_string_lossy()
            .ends_with(".lime"));
        assert!(target.requested_filename.is_none());
    }

    #[test]
    fn test_run_status_terminal() {
        assert!(!RunStatus::Pending.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Cancelled.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
    }

    #[test]
    fn test_run_elapsed_in_flight_is_zero() {
        let run = AcquisitionRun::pending();
        assert_eq!(run.elapsed(), chrono::Duration::zero());
    }

    #[test]
    fn test_hash_algorithm_names() {
        assert_eq!(HashAlgorithm::Md5.to_string(), "md5");
        assert_eq!(HashAlgorithm::Sha1.to_string(), "sha1");
        assert_eq!(HashAlgorithm::Sha256.to_string(), "sha256");
    }

    #[test]
    fn test_digest_set_lookup() {
        let mut set = HashDigestSet::new();
        assert!(set.is_empty());
        set.insert(HashAlgorithm::Md5, "abc".to_string());
        set.insert(HashAlgorithm::Sha256, "def".to_string());
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(HashAlgorithm::Md5), Some("abc"));
        assert_eq!(set.get(HashAlgorithm::Sha1), None);
    }

    #[test]
    fn test_os_family_display() {
        assert_eq!(OsFamily::Windows.to_string(), "Windows");
        assert_eq!(OsFamily::Linux.to_string(), "Linux");
        assert_eq!(OsFamily::MacOs.to_string(), "macOS");
    }
}
