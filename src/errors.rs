//! Error taxonomy for the acquisition pipeline.
//!
//! Platform-detection and hardware-inventory failures are recovered locally
//! via fallback and never appear here; everything else propagates to the
//! session, which transitions to `Failed` and surfaces the error unchanged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the acquisition core.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// The host OS has no supported acquisition path. Raised for unknown OS
    /// families and for macOS, which ships no bundled imaging tool.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The external imaging tool could not be spawned (missing binary,
    /// permission denied).
    #[error("Failed to launch acquisition tool '{tool}': {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The external imaging tool ran but exited non-zero.
    #[error("Acquisition tool exited with code {}", display_code(.code))]
    AcquisitionFailed { code: Option<i32> },

    /// Hashing or report I/O failed: missing file, permission denied, or a
    /// disk error mid-stream.
    #[error("File access error for {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The session already ran an acquisition; sessions are single-flight.
    #[error("Session already ran an acquisition; create a new session to retry")]
    SessionBusy,
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

impl AcquisitionError {
    /// Wrap an I/O error as a `FileAccess` error for the given path.
    pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AcquisitionError::FileAccess {
            path: path.into(),
            source,
        }
    }
}
