//! Global constants for the mem-acquire application.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Hashing constants
/// Chunk size for streaming hash computation (4KB)
pub const HASH_CHUNK_SIZE: usize = 4096;

// Process supervision constants
/// Polling interval for child process liveness checks, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// Filesystem layout
/// Output directory holding the image and its report, relative to the working directory
pub const OUTPUT_DIR_NAME: &str = "Output";

/// Prefix for the report file name (`Report_<name>.txt`)
pub const REPORT_FILE_PREFIX: &str = "Report_";

/// Prefix for the default image file name
pub const DEFAULT_DUMP_PREFIX: &str = "memdump";

/// Default image file extension
pub const DEFAULT_IMAGE_EXTENSION: &str = ".raw";

// Timestamp formats
/// Timestamp embedded in default image file names
pub const DUMP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Human-readable timestamp format used in the acquisition report
pub const REPORT_TIMESTAMP_FORMAT: &str = "%A %d %B %Y %H:%M:%S";

// Bundled acquisition tools
/// Physical memory imaging executable bundled for Windows hosts
pub const WINDOWS_ACQUISITION_TOOL: &str = "tools/winpmem_mini_x64_rc2.exe";

/// Minimal live-imaging binary bundled for Linux hosts
pub const LINUX_ACQUISITION_TOOL: &str = "./tools/avml-minimal";

// Report rendering
/// Tool name printed in the report banner
pub const REPORT_GENERATOR_NAME: &str = "Memory Acquisition Tool";

/// Bytes per gigabyte, used for the two-decimal GB fields in the report
pub const BYTES_PER_GB: f64 = 1_073_741_824.0;
