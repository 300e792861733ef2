//! # mem-acquire
//!
//! A cross-platform forensic physical memory acquisition tool written in Rust.
//!
//! ## Overview
//!
//! mem-acquire images the physical memory of the host it runs on by
//! supervising a platform-appropriate external imaging tool (winpmem on
//! Windows, AVML on Linux), then hashes the resulting artifact and writes a
//! fixed-layout chain-of-custody report alongside it.
//!
//! ## Features
//!
//! - **Platform profiling**: hardware and OS inventory captured once at startup
//! - **Supervised imaging**: external tool run with polling and cooperative cancel
//! - **Streaming integrity hashing**: MD5, SHA-1, and SHA-256 in one pass
//! - **Chain-of-custody report**: byte-stable layout with case and examiner details
//!
//! ## Usage
//!
//! ```no_run
//! use mem_acquire::models::{CaseRecord, ExaminerRecord};
//! use mem_acquire::session::AcquisitionSession;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut session = AcquisitionSession::new("Output");
//! let profile = session.prepare()?;
//! println!("Acquiring memory on {}", profile.os_family);
//!
//! let outcome = session.acquire(
//!     &CaseRecord::default(),
//!     &ExaminerRecord::default(),
//!     None,
//!     ".raw",
//! )?;
//! println!("Image written to {}", outcome.artifact_path.display());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod models;
pub mod platform;
pub mod privileges;
pub mod report;
pub mod runner;
pub mod session;
