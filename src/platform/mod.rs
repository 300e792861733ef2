//! Platform detection and acquisition-tool selection.
//!
//! `detect` builds a read-only [`PlatformProfile`] for the host: OS family,
//! hardware vendor/model, OS build, and the bundled imaging tool to invoke.
//! Hardware-inventory failures degrade to the kernel machine identifier and
//! are logged, never surfaced as errors.

pub mod linux;
pub mod macos;
pub mod windows;

use std::process::Command;

use anyhow::{bail, Context, Result};
use log::debug;
use sysinfo::{System, SystemExt};

use crate::errors::AcquisitionError;
use crate::models::{LaunchMode, OsFamily, PlatformProfile};

/// Detect the host platform and select its acquisition tool.
///
/// Fails with [`AcquisitionError::UnsupportedPlatform`] if the host OS is
/// none of the three supported families. Performs read-only system queries
/// only; no network access.
pub fn detect() -> Result<PlatformProfile, AcquisitionError> {
    #[cfg(target_os = "windows")]
    {
        windows::profile()
    }
    #[cfg(target_os = "linux")]
    {
        linux::profile()
    }
    #[cfg(target_os = "macos")]
    {
        macos::profile()
    }
    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        Err(AcquisitionError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }
}

/// Vendor/model/build triple gathered by a platform inventory query.
#[derive(Debug, Clone)]
pub(crate) struct HardwareInventory {
    pub manufacturer: String,
    pub model: String,
    pub os_build: String,
    pub degraded: bool,
}

impl HardwareInventory {
    /// Fallback inventory carrying only the kernel machine identifier.
    pub(crate) fn degraded(machine: String) -> Self {
        HardwareInventory {
            manufacturer: String::new(),
            model: machine,
            os_build: String::new(),
            degraded: true,
        }
    }
}

/// Assemble the full profile from an inventory plus generic host facts.
pub(crate) fn base_profile(
    os_family: OsFamily,
    inventory: HardwareInventory,
    tool_command: Vec<String>,
    launch_mode: LaunchMode,
) -> PlatformProfile {
    let mut system = System::new();
    system.refresh_memory();

    let hostname = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_default();

    PlatformProfile {
        os_family,
        manufacturer: inventory.manufacturer,
        model: inventory.model,
        os_build: inventory.os_build,
        os_name: system
            .name()
            .unwrap_or_else(|| std::env::consts::OS.to_string()),
        os_version: system.os_version().unwrap_or_default(),
        hostname,
        architecture: std::env::consts::ARCH.to_string(),
        total_physical_memory: system.total_memory(),
        total_virtual_memory: system.total_swap(),
        tool_command,
        launch_mode,
        inventory_degraded: inventory.degraded,
    }
}

/// Kernel-reported machine identifier (`uname -m`), falling back to the
/// compile-time architecture when uname is unavailable.
pub(crate) fn machine_identifier() -> String {
    Command::new("uname")
        .arg("-m")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|machine| !machine.is_empty())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string())
}

/// Run a read-only system inventory command and capture its stdout.
pub(crate) fn run_inventory_command(program: &str, args: &[&str]) -> Result<String> {
    debug!("Running inventory command: {} {}", program, args.join(" "));
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute {}", program))?;

    if !output.status.success() {
        bail!("{} exited with {}", program, output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
