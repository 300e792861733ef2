//! macOS platform profiling.
//!
//! Queries the hardware model via `system_profiler`, falling back to the
//! kernel machine identifier. No acquisition tool ships for macOS, so the
//! resulting profile carries an empty tool command and any attempt to start
//! an acquisition fails with `UnsupportedPlatform`.

use anyhow::{bail, Result};
use log::warn;

use crate::errors::AcquisitionError;
use crate::models::{LaunchMode, OsFamily, PlatformProfile};
use crate::platform::{base_profile, machine_identifier, run_inventory_command, HardwareInventory};

const APPLE_MANUFACTURER: &str = "Apple Inc.";

pub(crate) fn profile() -> Result<PlatformProfile, AcquisitionError> {
    let (model, degraded) = match query_system_profiler() {
        Ok(model) => (model, false),
        Err(e) => {
            warn!(
                "Hardware inventory query failed ({:#}); falling back to kernel machine identifier",
                e
            );
            (machine_identifier(), true)
        }
    };

    let os_build = run_inventory_command("sw_vers", &["-buildVersion"])
        .map(|output| output.trim().to_string())
        .unwrap_or_default();

    let inventory = HardwareInventory {
        manufacturer: APPLE_MANUFACTURER.to_string(),
        model,
        os_build,
        degraded,
    };

    Ok(base_profile(
        OsFamily::MacOs,
        inventory,
        Vec::new(),
        LaunchMode::Direct,
    ))
}

fn query_system_profiler() -> Result<String> {
    let output = run_inventory_command("system_profiler", &["SPHardwareDataType"])?;
    match parse_system_profiler(&output) {
        Some(model) => Ok(model),
        None => bail!("system_profiler output contained no model name"),
    }
}

/// Extract the `Model Name:` value from `system_profiler SPHardwareDataType`
/// output.
pub fn parse_system_profiler(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        line.trim()
            .strip_prefix("Model Name:")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM_PROFILER_OUTPUT: &str = "\
Hardware:

    Hardware Overview:

      Model Name: MacBook Pro
      Model Identifier: MacBookPro18,3
      Chip: Apple M1 Pro
      Total Number of Cores: 10 (8 performance and 2 efficiency)
      Memory: 16 GB
";

    #[test]
    fn test_parse_system_profiler_model_name() {
        assert_eq!(
            parse_system_profiler(SYSTEM_PROFILER_OUTPUT).as_deref(),
            Some("MacBook Pro")
        );
    }

    #[test]
    fn test_parse_system_profiler_no_model() {
        assert!(parse_system_profiler("Hardware:\n    Chip: Apple M1\n").is_none());
    }

    #[test]
    fn test_parse_system_profiler_empty() {
        assert!(parse_system_profiler("").is_none());
    }

    #[test]
    fn test_profile_has_no_acquisition_tool() {
        let profile = profile().unwrap();
        assert_eq!(profile.os_family, OsFamily::MacOs);
        assert_eq!(profile.manufacturer, APPLE_MANUFACTURER);
        assert!(!profile.has_acquisition_tool());
    }
}
