//! Windows platform profiling.
//!
//! Queries manufacturer, model, and OS build number through the WMI
//! command-line inventory and selects the bundled 64-bit winpmem imaging
//! executable, launched with its window hidden.

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::constants::WINDOWS_ACQUISITION_TOOL;
use crate::errors::AcquisitionError;
use crate::models::{LaunchMode, OsFamily, PlatformProfile};
use crate::platform::{base_profile, run_inventory_command, HardwareInventory};

pub(crate) fn profile() -> Result<PlatformProfile, AcquisitionError> {
    let inventory = match query_wmi() {
        Ok(inventory) => inventory,
        Err(e) => {
            warn!(
                "Hardware inventory query failed ({:#}); falling back to architecture identifier",
                e
            );
            HardwareInventory::degraded(std::env::consts::ARCH.to_string())
        }
    };

    Ok(base_profile(
        OsFamily::Windows,
        inventory,
        vec![WINDOWS_ACQUISITION_TOOL.to_string()],
        LaunchMode::HiddenElevated,
    ))
}

fn query_wmi() -> Result<HardwareInventory> {
    let computer_system =
        run_inventory_command("wmic", &["computersystem", "get", "manufacturer,model", "/value"])?;
    let manufacturer = parse_wmic_value(&computer_system, "Manufacturer").unwrap_or_default();
    let model = parse_wmic_value(&computer_system, "Model")
        .context("no Model in wmic computersystem output")?;

    let operating_system = run_inventory_command("wmic", &["os", "get", "buildnumber", "/value"])?;
    let os_build = parse_wmic_value(&operating_system, "BuildNumber").unwrap_or_default();

    debug!("WMI inventory: {} {} (build {})", manufacturer, model, os_build);
    Ok(HardwareInventory {
        manufacturer,
        model,
        os_build,
        degraded: false,
    })
}

/// Extract a `Key=Value` entry from `wmic ... /value` output.
pub fn parse_wmic_value(output: &str, key: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let line = line.trim();
        line.strip_prefix(key)
            .and_then(|rest| rest.strip_prefix('='))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
