//! Linux platform profiling.
//!
//! Queries hardware inventory via `dmidecode -t system`; when the tool is
//! absent, unprivileged, or its output unparseable, falls back to the kernel
//! machine identifier with an empty manufacturer.

use anyhow::{bail, Result};
use log::{debug, warn};

use crate::constants::LINUX_ACQUISITION_TOOL;
use crate::errors::AcquisitionError;
use crate::models::{LaunchMode, OsFamily, PlatformProfile};
use crate::platform::{base_profile, machine_identifier, run_inventory_command, HardwareInventory};

pub(crate) fn profile() -> Result<PlatformProfile, AcquisitionError> {
    let inventory = match query_dmidecode() {
        Ok(inventory) => inventory,
        Err(e) => {
            warn!(
                "Hardware inventory query failed ({:#}); falling back to kernel machine identifier",
                e
            );
            HardwareInventory::degraded(machine_identifier())
        }
    };

    Ok(base_profile(
        OsFamily::Linux,
        inventory,
        vec![LINUX_ACQUISITION_TOOL.to_string()],
        LaunchMode::Direct,
    ))
}

fn query_dmidecode() -> Result<HardwareInventory> {
    let output = run_inventory_command("dmidecode", &["-t", "system"])?;
    match parse_dmidecode(&output) {
        Some((manufacturer, model)) => {
            debug!("dmidecode inventory: {} {}", manufacturer, model);
            Ok(HardwareInventory {
                manufacturer,
                model,
                os_build: String::new(),
                degraded: false,
            })
        }
        None => bail!("dmidecode output contained no system identification"),
    }
}

/// Extract `(manufacturer, product name)` from `dmidecode -t system` output.
///
/// Returns `None` on a parse miss (no product name present).
pub fn parse_dmidecode(output: &str) -> Option<(String, String)> {
    let mut manufacturer = String::new();
    let mut model = String::new();

    for line in output.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("Manufacturer:") {
            manufacturer = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("Product Name:") {
            model = value.trim().to_string();
        }
    }

    if model.is_empty() {
        None
    } else {
        Some((manufacturer, model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DMIDECODE_OUTPUT: &str = "\
# dmidecode 3.3
Getting SMBIOS data from sysfs.
SMBIOS 3.2.0 present.

Handle 0x0001, DMI type 1, 27 bytes
System Information
\tManufacturer: LENOVO
\tProduct Name: 20WMS0ABCD
\tVersion: ThinkPad T14 Gen 2i
\tSerial Number: ABC123
\tUUID: 00000000-0000-0000-0000-000000000000
\tWake-up Type: Power Switch
\tSKU Number: LENOVO_MT_20WM
\tFamily: ThinkPad T14 Gen 2i
";

    #[test]
    fn test_parse_dmidecode_full_output() {
        let (manufacturer, model) = parse_dmidecode(DMIDECODE_OUTPUT).unwrap();
        assert_eq!(manufacturer, "LENOVO");
        assert_eq!(model, "20WMS0ABCD");
    }

    #[test]
    fn test_parse_dmidecode_missing_product_name() {
        let output = "System Information\n\tManufacturer: LENOVO\n";
        assert!(parse_dmidecode(output).is_none());
    }

    #[test]
    fn test_parse_dmidecode_empty_output() {
        assert!(parse_dmidecode("").is_none());
    }

    #[test]
    fn test_parse_dmidecode_model_without_manufacturer() {
        let output = "\tProduct Name: VirtualBox\n";
        let (manufacturer, model) = parse_dmidecode(output).unwrap();
        assert!(manufacturer.is_empty());
        assert_eq!(model, "VirtualBox");
    }

    #[test]
    fn test_profile_never_fails() {
        // dmidecode may be absent or unprivileged here; either way the
        // profile must degrade instead of erroring.
        let profile = profile().unwrap();
        assert_eq!(profile.os_family, OsFamily::Linux);
        assert_eq!(profile.tool_command, vec![LINUX_ACQUISITION_TOOL]);
        assert!(!profile.model.is_empty());
    }
}
