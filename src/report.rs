//! Chain-of-custody report generation.
//!
//! Renders the fixed-layout acquisition report; section order and field
//! labels are part of the external contract and must stay byte-stable for
//! downstream tooling. The report is derived from the same base name as the
//! image and written next to it in the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::constants::{BYTES_PER_GB, REPORT_FILE_PREFIX, REPORT_GENERATOR_NAME, REPORT_TIMESTAMP_FORMAT};
use crate::errors::AcquisitionError;
use crate::models::{
    AcquisitionRun, AcquisitionTarget, CaseRecord, ExaminerRecord, HashAlgorithm, HashDigestSet,
    PlatformProfile,
};

/// Everything the report formatter needs; assembled by the session after
/// hashing completes.
pub struct ReportContext<'a> {
    pub case: &'a CaseRecord,
    pub examiner: &'a ExaminerRecord,
    pub profile: &'a PlatformProfile,
    pub run: &'a AcquisitionRun,
    pub digests: &'a HashDigestSet,
    pub target: &'a AcquisitionTarget,
}

/// Generate the report for a completed acquisition and persist it.
///
/// Stats the artifact on disk for its size; a missing artifact (e.g. a
/// cancelled run) surfaces as [`AcquisitionError::FileAccess`]. An existing
/// report with the same name is overwritten.
pub fn generate(ctx: &ReportContext<'_>, output_dir: &Path) -> Result<PathBuf, AcquisitionError> {
    let metadata = fs::metadata(&ctx.target.destination_path)
        .map_err(|e| AcquisitionError::file_access(&ctx.target.destination_path, e))?;

    let rendered = render(ctx, metadata.len());

    let report_path = output_dir.join(format!("{}{}.txt", REPORT_FILE_PREFIX, ctx.target.base_name));
    fs::write(&report_path, rendered)
        .map_err(|e| AcquisitionError::file_access(&report_path, e))?;

    info!("Acquisition report written to {}", report_path.display());
    Ok(report_path)
}

/// Render the report body for the given artifact size.
pub fn render(ctx: &ReportContext<'_>, file_size_bytes: u64) -> String {
    let start_time = ctx.run.started_at.format(REPORT_TIMESTAMP_FORMAT).to_string();
    let end_time = ctx
        .run
        .ended_at
        .unwrap_or(ctx.run.started_at)
        .format(REPORT_TIMESTAMP_FORMAT)
        .to_string();

    let model = if ctx.profile.inventory_degraded {
        format!("{} (fallback identifier)", ctx.profile.model)
    } else {
        ctx.profile.model.clone()
    };

    format!(
        r#"--------------xx Memory Acquisition Report xx--------------
Report Created By {generator} v{version}
-----------------------------------------------------------

[Case Details:]
    Number:      {case_number}
    Name:        {case_name}
    Description: {case_description}

[Examiner Details:]
    Name:         {examiner_name}
    Phone No.:    {examiner_phone}
    Email Id:     {examiner_email}
    Organization: {examiner_organization}

-----------------------------------------------------------

[Dump File Information:]

    File Name: {file_name}
    File Format: {file_format}
    File Size: {file_size} GB
    File Location: {file_location}

    MD5 Hash: {md5}
    SHA1 Hash: {sha1}
    SHA256 Hash: {sha256}

-----------------------------------------------------------

[Acquisition Details:]

    Start Time: {start_time}
    End Time: {end_time}
    Elapsed Time: {elapsed}

-----------------------------------------------------------

[Target Device Information:]

    System Name: {system_name}
    System Manufacturer: {manufacturer}
    System Model: {model}
    System Architecture: {architecture}

    OS Name: {os_name}
    OS Version: {os_version}
    OS Build: {os_build}

    Total Physical Memory: {physical_memory} GB
    Total Virtual Memory: {virtual_memory} GB

-----------------------------------------------------------
"#,
        generator = REPORT_GENERATOR_NAME,
        version = env!("CARGO_PKG_VERSION"),
        case_number = ctx.case.number,
        case_name = ctx.case.name,
        case_description = ctx.case.description,
        examiner_name = ctx.examiner.name,
        examiner_phone = ctx.examiner.phone,
        examiner_email = ctx.examiner.email,
        examiner_organization = ctx.examiner.organization,
        file_name = ctx.target.base_name,
        file_format = ctx.target.file_extension,
        file_size = format_gb(file_size_bytes),
        file_location = ctx.target.destination_path.display(),
        md5 = ctx.digests.get(HashAlgorithm::Md5).unwrap_or(""),
        sha1 = ctx.digests.get(HashAlgorithm::Sha1).unwrap_or(""),
        sha256 = ctx.digests.get(HashAlgorithm::Sha256).unwrap_or(""),
        start_time = start_time,
        end_time = end_time,
        elapsed = format_elapsed(ctx.run.elapsed()),
        system_name = ctx.profile.hostname,
        manufacturer = ctx.profile.manufacturer,
        model = model,
        architecture = ctx.profile.architecture,
        os_name = ctx.profile.os_name,
        os_version = ctx.profile.os_version,
        os_build = ctx.profile.os_build,
        physical_memory = format_gb(ctx.profile.total_physical_memory),
        virtual_memory = format_gb(ctx.profile.total_virtual_memory),
    )
}

/// Bytes rendered in GB with two decimal places.
fn format_gb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_GB)
}

/// Elapsed time rendered as `HH:MM:SS`.
fn format_elapsed(elapsed: chrono::Duration) -> String {
    let total_seconds = elapsed.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}
