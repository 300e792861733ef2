use clap::Parser;

use crate::constants::{DEFAULT_IMAGE_EXTENSION, OUTPUT_DIR_NAME};
use crate::models::{CaseRecord, ExaminerRecord};

/// Command-line arguments for the memory acquisition tool.
///
/// Case and examiner details are free-form and flow verbatim into the
/// chain-of-custody report; the remaining options control where and how the
/// memory image is written.
#[derive(Parser, Debug)]
#[clap(name = "mem-acquire", about = "Forensic physical memory acquisition tool")]
pub struct Args {
    /// Case number for the report
    #[clap(long, default_value = "")]
    pub case_number: String,

    /// Case name for the report
    #[clap(long, default_value = "")]
    pub case_name: String,

    /// Case description for the report
    #[clap(long, default_value = "")]
    pub case_description: String,

    /// Examiner name for the report
    #[clap(long, default_value = "")]
    pub examiner_name: String,

    /// Examiner phone number for the report
    #[clap(long, default_value = "")]
    pub examiner_phone: String,

    /// Examiner email for the report
    #[clap(long, default_value = "")]
    pub examiner_email: String,

    /// Examiner organization for the report
    #[clap(long, default_value = "")]
    pub examiner_organization: String,

    /// Base name for the image file (default: memdump_{timestamp})
    #[clap(short, long)]
    pub filename: Option<String>,

    /// File extension for the image file
    #[clap(long, default_value = DEFAULT_IMAGE_EXTENSION)]
    pub format: String,

    /// Output directory for the image and report
    #[clap(short, long, default_value = OUTPUT_DIR_NAME)]
    pub output: String,

    /// Enable verbose (debug) logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Continue even without elevated privileges
    #[clap(long)]
    pub force: bool,
}

impl Args {
    pub fn case_record(&self) -> CaseRecord {
        CaseRecord {
            number: self.case_number.clone(),
            name: self.case_name.clone(),
            description: self.case_description.clone(),
        }
    }

    pub fn examiner_record(&self) -> ExaminerRecord {
        ExaminerRecord {
            name: self.examiner_name.clone(),
            phone: self.examiner_phone.clone(),
            email: self.examiner_email.clone(),
            organization: self.examiner_organization.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let args = Args::parse_from(["mem-acquire"]);

        assert_eq!(args.output, "Output");
        assert_eq!(args.format, ".raw");
        assert!(args.filename.is_none());
        assert!(!args.verbose);
        assert!(!args.force);
        assert_eq!(args.case_number, "");
    }

    #[test]
    fn test_case_and_examiner_args() {
        let args = Args::parse_from([
            "mem-acquire",
            "--case-number", "2024-001",
            "--case-name", "Intrusion",
            "--case-description", "Suspected lateral movement",
            "--examiner-name", "J. Doe",
            "--examiner-phone", "555-0100",
            "--examiner-email", "jdoe@example.org",
            "--examiner-organization", "Example Forensics",
        ]);

        let case = args.case_record();
        assert_eq!(case.number, "2024-001");
        assert_eq!(case.name, "Intrusion");
        assert_eq!(case.description, "Suspected lateral movement");

        let examiner = args.examiner_record();
        assert_eq!(examiner.name, "J. Doe");
        assert_eq!(examiner.phone, "555-0100");
        assert_eq!(examiner.email, "jdoe@example.org");
        assert_eq!(examiner.organization, "Example Forensics");
    }

    #[test]
    fn test_output_and_filename_args() {
        let args = Args::parse_from([
            "mem-acquire",
            "--filename", "evidence_01",
            "--format", ".lime",
            "--output", "/mnt/evidence",
            "--verbose",
            "--force",
        ]);

        assert_eq!(args.filename, Some("evidence_01".to_string()));
        assert_eq!(args.format, ".lime");
        assert_eq!(args.output, "/mnt/evidence");
        assert!(args.verbose);
        assert!(args.force);
    }

    #[test]
    fn test_short_flags() {
        let args = Args::parse_from(["mem-acquire", "-f", "dump", "-o", "out", "-v"]);
        assert_eq!(args.filename, Some("dump".to_string()));
        assert_eq!(args.output, "out");
        assert!(args.verbose);
    }
}
