use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use mem_acquire::cli::Args;
use mem_acquire::models::{HashAlgorithm, RunStatus};
use mem_acquire::privileges;
use mem_acquire::session::AcquisitionSession;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    info!("Starting memory acquisition");

    // Check privileges
    check_privileges(&args)?;

    let mut session = AcquisitionSession::new(&args.output);
    let profile = session.prepare()?.clone();

    info!(
        "Target device: {} {} ({} {})",
        profile.manufacturer, profile.model, profile.os_name, profile.os_version
    );
    if !profile.has_acquisition_tool() {
        warn!(
            "No acquisition tool is available for {}; acquisition will fail",
            profile.os_family
        );
    }

    // Ctrl-C requests a cooperative cancel; the runner observes it at the
    // next poll tick and the partial image is left in place.
    let cancel = session.cancel_token();
    ctrlc_handler(move || {
        warn!("Interrupt received, cancelling acquisition");
        cancel.cancel();
    })?;

    let case = args.case_record();
    let examiner = args.examiner_record();
    let outcome = session.acquire(&case, &examiner, args.filename.as_deref(), &args.format)?;

    match outcome.run.status {
        RunStatus::Completed => {
            info!("Memory image: {}", outcome.artifact_path.display());
            if let Some(digests) = &outcome.digests {
                for algorithm in HashAlgorithm::ALL {
                    if let Some(digest) = digests.get(algorithm) {
                        info!("{}: {}", algorithm, digest);
                    }
                }
            }
            if let Some(report_path) = &outcome.report_path {
                info!("Report: {}", report_path.display());
            }
            info!("Memory acquisition completed successfully");
        }
        RunStatus::Cancelled => {
            warn!(
                "Acquisition cancelled; partial image at {} (no report generated)",
                outcome.artifact_path.display()
            );
        }
        _ => {}
    }

    Ok(())
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

/// Refuse to run without elevation unless --force was given
fn check_privileges(args: &Args) -> Result<()> {
    if !privileges::is_elevated() {
        warn!("Running without elevated privileges - physical memory may be inaccessible");

        if !args.force {
            return Err(anyhow!(
                "Elevated privileges required. {} or use --force to continue anyway",
                privileges::get_elevation_instructions()
            ));
        }
    }
    Ok(())
}

/// Install a Ctrl-C handler backed by the platform signal API.
fn ctrlc_handler<F: FnMut() + Send + 'static>(handler: F) -> Result<()> {
    ctrlc::set_handler(handler).context("Failed to install Ctrl-C handler")
}
