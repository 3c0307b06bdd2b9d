use crate::cli::{Cli, SubmitArgs};
use crate::config::build_submit_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use qcbatch::{engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub fn run(cli: &Cli, args: &SubmitArgs) -> Result<()> {
    let config = build_submit_config(cli, args)?;

    let progress_handler = CliProgressHandler::new("Submitting");
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!(
        scheduler = %config.scheduler_command,
        delay_ms = config.delay.as_millis() as u64,
        dry_run = config.dry_run,
        "Submitting prepared jobs."
    );
    let report = workflows::submit::run(&config, &reporter)?;

    if report.jobs.is_empty() {
        warn!("No molecules found, so no jobs were submitted.");
        println!("Warning: no jobs to submit.");
        return Ok(());
    }

    for job in &report.jobs {
        match (&job.job_id, report.dry_run) {
            (_, true) => println!("  {} (dry run)", job.name),
            (Some(id), false) => println!("  {} -> job {}", job.name, id),
            (None, false) => println!("  {} -> submitted", job.name),
        }
    }
    if report.dry_run {
        println!("Dry run: {} job(s) would be submitted.", report.jobs.len());
    } else {
        println!("✓ Submitted {} job(s).", report.jobs.len());
    }
    Ok(())
}
