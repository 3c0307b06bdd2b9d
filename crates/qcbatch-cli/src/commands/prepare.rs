use crate::cli::{Cli, PrepareArgs};
use crate::config::build_prepare_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use qcbatch::{engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub fn run(cli: &Cli, args: &PrepareArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_prepare_config(cli, args)?;

    let progress_handler = CliProgressHandler::new("Preparing");
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Preparing Q-Chem jobs for cluster '{}' in {}",
        config.cluster,
        config.layout.input_root().display()
    );
    let report = workflows::prepare::run(&config, &reporter)?;

    if report.jobs.is_empty() {
        warn!("No geometry files were found; nothing was written.");
        println!(
            "Warning: no .{} files found in {}",
            config.layout.geometry_extension,
            config.layout.input_root().display()
        );
        return Ok(());
    }

    for job in &report.jobs {
        info!(name = %job.name, dir = ?job.job_dir, "Job prepared.");
        println!("  {} -> {}", job.name, job.job_dir.display());
    }
    println!(
        "✓ Wrote {} job(s) to {}",
        report.jobs.len(),
        config.layout.output_root().display()
    );
    Ok(())
}
