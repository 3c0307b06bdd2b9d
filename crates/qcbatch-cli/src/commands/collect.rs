use crate::cli::{Cli, CollectArgs};
use crate::config::build_collect_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use qcbatch::{engine::progress::ProgressReporter, workflows};
use tracing::info;

pub fn run(cli: &Cli, args: &CollectArgs) -> Result<()> {
    let config = build_collect_config(cli, args)?;

    let progress_handler = CliProgressHandler::new("Collecting");
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!(multi_job = config.multi_job, "Collecting Q-Chem outputs.");
    let report = workflows::collect::run(&config, &reporter)?;

    for record in &report.records {
        let status = if record.completed { "✓" } else { "✗" };
        println!(
            "  {} {} [{}] -> {}",
            status,
            record.molecule,
            record.job_name,
            record.path.display()
        );
    }
    if !report.default_named.is_empty() {
        println!(
            "Default job names were used for: {}",
            report.default_named.join(", ")
        );
    }

    let unfinished = report.records.iter().filter(|r| !r.completed).count();
    println!(
        "Wrote {} record(s), {} unfinished.",
        report.records.len(),
        unfinished
    );
    Ok(())
}
