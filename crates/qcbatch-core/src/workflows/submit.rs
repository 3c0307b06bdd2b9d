use crate::engine::config::SubmitConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scheduler::{Scheduler, SlurmScheduler};
use crate::workflows::discover;
use std::thread;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedJob {
    pub name: String,
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubmitReport {
    pub jobs: Vec<SubmittedJob>,
    pub dry_run: bool,
}

/// Submits every prepared job through the configured scheduler command.
#[instrument(skip_all, name = "submit_workflow")]
pub fn run(config: &SubmitConfig, reporter: &ProgressReporter) -> Result<SubmitReport, EngineError> {
    let scheduler = SlurmScheduler::new(config.scheduler_command.clone());
    run_with(config, &scheduler, reporter)
}

/// Submits every prepared job, one at a time, pausing `config.delay` between
/// submissions so the scheduler is not flooded.
///
/// All job directories and scripts are checked first; a missing one aborts
/// before anything is submitted. A rejected submission aborts the rest of
/// the batch.
pub fn run_with<S: Scheduler + ?Sized>(
    config: &SubmitConfig,
    scheduler: &S,
    reporter: &ProgressReporter,
) -> Result<SubmitReport, EngineError> {
    let layout = &config.layout;
    let names = discover::run(layout)?;

    for name in &names {
        let job_dir = layout.job_dir(name);
        if !job_dir.is_dir() {
            return Err(EngineError::MissingJobFile {
                name: name.clone(),
                what: "job directory",
                path: job_dir.to_string_lossy().to_string(),
            });
        }
        let script = layout.script_path(name);
        if !script.is_file() {
            return Err(EngineError::MissingJobFile {
                name: name.clone(),
                what: "submit script",
                path: script.to_string_lossy().to_string(),
            });
        }
    }

    reporter.report(Progress::BatchStart {
        total: names.len() as u64,
    });
    let mut report = SubmitReport {
        jobs: Vec::with_capacity(names.len()),
        dry_run: config.dry_run,
    };

    for (i, name) in names.iter().enumerate() {
        let job_id = if config.dry_run {
            let message = format!(
                "Would run `{} {}` in {}",
                scheduler.submit_command(),
                layout.script_name,
                layout.job_dir(name).display()
            );
            info!(name = %name, "{message}");
            reporter.report(Progress::Message(message));
            None
        } else {
            if i > 0 {
                thread::sleep(config.delay);
            }
            let submission = scheduler.submit(&layout.job_dir(name), &layout.script_name)?;
            info!(
                name = %name,
                job_id = submission.job_id.as_deref().unwrap_or("?"),
                "Submitted job."
            );
            submission.job_id
        };

        reporter.report(Progress::ItemDone { name: name.clone() });
        report.jobs.push(SubmittedJob {
            name: name.clone(),
            job_id,
        });
    }

    reporter.report(Progress::BatchFinish);
    Ok(report)
}
