use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Failed to run '{command}' in '{dir}': {source}")]
    Spawn {
        command: String,
        dir: String,
        source: std::io::Error,
    },
    #[error("'{command}' exited with {status} in '{dir}': {stderr}")]
    Rejected {
        command: String,
        dir: String,
        status: String,
        stderr: String,
    },
}

/// What the scheduler said after accepting a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Parsed from `Submitted batch job <id>`; `None` if the scheduler printed
    /// something else.
    pub job_id: Option<String>,
    pub stdout: String,
}

/// A batch queue that accepts submit scripts.
pub trait Scheduler {
    fn submit_command(&self) -> &str;

    /// Submits `script` (a path relative to `job_dir`) with `job_dir` as the
    /// working directory of the submission process.
    fn submit(&self, job_dir: &Path, script: &str) -> Result<Submission, SchedulerError>;
}

/// Submits through an external command such as `sbatch`.
#[derive(Debug, Clone)]
pub struct SlurmScheduler {
    command: String,
}

impl SlurmScheduler {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for SlurmScheduler {
    fn default() -> Self {
        Self::new(crate::engine::config::DEFAULT_SCHEDULER_COMMAND)
    }
}

impl Scheduler for SlurmScheduler {
    fn submit_command(&self) -> &str {
        &self.command
    }

    fn submit(&self, job_dir: &Path, script: &str) -> Result<Submission, SchedulerError> {
        let dir = job_dir.to_string_lossy().to_string();
        let spawn_error = |source| SchedulerError::Spawn {
            command: self.command.clone(),
            dir: dir.clone(),
            source,
        };

        // The command may carry its own flags, e.g. `sbatch --parsable`.
        let mut words = self.command.split_whitespace();
        let program = words.next().ok_or_else(|| {
            spawn_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty scheduler command",
            ))
        })?;

        debug!(command = %self.command, %dir, script, "Invoking scheduler");
        let output = Command::new(program)
            .args(words)
            .arg(script)
            .current_dir(job_dir)
            .output()
            .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(SchedulerError::Rejected {
                command: self.command.clone(),
                dir,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Submission {
            job_id: parse_job_id(&stdout),
            stdout,
        })
    }
}

fn is_job_id(id: &&str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// Extracts the id from sbatch's `Submitted batch job 123456` line, or from
/// the bare `123456[;cluster]` that `sbatch --parsable` prints.
pub fn parse_job_id(stdout: &str) -> Option<String> {
    let verbose = stdout
        .lines()
        .find(|line| line.trim_start().starts_with("Submitted batch job"))
        .and_then(|line| line.split_whitespace().last())
        .filter(is_job_id);
    let parsable = || {
        stdout
            .lines()
            .last()
            .and_then(|line| line.trim().split(';').next())
            .filter(is_job_id)
    };
    verbose.or_else(parsable).map(str::to_string)
}
