//! # Engine Module
//!
//! Everything the workflows need besides file formats: run configuration and
//! its builders, the project directory layout, cluster profiles with their
//! submit-script template, the scheduler abstraction, progress reporting and
//! the error type the workflows return.
//!
//! - **Configuration** ([`config`]) - Job parameters, cluster selection, per-workflow settings
//! - **Layout** ([`layout`]) - Paths of geometry, input, script and output files
//! - **Cluster** ([`cluster`]) - Slurm submit-script rendering
//! - **Scheduler** ([`scheduler`]) - Submitting scripts to the batch queue
//! - **Progress Monitoring** ([`progress`]) - Events for user-facing progress display
//! - **Error Handling** ([`error`]) - Errors surfaced by the workflows

pub mod cluster;
pub mod config;
pub mod error;
pub mod layout;
pub mod progress;
pub mod scheduler;
