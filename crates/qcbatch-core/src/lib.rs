//! # qcbatch Core Library
//!
//! Batch preparation, submission and collection of Q-Chem geometry
//! optimizations on Slurm clusters.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three layers throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Atom`), the
//!   geometry and charge-table readers, and the Q-Chem input writer and output parser.
//!
//! - **[`engine`]: The Plumbing.** Configuration and its builders, the project
//!   directory layout, cluster profiles and submit scripts, the scheduler
//!   abstraction, progress events and the workflow error type.
//!
//! - **[`workflows`]: The Public API.** One function per operation (`prepare`,
//!   `submit`, `collect`, `discover`), each taking a configuration and a
//!   progress reporter and returning a report.

pub mod core;
pub mod engine;
pub mod workflows;
