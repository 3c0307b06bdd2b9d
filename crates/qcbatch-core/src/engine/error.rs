use thiserror::Error;

use super::config::ConfigError;
use super::scheduler::SchedulerError;
use crate::core::io::charges::ChargeTableError;
use crate::core::io::xyz::XyzError;
use crate::core::models::molecule::MoleculeError;
use crate::core::qchem::input::QChemInputError;
use crate::core::qchem::output::QChemOutputError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot list geometry files in '{path}': {source}")]
    Discovery {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    ChargeTable(#[from] ChargeTableError),

    #[error("Failed to read geometry file '{path}': {source}")]
    Geometry { path: String, source: XyzError },

    #[error("Invalid charge or multiplicity for '{file}': {source}")]
    ChargeState { file: String, source: MoleculeError },

    #[error("Failed to build Q-Chem input for '{name}': {source}")]
    Input {
        name: String,
        source: QChemInputError,
    },

    #[error("Job directory '{path}' already exists; refusing to overwrite")]
    JobDirectoryExists { path: String },

    #[error("Missing {what} for '{name}': '{path}' does not exist")]
    MissingJobFile {
        name: String,
        what: &'static str,
        path: String,
    },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Failed to read Q-Chem output '{path}': {source}")]
    Output {
        path: String,
        source: QChemOutputError,
    },

    #[error("Failed to encode record '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

impl EngineError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string_lossy().to_string(),
            source,
        }
    }
}
