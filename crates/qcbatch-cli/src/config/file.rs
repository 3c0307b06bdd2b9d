use crate::error::{CliError, Result};
use qcbatch::core::qchem::input::ParameterValue;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub layout: Option<FileLayoutConfig>,
    pub parameters: Option<FileParametersConfig>,
    #[serde(default)]
    pub clusters: BTreeMap<String, FileClusterConfig>,
    pub submission: Option<FileSubmissionConfig>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLayoutConfig {
    pub input_dir: Option<String>,
    pub charge_file: Option<String>,
    pub output_dir: Option<String>,
    pub geometry_extension: Option<String>,
    pub input_extension: Option<String>,
    pub output_extension: Option<String>,
    pub record_extension: Option<String>,
    pub script_name: Option<String>,
}

/// Keyword overrides, merged key by key over the built-in sections.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileParametersConfig {
    #[serde(default)]
    pub rem: BTreeMap<String, toml::Value>,
    #[serde(default)]
    pub smx: BTreeMap<String, toml::Value>,
    #[serde(default)]
    pub geom_opt: BTreeMap<String, toml::Value>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileClusterConfig {
    pub nodes: Option<u32>,
    pub qos: Option<String>,
    pub walltime: Option<String>,
    pub partition: Option<String>,
    pub account: Option<String>,
    pub job_name: Option<String>,
    pub ntasks: Option<u32>,
    pub setup: Option<Vec<String>>,
    pub modules: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSubmissionConfig {
    pub scheduler: Option<String>,
    pub delay_ms: Option<u64>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Converts a scalar TOML value into a Q-Chem keyword value.
pub fn to_parameter_value(key: &str, value: &toml::Value) -> Result<ParameterValue> {
    match value {
        toml::Value::Integer(v) => Ok(ParameterValue::Int(*v)),
        toml::Value::Float(v) => Ok(ParameterValue::Float(*v)),
        toml::Value::Boolean(v) => Ok(ParameterValue::Bool(*v)),
        toml::Value::String(v) => Ok(ParameterValue::Text(v.clone())),
        other => Err(CliError::Config(format!(
            "Parameter '{key}' must be a string, number or boolean, found {}",
            other.type_str()
        ))),
    }
}
