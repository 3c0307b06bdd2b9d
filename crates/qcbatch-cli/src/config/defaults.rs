use qcbatch::engine::config::{Cluster, DEFAULT_SCHEDULER_COMMAND, DEFAULT_SUBMIT_DELAY};

/// Values used when neither the command line nor the config file sets them.
pub struct DefaultsConfig {
    pub cluster: Cluster,
    pub scheduler: String,
    pub delay_ms: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::Swift,
            scheduler: DEFAULT_SCHEDULER_COMMAND.to_string(),
            delay_ms: DEFAULT_SUBMIT_DELAY.as_millis() as u64,
        }
    }
}
