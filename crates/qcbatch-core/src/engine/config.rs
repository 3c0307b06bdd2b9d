use crate::core::qchem::input::{ParameterSection, ParameterValue};
use crate::engine::layout::ProjectLayout;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SCHEDULER_COMMAND: &str = "sbatch";
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Unknown cluster '{0}' (expected one of: lrc, swift)")]
    UnknownCluster(String),
    #[error("Unknown parameter section '{0}' (expected one of: rem, smx, geom-opt)")]
    UnknownSection(String),
    #[error("Job names were given but multi-job mode is off")]
    JobNamesWithoutMultiJob,
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Which keyword section of the Q-Chem input a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterGroup {
    Rem,
    Smx,
    GeomOpt,
}

impl FromStr for ParameterGroup {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rem" => Ok(Self::Rem),
            "smx" => Ok(Self::Smx),
            "geom-opt" | "geom_opt" => Ok(Self::GeomOpt),
            other => Err(ConfigError::UnknownSection(other.to_string())),
        }
    }
}

/// The three keyword sections written into every input file.
#[derive(Debug, Clone, PartialEq)]
pub struct JobParameters {
    pub rem: ParameterSection,
    pub smx: ParameterSection,
    pub geom_opt: ParameterSection,
}

impl Default for JobParameters {
    /// Geometry optimization at ωB97X-V/def2-SVPD in an SMD continuum tuned
    /// for a custom solvent (ε = 18.5).
    fn default() -> Self {
        let rem = ParameterSection::new()
            .with("job_type", "opt")
            .with("basis", "def2-svpd")
            .with("max_scf_cycles", 100_i64)
            .with("gen_scfman", true)
            .with("xc_grid", 3_i64)
            .with("thresh", 14_i64)
            .with("s2thresh", 16_i64)
            .with("scf_algorithm", "diis")
            .with("resp_charges", true)
            .with("symmetry", false)
            .with("sym_ignore", true)
            .with("method", "wb97x-v")
            .with("solvent_method", "smd")
            .with("ideriv", 1_i64);
        let smx = ParameterSection::new()
            .with("solvent", "other")
            .with("epsilon", 18.5)
            .with("soln", 1.415)
            .with("sola", 0.0)
            .with("solb", 0.735)
            .with("solg", 20.2)
            .with("solc", 0.0)
            .with("solh", 0.0);
        let geom_opt = ParameterSection::new()
            .with("maxiter", 200_i64)
            .with("coordinates", "redundant")
            .with("max_displacement", 0.1)
            .with("optimization_restart", false);
        Self { rem, smx, geom_opt }
    }
}

impl JobParameters {
    pub fn section_mut(&mut self, group: ParameterGroup) -> &mut ParameterSection {
        match group {
            ParameterGroup::Rem => &mut self.rem,
            ParameterGroup::Smx => &mut self.smx,
            ParameterGroup::GeomOpt => &mut self.geom_opt,
        }
    }

    pub fn set(&mut self, group: ParameterGroup, key: &str, value: impl Into<ParameterValue>) {
        self.section_mut(group).set(key, value);
    }
}

/// Target cluster. Each one maps to a built-in [`ClusterProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cluster {
    Lrc,
    #[default]
    Swift,
}

impl Cluster {
    pub const ALL: [Cluster; 2] = [Cluster::Lrc, Cluster::Swift];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lrc => "lrc",
            Self::Swift => "swift",
        }
    }

    pub fn default_profile(&self) -> ClusterProfile {
        let setup = vec!["source activate cms_atomate".to_string()];
        match self {
            Self::Swift => ClusterProfile {
                nodes: 1,
                qos: "normal".into(),
                walltime: "24:00:00".into(),
                partition: "standard".into(),
                account: "silimorphous".into(),
                job_name: "geom_opt".into(),
                ntasks: 128,
                setup,
                modules: vec!["gcc".into(), "q-chem/6.0".into()],
            },
            Self::Lrc => ClusterProfile {
                nodes: 1,
                qos: "lr_normal".into(),
                walltime: "24:00:00".into(),
                partition: "lr6".into(),
                account: "lr_mp".into(),
                job_name: "geom_opt".into(),
                ntasks: 32,
                setup,
                modules: vec!["gcc".into(), "qchem/6.0".into()],
            },
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cluster {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownCluster(s.to_string()))
    }
}

/// Slurm resource request and environment setup for one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterProfile {
    pub nodes: u32,
    pub qos: String,
    pub walltime: String,
    pub partition: String,
    pub account: String,
    pub job_name: String,
    pub ntasks: u32,
    /// Shell lines run before the module loads, e.g. environment activation.
    pub setup: Vec<String>,
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrepareConfig {
    pub layout: ProjectLayout,
    pub parameters: JobParameters,
    pub cluster: Cluster,
    pub profile: ClusterProfile,
}

#[derive(Default)]
pub struct PrepareConfigBuilder {
    layout: Option<ProjectLayout>,
    parameters: Option<JobParameters>,
    cluster: Option<Cluster>,
    profile: Option<ClusterProfile>,
}

impl PrepareConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: ProjectLayout) -> Self {
        self.layout = Some(layout);
        self
    }
    pub fn parameters(mut self, parameters: JobParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
    pub fn cluster(mut self, cluster: Cluster) -> Self {
        self.cluster = Some(cluster);
        self
    }
    /// Replaces the cluster's built-in profile.
    pub fn profile(mut self, profile: ClusterProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn build(self) -> Result<PrepareConfig, ConfigError> {
        let layout = self.layout.ok_or(ConfigError::MissingParameter("layout"))?;
        let cluster = self.cluster.unwrap_or_default();
        let profile = self.profile.unwrap_or_else(|| cluster.default_profile());
        if profile.nodes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "nodes".into(),
                reason: "must be at least 1".into(),
            });
        }
        if profile.ntasks == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ntasks".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(PrepareConfig {
            layout,
            parameters: self.parameters.unwrap_or_default(),
            cluster,
            profile,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitConfig {
    pub layout: ProjectLayout,
    pub scheduler_command: String,
    pub delay: Duration,
    pub dry_run: bool,
}

#[derive(Default)]
pub struct SubmitConfigBuilder {
    layout: Option<ProjectLayout>,
    scheduler_command: Option<String>,
    delay: Option<Duration>,
    dry_run: bool,
}

impl SubmitConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: ProjectLayout) -> Self {
        self.layout = Some(layout);
        self
    }
    pub fn scheduler_command(mut self, command: impl Into<String>) -> Self {
        self.scheduler_command = Some(command.into());
        self
    }
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn build(self) -> Result<SubmitConfig, ConfigError> {
        let scheduler_command = self
            .scheduler_command
            .unwrap_or_else(|| DEFAULT_SCHEDULER_COMMAND.to_string());
        if scheduler_command.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "scheduler".into(),
                reason: "command must not be empty".into(),
            });
        }
        Ok(SubmitConfig {
            layout: self.layout.ok_or(ConfigError::MissingParameter("layout"))?,
            scheduler_command,
            delay: self.delay.unwrap_or(DEFAULT_SUBMIT_DELAY),
            dry_run: self.dry_run,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectConfig {
    pub layout: ProjectLayout,
    pub multi_job: bool,
    pub job_names: Option<Vec<String>>,
}

#[derive(Default)]
pub struct CollectConfigBuilder {
    layout: Option<ProjectLayout>,
    multi_job: bool,
    job_names: Option<Vec<String>>,
}

impl CollectConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: ProjectLayout) -> Self {
        self.layout = Some(layout);
        self
    }
    pub fn multi_job(mut self, multi_job: bool) -> Self {
        self.multi_job = multi_job;
        self
    }
    pub fn job_names(mut self, names: Vec<String>) -> Self {
        self.job_names = Some(names);
        self
    }

    pub fn build(self) -> Result<CollectConfig, ConfigError> {
        if self.job_names.is_some() && !self.multi_job {
            return Err(ConfigError::JobNamesWithoutMultiJob);
        }
        let job_names = self
            .job_names
            .map(|names| names.into_iter().map(|n| n.trim().to_string()).collect::<Vec<_>>());
        if let Some(names) = &job_names {
            validate_job_names(names)?;
        }
        Ok(CollectConfig {
            layout: self.layout.ok_or(ConfigError::MissingParameter("layout"))?,
            multi_job: self.multi_job,
            job_names,
        })
    }
}

/// Job names become file names inside the molecule's output directory.
fn validate_job_names(names: &[String]) -> Result<(), ConfigError> {
    let invalid = |name: &str, reason: &str| ConfigError::InvalidValue {
        key: "job-names".into(),
        reason: format!("'{name}' {reason}"),
    };
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(invalid(name, "is empty"));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(invalid(name, "is not a plain file name"));
        }
        if !seen.insert(name.as_str()) {
            return Err(invalid(name, "is listed more than once"));
        }
    }
    Ok(())
}

/// Splits a comma-separated job-name list (`"geom, freq, sp"`).
pub fn parse_job_names(list: &str) -> Vec<String> {
    list.split(',').map(|n| n.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn layout() -> ProjectLayout {
        ProjectLayout::new(PathBuf::from("/project"))
    }

    #[test]
    fn default_parameters_render_expected_values() {
        let params = JobParameters::default();
        assert_eq!(params.rem.len(), 14);
        assert_eq!(params.smx.len(), 8);
        assert_eq!(params.geom_opt.len(), 4);
        assert_eq!(params.rem.get("method").unwrap().to_string(), "wb97x-v");
        assert_eq!(params.rem.get("gen_scfman").unwrap().to_string(), "true");
        assert_eq!(params.smx.get("sola").unwrap().to_string(), "0.0");
        assert_eq!(params.smx.get("epsilon").unwrap().to_string(), "18.5");
        assert_eq!(
            params.geom_opt.get("optimization_restart").unwrap().to_string(),
            "false"
        );
    }

    #[test]
    fn parameter_group_accepts_both_spellings() {
        assert_eq!("geom-opt".parse::<ParameterGroup>(), Ok(ParameterGroup::GeomOpt));
        assert_eq!("GEOM_OPT".parse::<ParameterGroup>(), Ok(ParameterGroup::GeomOpt));
        assert_eq!("rem".parse::<ParameterGroup>(), Ok(ParameterGroup::Rem));
        assert_eq!(
            "basis".parse::<ParameterGroup>(),
            Err(ConfigError::UnknownSection("basis".into()))
        );
    }

    #[test]
    fn overrides_land_in_the_right_section() {
        let mut params = JobParameters::default();
        params.set(ParameterGroup::Smx, "epsilon", 78.4);
        params.set(ParameterGroup::GeomOpt, "maxiter", 50_i64);
        assert_eq!(params.smx.get("epsilon"), Some(&ParameterValue::Float(78.4)));
        assert_eq!(params.geom_opt.get("maxiter"), Some(&ParameterValue::Int(50)));
        assert!(!params.rem.contains_key("epsilon"));
    }

    #[test]
    fn cluster_parsing_is_closed() {
        assert_eq!("swift".parse::<Cluster>(), Ok(Cluster::Swift));
        assert_eq!("LRC".parse::<Cluster>(), Ok(Cluster::Lrc));
        assert_eq!(
            "perlmutter".parse::<Cluster>(),
            Err(ConfigError::UnknownCluster("perlmutter".into()))
        );
        assert_eq!(Cluster::default(), Cluster::Swift);
    }

    #[test]
    fn cluster_profiles_differ_in_queue_parameters() {
        let swift = Cluster::Swift.default_profile();
        let lrc = Cluster::Lrc.default_profile();
        assert_eq!(swift.account, "silimorphous");
        assert_eq!(swift.ntasks, 128);
        assert_eq!(lrc.partition, "lr6");
        assert_ne!(swift.qos, lrc.qos);
    }

    #[test]
    fn prepare_builder_requires_layout_and_fills_defaults() {
        assert_eq!(
            PrepareConfigBuilder::new().build(),
            Err(ConfigError::MissingParameter("layout"))
        );

        let config = PrepareConfigBuilder::new()
            .layout(layout())
            .cluster(Cluster::Lrc)
            .build()
            .unwrap();
        assert_eq!(config.profile, Cluster::Lrc.default_profile());
        assert_eq!(config.parameters, JobParameters::default());
    }

    #[test]
    fn prepare_builder_rejects_zero_tasks() {
        let mut profile = Cluster::Swift.default_profile();
        profile.ntasks = 0;
        let err = PrepareConfigBuilder::new()
            .layout(layout())
            .profile(profile)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "ntasks"));
    }

    #[test]
    fn submit_builder_defaults() {
        let config = SubmitConfigBuilder::new().layout(layout()).build().unwrap();
        assert_eq!(config.scheduler_command, "sbatch");
        assert_eq!(config.delay, Duration::from_millis(500));
        assert!(!config.dry_run);

        let err = SubmitConfigBuilder::new()
            .layout(layout())
            .scheduler_command("  ")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn collect_builder_requires_multi_job_for_names() {
        let err = CollectConfigBuilder::new()
            .layout(layout())
            .job_names(vec!["geom".into()])
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::JobNamesWithoutMultiJob);

        let config = CollectConfigBuilder::new()
            .layout(layout())
            .multi_job(true)
            .job_names(vec![" geom".into(), "freq ".into()])
            .build()
            .unwrap();
        assert_eq!(config.job_names, Some(vec!["geom".into(), "freq".into()]));
    }

    #[test]
    fn collect_builder_rejects_unusable_job_names() {
        let build = |names: &[&str]| {
            CollectConfigBuilder::new()
                .layout(layout())
                .multi_job(true)
                .job_names(names.iter().map(|n| n.to_string()).collect())
                .build()
        };
        let cases: [&[&str]; 7] = [
            &["geom", ""],
            &["  "],
            &["../../escaped"],
            &["sub/dir"],
            &["win\\dir"],
            &[".."],
            &["geom", "freq", "geom"],
        ];
        for bad in cases {
            let err = build(bad).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidValue { key, .. } if key == "job-names"),
                "accepted {bad:?}: {err:?}"
            );
        }
        assert!(build(&["geom", "freq.v2", "sp"]).is_ok());
    }

    #[test]
    fn job_name_list_is_split_and_trimmed() {
        assert_eq!(parse_job_names("geom, freq, sp"), vec!["geom", "freq", "sp"]);
        assert_eq!(parse_job_names("single"), vec!["single"]);
    }
}
