use super::defaults::DefaultsConfig;
use super::file::{FileClusterConfig, FileConfig, FileLayoutConfig, FileParametersConfig, to_parameter_value};
use crate::cli::{Cli, CollectArgs, PrepareArgs, SubmitArgs};
use crate::error::{CliError, Result};
use qcbatch::core::qchem::input::ParameterValue;
use qcbatch::engine::config::{
    Cluster, ClusterProfile, CollectConfig, CollectConfigBuilder, JobParameters, ParameterGroup,
    PrepareConfig, PrepareConfigBuilder, SubmitConfig, SubmitConfigBuilder, parse_job_names,
};
use qcbatch::engine::layout::ProjectLayout;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

pub fn build_layout(root: &Path, file: Option<&FileLayoutConfig>) -> ProjectLayout {
    let mut layout = ProjectLayout::new(root.to_path_buf());
    let Some(file) = file else {
        return layout;
    };
    let overrides = [
        (&file.input_dir, &mut layout.input_dir),
        (&file.charge_file, &mut layout.charge_file),
        (&file.output_dir, &mut layout.output_dir),
        (&file.geometry_extension, &mut layout.geometry_extension),
        (&file.input_extension, &mut layout.input_extension),
        (&file.output_extension, &mut layout.output_extension),
        (&file.record_extension, &mut layout.record_extension),
        (&file.script_name, &mut layout.script_name),
    ];
    for (value, slot) in overrides {
        if let Some(value) = value {
            *slot = value.clone();
        }
    }
    layout
}

pub fn resolve_layout(cli: &Cli) -> Result<ProjectLayout> {
    let file_config = load_file_config(cli.config.as_deref())?;
    Ok(build_layout(&cli.root, file_config.layout.as_ref()))
}

pub fn build_prepare_config(cli: &Cli, args: &PrepareArgs) -> Result<PrepareConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(cli.config.as_deref())?;

    let layout = build_layout(&cli.root, file_config.layout.as_ref());
    let cluster = args.cluster.map(Cluster::from).unwrap_or(defaults.cluster);

    let mut parameters = JobParameters::default();
    if let Some(file_params) = &file_config.parameters {
        merge_parameters(&mut parameters, file_params)?;
    }
    apply_set_values(&mut parameters, &args.set_values)?;

    for name in file_config.clusters.keys() {
        name.parse::<Cluster>()?;
    }
    let profile = merge_profile(
        cluster.default_profile(),
        file_config.clusters.get(cluster.as_str()),
    );
    debug!(?cluster, ?profile, "Resolved cluster profile.");

    Ok(PrepareConfigBuilder::new()
        .layout(layout)
        .parameters(parameters)
        .cluster(cluster)
        .profile(profile)
        .build()?)
}

pub fn build_submit_config(cli: &Cli, args: &SubmitArgs) -> Result<SubmitConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(cli.config.as_deref())?;
    let submission = file_config.submission.clone().unwrap_or_default();

    let scheduler = args
        .scheduler
        .clone()
        .or(submission.scheduler)
        .unwrap_or(defaults.scheduler);
    let delay_ms = args
        .delay_ms
        .or(submission.delay_ms)
        .unwrap_or(defaults.delay_ms);

    Ok(SubmitConfigBuilder::new()
        .layout(build_layout(&cli.root, file_config.layout.as_ref()))
        .scheduler_command(scheduler)
        .delay(Duration::from_millis(delay_ms))
        .dry_run(args.dry_run)
        .build()?)
}

pub fn build_collect_config(cli: &Cli, args: &CollectArgs) -> Result<CollectConfig> {
    let file_config = load_file_config(cli.config.as_deref())?;

    let mut builder = CollectConfigBuilder::new()
        .layout(build_layout(&cli.root, file_config.layout.as_ref()))
        .multi_job(args.multi_job);
    if let Some(list) = &args.job_names {
        builder = builder.job_names(parse_job_names(list));
    }
    Ok(builder.build()?)
}

fn merge_parameters(parameters: &mut JobParameters, file: &FileParametersConfig) -> Result<()> {
    let sections = [
        (ParameterGroup::Rem, &file.rem),
        (ParameterGroup::Smx, &file.smx),
        (ParameterGroup::GeomOpt, &file.geom_opt),
    ];
    for (group, values) in sections {
        for (key, value) in values {
            parameters.set(group, key, to_parameter_value(key, value)?);
        }
    }
    Ok(())
}

fn merge_profile(mut profile: ClusterProfile, file: Option<&FileClusterConfig>) -> ClusterProfile {
    let Some(file) = file.cloned() else {
        return profile;
    };
    if let Some(v) = file.nodes {
        profile.nodes = v;
    }
    if let Some(v) = file.qos {
        profile.qos = v;
    }
    if let Some(v) = file.walltime {
        profile.walltime = v;
    }
    if let Some(v) = file.partition {
        profile.partition = v;
    }
    if let Some(v) = file.account {
        profile.account = v;
    }
    if let Some(v) = file.job_name {
        profile.job_name = v;
    }
    if let Some(v) = file.ntasks {
        profile.ntasks = v;
    }
    if let Some(v) = file.setup {
        profile.setup = v;
    }
    if let Some(v) = file.modules {
        profile.modules = v;
    }
    profile
}

/// Applies `section.key=value` overrides, e.g. `rem.basis=def2-tzvpd`.
fn apply_set_values(parameters: &mut JobParameters, set_values: &[String]) -> Result<()> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected SECTION.KEY=VALUE.",
                kv_pair
            )));
        };
        let Some((section, name)) = key.trim().split_once('.') else {
            return Err(CliError::Config(format!(
                "Invalid --set key: '{}'. Expected SECTION.KEY (e.g. rem.basis).",
                key
            )));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(CliError::Config(format!("Empty keyword name in --set '{}'", kv_pair)));
        }
        let group: ParameterGroup = section.parse()?;
        let value = value_str
            .parse::<ParameterValue>()
            .unwrap_or_else(|never| match never {});
        debug!(%section, %name, %value, "Applying --set override.");
        parameters.set(group, name, value);
    }
    Ok(())
}
