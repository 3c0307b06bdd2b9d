use crate::core::qchem::output::QChemOutput;
use crate::engine::config::CollectConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::workflows::discover;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedRecord {
    pub molecule: String,
    pub job_name: String,
    pub path: PathBuf,
    pub completed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CollectReport {
    pub records: Vec<CollectedRecord>,
    /// Molecules whose records were named `<name>_<index>` because no list
    /// was given or its length did not match.
    pub default_named: Vec<String>,
}

/// Names for `count` records of molecule `name`.
///
/// The requested list is used only when it has exactly `count` entries;
/// otherwise every record gets `<name>_<index>`. The flag is true when the
/// defaults were used.
pub fn resolve_job_names(name: &str, requested: Option<&[String]>, count: usize) -> (Vec<String>, bool) {
    match requested {
        Some(names) if names.len() == count => (names.to_vec(), false),
        _ => ((0..count).map(|i| format!("{name}_{i}")).collect(), true),
    }
}

/// Parses every molecule's Q-Chem output and writes the results as JSON next
/// to it.
#[instrument(skip_all, name = "collect_workflow", fields(multi_job = config.multi_job))]
pub fn run(config: &CollectConfig, reporter: &ProgressReporter) -> Result<CollectReport, EngineError> {
    let layout = &config.layout;
    let names = discover::run(layout)?;

    reporter.report(Progress::BatchStart {
        total: names.len() as u64,
    });
    let mut report = CollectReport::default();

    for name in &names {
        let output_path = layout.output_path(name);
        debug!(path = %output_path.display(), "Reading Q-Chem output.");

        if config.multi_job {
            let outputs = QChemOutput::multiple_from_path(&output_path)
                .map_err(|e| output_error(&output_path, e))?;
            let (job_names, defaulted) =
                resolve_job_names(name, config.job_names.as_deref(), outputs.len());
            if defaulted {
                let message = match &config.job_names {
                    None => format!("({name}) Job names not specified, using default names."),
                    Some(list) => format!(
                        "({name}) {} job name(s) given for {} job(s), using default names.",
                        list.len(),
                        outputs.len()
                    ),
                };
                warn!("{message}");
                reporter.report(Progress::Message(message));
                report.default_named.push(name.clone());
            }
            for (output, job_name) in outputs.iter().zip(job_names) {
                let path = layout.record_path(name, &job_name);
                write_record(output, &path)?;
                report.records.push(CollectedRecord {
                    molecule: name.clone(),
                    job_name,
                    path,
                    completed: output.completion,
                });
            }
        } else {
            let output =
                QChemOutput::from_path(&output_path).map_err(|e| output_error(&output_path, e))?;
            let path = layout.record_path(name, name);
            write_record(&output, &path)?;
            report.records.push(CollectedRecord {
                molecule: name.clone(),
                job_name: name.clone(),
                path,
                completed: output.completion,
            });
        }

        info!(name = %name, "Collected output.");
        reporter.report(Progress::ItemDone { name: name.clone() });
    }

    reporter.report(Progress::BatchFinish);
    Ok(report)
}

fn output_error(path: &Path, source: crate::core::qchem::output::QChemOutputError) -> EngineError {
    EngineError::Output {
        path: path.to_string_lossy().to_string(),
        source,
    }
}

/// Creates (or truncates) `path` and writes `output` as compact JSON.
fn write_record(output: &QChemOutput, path: &Path) -> Result<(), EngineError> {
    let file = File::create(path).map_err(|e| EngineError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, output).map_err(|e| EngineError::Json {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    writer.flush().map_err(|e| EngineError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::CollectConfigBuilder;
    use crate::engine::layout::ProjectLayout;
    use crate::engine::progress::testing::recording_reporter;
    use crate::workflows::test_support::{SHORT_QOUT, WATER_XYZ, project_with};
    use std::fs;
    use tempfile::tempdir;

    fn with_output(root: &Path, name: &str, qout: &str) {
        let dir = root.join("outputs").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{name}.qout")), qout).unwrap();
    }

    fn layout(root: &Path) -> ProjectLayout {
        ProjectLayout::new(root.to_path_buf())
    }

    fn two_jobs() -> String {
        format!("Running Job 1 of 2 water.qin\n{SHORT_QOUT}Running Job 2 of 2 water.qin\n{SHORT_QOUT}")
    }

    #[test]
    fn resolve_job_names_falls_back_on_mismatch() {
        let names = vec!["geom".to_string(), "freq".to_string()];
        assert_eq!(
            resolve_job_names("w", Some(names.as_slice()), 2),
            (names.clone(), false)
        );

        let (fallback, defaulted) = resolve_job_names("w", Some(names.as_slice()), 3);
        assert_eq!(fallback, vec!["w_0", "w_1", "w_2"]);
        assert!(defaulted);

        let (fallback, defaulted) = resolve_job_names("w", None, 1);
        assert_eq!(fallback, vec!["w_0"]);
        assert!(defaulted);
    }

    #[test]
    fn single_job_mode_writes_one_json_per_molecule() {
        let root = tempdir().unwrap();
        project_with(root.path(), &[("water.xyz", WATER_XYZ)], "{}");
        with_output(root.path(), "water", SHORT_QOUT);

        let config = CollectConfigBuilder::new().layout(layout(root.path())).build().unwrap();
        let report = run(&config, &ProgressReporter::new()).unwrap();

        assert_eq!(report.records.len(), 1);
        assert!(report.records[0].completed);
        let json_path = root.path().join("outputs/water/water.json");
        assert_eq!(report.records[0].path, json_path);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        let parsed = serde_json::to_value(QChemOutput::parse(SHORT_QOUT).unwrap()).unwrap();
        assert_eq!(written, parsed);
    }

    #[test]
    fn multi_job_mode_uses_supplied_names() {
        let root = tempdir().unwrap();
        project_with(root.path(), &[("water.xyz", WATER_XYZ)], "{}");
        with_output(root.path(), "water", &two_jobs());

        let config = CollectConfigBuilder::new()
            .layout(layout(root.path()))
            .multi_job(true)
            .job_names(vec!["geom".into(), "freq".into()])
            .build()
            .unwrap();
        let report = run(&config, &ProgressReporter::new()).unwrap();

        let names: Vec<_> = report.records.iter().map(|r| r.job_name.as_str()).collect();
        assert_eq!(names, vec!["geom", "freq"]);
        assert!(root.path().join("outputs/water/geom.json").is_file());
        assert!(root.path().join("outputs/water/freq.json").is_file());
        assert!(report.default_named.is_empty());
    }

    #[test]
    fn multi_job_mode_falls_back_per_file() {
        let root = tempdir().unwrap();
        project_with(
            root.path(),
            &[("a.xyz", WATER_XYZ), ("b.xyz", WATER_XYZ)],
            "{}",
        );
        with_output(root.path(), "a", &two_jobs());
        with_output(root.path(), "b", SHORT_QOUT);

        let config = CollectConfigBuilder::new()
            .layout(layout(root.path()))
            .multi_job(true)
            .job_names(vec!["geom".into(), "freq".into()])
            .build()
            .unwrap();
        let (reporter, events) = recording_reporter();
        let report = run(&config, &reporter).unwrap();

        assert!(root.path().join("outputs/a/geom.json").is_file());
        assert!(root.path().join("outputs/b/b_0.json").is_file());
        assert!(!root.path().join("outputs/b/geom.json").exists());
        assert_eq!(report.default_named, vec!["b".to_string()]);

        let messages: Vec<_> = events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Progress::Message(m) => Some(m.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            messages,
            vec!["(b) 2 job name(s) given for 1 job(s), using default names.".to_string()]
        );
    }

    #[test]
    fn multi_job_without_names_uses_indexed_defaults() {
        let root = tempdir().unwrap();
        project_with(root.path(), &[("water.xyz", WATER_XYZ)], "{}");
        with_output(root.path(), "water", &two_jobs());

        let config = CollectConfigBuilder::new()
            .layout(layout(root.path()))
            .multi_job(true)
            .build()
            .unwrap();
        run(&config, &ProgressReporter::new()).unwrap();

        assert!(root.path().join("outputs/water/water_0.json").is_file());
        assert!(root.path().join("outputs/water/water_1.json").is_file());
    }

    #[test]
    fn missing_output_file_is_an_error() {
        let root = tempdir().unwrap();
        project_with(root.path(), &[("water.xyz", WATER_XYZ)], "{}");

        let config = CollectConfigBuilder::new().layout(layout(root.path())).build().unwrap();
        let err = run(&config, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::Output { path, .. } if path.ends_with("water.qout")));
    }
}
