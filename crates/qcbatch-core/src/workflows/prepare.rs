use crate::core::io::charges::ChargeTable;
use crate::core::io::traits::GeometryFile;
use crate::core::io::xyz::XyzFile;
use crate::core::qchem::input::QChemInput;
use crate::engine::cluster::render_submit_script;
use crate::engine::config::PrepareConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::workflows::discover;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedJob {
    pub name: String,
    pub job_dir: PathBuf,
    pub input_path: PathBuf,
    pub script_path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct PrepareReport {
    pub jobs: Vec<PreparedJob>,
}

/// Writes one Q-Chem input and one submit script per geometry file.
///
/// Every geometry is read and checked against the charge table before any
/// job directory is created, so a bad geometry or a missing charge leaves the
/// output tree untouched. Job directories must not exist yet; the first one
/// that does aborts the run.
#[instrument(skip_all, name = "prepare_workflow", fields(cluster = %config.cluster))]
pub fn run(config: &PrepareConfig, reporter: &ProgressReporter) -> Result<PrepareReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Reading Geometries",
    });
    let inputs = build_inputs(config)?;
    reporter.report(Progress::PhaseFinish);

    if inputs.is_empty() {
        warn!(
            "No .{} files found in '{}'.",
            config.layout.geometry_extension,
            config.layout.input_root().display()
        );
        return Ok(PrepareReport::default());
    }

    reporter.report(Progress::PhaseStart {
        name: "Writing Job Files",
    });
    reporter.report(Progress::BatchStart {
        total: inputs.len() as u64,
    });

    let output_root = config.layout.output_root();
    fs::create_dir_all(&output_root).map_err(|e| EngineError::io(&output_root, e))?;

    let mut report = PrepareReport::default();
    for input in inputs {
        let job = write_job(config, &input)?;
        info!(name = %job.name, dir = %job.job_dir.display(), "Prepared job.");
        reporter.report(Progress::ItemDone {
            name: job.name.clone(),
        });
        report.jobs.push(job);
    }

    reporter.report(Progress::BatchFinish);
    reporter.report(Progress::PhaseFinish);
    Ok(report)
}

fn build_inputs(config: &PrepareConfig) -> Result<Vec<QChemInput>, EngineError> {
    let layout = &config.layout;
    let entries = discover::geometry_entries(layout)?;
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let charges = ChargeTable::load(&layout.charge_table_path())?;
    debug!(entries = charges.len(), "Loaded charge table.");

    let mut inputs = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut molecule =
            XyzFile::read_from_path(&entry.path).map_err(|e| EngineError::Geometry {
                path: entry.path.to_string_lossy().to_string(),
                source: e,
            })?;
        let charge = charges.lookup(&entry.file_name)?;
        molecule
            .set_charge_and_spin(charge.charge, charge.multiplicity)
            .map_err(|e| EngineError::ChargeState {
                file: entry.file_name.clone(),
                source: e,
            })?;
        debug!(
            name = %entry.name,
            atoms = molecule.atoms().len(),
            charge = molecule.charge(),
            multiplicity = molecule.spin_multiplicity(),
            "Read molecule."
        );

        let input = QChemInput::new(molecule, config.parameters.rem.clone())
            .map_err(|e| EngineError::Input {
                name: entry.name.clone(),
                source: e,
            })?
            .with_smx(config.parameters.smx.clone())
            .with_geom_opt(config.parameters.geom_opt.clone());
        inputs.push(input);
    }
    Ok(inputs)
}

fn write_job(config: &PrepareConfig, input: &QChemInput) -> Result<PreparedJob, EngineError> {
    let layout = &config.layout;
    let name = input.molecule().name();
    let job_dir = layout.job_dir(name);

    fs::create_dir(&job_dir).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => EngineError::JobDirectoryExists {
            path: job_dir.to_string_lossy().to_string(),
        },
        _ => EngineError::io(&job_dir, e),
    })?;

    let input_path = layout.input_path(name);
    input
        .write_to_path(&input_path)
        .map_err(|e| EngineError::Input {
            name: name.to_string(),
            source: e,
        })?;

    let script_path = layout.script_path(name);
    let script = render_submit_script(
        &config.profile,
        &layout.input_file_name(name),
        &layout.output_file_name(name),
    );
    fs::write(&script_path, script).map_err(|e| EngineError::io(&script_path, e))?;

    Ok(PreparedJob {
        name: name.to_string(),
        job_dir,
        input_path,
        script_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{Cluster, PrepareConfigBuilder};
    use crate::engine::layout::ProjectLayout;
    use crate::engine::progress::testing::recording_reporter;
    use crate::workflows::test_support::{WATER_XYZ, project_with};
    use tempfile::tempdir;
    use std::collections::BTreeSet;

    fn config(root: &std::path::Path, cluster: Cluster) -> PrepareConfig {
        PrepareConfigBuilder::new()
            .layout(ProjectLayout::new(root.to_path_buf()))
            .cluster(cluster)
            .build()
            .unwrap()
    }

    #[test]
    fn writes_input_and_script_for_every_molecule() {
        let root = tempdir().unwrap();
        project_with(
            root.path(),
            &[("water.xyz", WATER_XYZ), ("hydroxide.xyz", "2\n\nO 0 0 0\nH 0 0 0.97\n")],
            r#"{"water.xyz": 0, "hydroxide.xyz": -1}"#,
        );

        let (reporter, events) = recording_reporter();
        let report = run(&config(root.path(), Cluster::Swift), &reporter).unwrap();

        let names: Vec<_> = report.jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["hydroxide", "water"]);

        for job in &report.jobs {
            let files: BTreeSet<_> = fs::read_dir(&job.job_dir)
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            let expected = BTreeSet::from([format!("{}.qin", job.name), "submit.script".to_string()]);
            assert_eq!(files, expected);
        }

        let qin = fs::read_to_string(root.path().join("outputs/hydroxide/hydroxide.qin")).unwrap();
        assert!(qin.starts_with("$molecule\n -1 1\n"));
        assert!(qin.contains("   method = wb97x-v\n"));
        assert!(qin.contains("$smx\n   solvent = other\n"));
        assert!(qin.contains("$geom_opt\n   maxiter = 200\n"));

        let script = fs::read_to_string(root.path().join("outputs/water/submit.script")).unwrap();
        assert!(script.contains("#SBATCH --account=silimorphous\n"));
        assert!(script.ends_with("qchem water.qin water.qout\n"));

        let done = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, Progress::ItemDone { .. }))
            .count();
        assert_eq!(done, 2);
    }

    #[test]
    fn odd_electron_count_gets_doublet() {
        let root = tempdir().unwrap();
        project_with(root.path(), &[("water.xyz", WATER_XYZ)], r#"{"water.xyz": 1}"#);

        run(&config(root.path(), Cluster::Lrc), &ProgressReporter::new()).unwrap();
        let qin = fs::read_to_string(root.path().join("outputs/water/water.qin")).unwrap();
        assert!(qin.starts_with("$molecule\n 1 2\n"));
        let script = fs::read_to_string(root.path().join("outputs/water/submit.script")).unwrap();
        assert!(script.contains("#SBATCH --partition=lr6\n"));
    }

    #[test]
    fn missing_charge_aborts_before_any_directory_is_created() {
        let root = tempdir().unwrap();
        project_with(
            root.path(),
            &[("a.xyz", WATER_XYZ), ("b.xyz", WATER_XYZ)],
            r#"{"a.xyz": 0}"#,
        );

        let err = run(&config(root.path(), Cluster::Swift), &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::ChargeTable(_)));
        assert!(!root.path().join("outputs").exists());
    }

    #[test]
    fn impossible_multiplicity_is_rejected() {
        let root = tempdir().unwrap();
        project_with(
            root.path(),
            &[("water.xyz", WATER_XYZ)],
            r#"{"water.xyz": {"charge": 0, "multiplicity": 2}}"#,
        );

        let err = run(&config(root.path(), Cluster::Swift), &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::ChargeState { file, .. } if file == "water.xyz"));
    }

    #[test]
    fn rerun_refuses_to_overwrite_existing_job() {
        let root = tempdir().unwrap();
        project_with(root.path(), &[("water.xyz", WATER_XYZ)], r#"{"water.xyz": 0}"#);
        let config = config(root.path(), Cluster::Swift);

        run(&config, &ProgressReporter::new()).unwrap();
        let before = fs::read_to_string(root.path().join("outputs/water/water.qin")).unwrap();

        let err = run(&config, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::JobDirectoryExists { .. }));
        let after = fs::read_to_string(root.path().join("outputs/water/water.qin")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn empty_input_directory_is_a_no_op() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("init_mols")).unwrap();

        let report = run(&config(root.path(), Cluster::Swift), &ProgressReporter::new()).unwrap();
        assert!(report.jobs.is_empty());
        assert!(!root.path().join("outputs").exists());
    }
}
