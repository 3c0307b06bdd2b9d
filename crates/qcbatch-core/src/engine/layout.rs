use std::path::PathBuf;

/// Where a project keeps its geometries, charge table and per-molecule job
/// directories, relative to `root`.
///
/// ```text
/// <root>/init_mols/*.xyz
/// <root>/init_mols/charge.json
/// <root>/outputs/<name>/<name>.qin
/// <root>/outputs/<name>/submit.script
/// <root>/outputs/<name>/<name>.qout
/// <root>/outputs/<name>/<name>.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub input_dir: String,
    pub charge_file: String,
    pub output_dir: String,
    pub geometry_extension: String,
    pub input_extension: String,
    pub output_extension: String,
    pub record_extension: String,
    pub script_name: String,
}

impl ProjectLayout {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            input_dir: "init_mols".into(),
            charge_file: "charge.json".into(),
            output_dir: "outputs".into(),
            geometry_extension: "xyz".into(),
            input_extension: "qin".into(),
            output_extension: "qout".into(),
            record_extension: "json".into(),
            script_name: "submit.script".into(),
        }
    }

    pub fn input_root(&self) -> PathBuf {
        self.root.join(&self.input_dir)
    }

    pub fn charge_table_path(&self) -> PathBuf {
        self.input_root().join(&self.charge_file)
    }

    pub fn output_root(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    pub fn job_dir(&self, name: &str) -> PathBuf {
        self.output_root().join(name)
    }

    pub fn input_path(&self, name: &str) -> PathBuf {
        self.job_dir(name).join(self.input_file_name(name))
    }

    pub fn input_file_name(&self, name: &str) -> String {
        format!("{name}.{}", self.input_extension)
    }

    pub fn output_file_name(&self, name: &str) -> String {
        format!("{name}.{}", self.output_extension)
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.job_dir(name).join(self.output_file_name(name))
    }

    pub fn script_path(&self, name: &str) -> PathBuf {
        self.job_dir(name).join(&self.script_name)
    }

    /// JSON record for `job_name`, stored in the directory of molecule `name`.
    pub fn record_path(&self, name: &str, job_name: &str) -> PathBuf {
        self.job_dir(name)
            .join(format!("{job_name}.{}", self.record_extension))
    }
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_project_convention() {
        let layout = ProjectLayout::new(PathBuf::from("/work"));
        assert_eq!(layout.input_root(), PathBuf::from("/work/init_mols"));
        assert_eq!(
            layout.charge_table_path(),
            PathBuf::from("/work/init_mols/charge.json")
        );
        assert_eq!(
            layout.input_path("water"),
            PathBuf::from("/work/outputs/water/water.qin")
        );
        assert_eq!(
            layout.output_path("water"),
            PathBuf::from("/work/outputs/water/water.qout")
        );
        assert_eq!(
            layout.script_path("water"),
            PathBuf::from("/work/outputs/water/submit.script")
        );
        assert_eq!(
            layout.record_path("water", "freq"),
            PathBuf::from("/work/outputs/water/freq.json")
        );
    }

    #[test]
    fn renamed_directories_are_respected() {
        let mut layout = ProjectLayout::default();
        layout.output_dir = "runs".into();
        layout.input_extension = "in".into();
        assert_eq!(layout.input_path("a"), PathBuf::from("./runs/a/a.in"));
        assert_eq!(layout.input_file_name("a"), "a.in");
    }
}
