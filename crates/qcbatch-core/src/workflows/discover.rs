use crate::core::io::discovery::{GeometryEntry, find_geometry_files};
use crate::engine::error::EngineError;
use crate::engine::layout::ProjectLayout;

/// Geometry files in the project's input directory, sorted by name.
pub fn geometry_entries(layout: &ProjectLayout) -> Result<Vec<GeometryEntry>, EngineError> {
    let dir = layout.input_root();
    find_geometry_files(&dir, &layout.geometry_extension).map_err(|e| EngineError::Discovery {
        path: dir.to_string_lossy().to_string(),
        source: e,
    })
}

/// Molecule identifiers known to the project. Submission and collection
/// iterate over exactly this list.
pub fn run(layout: &ProjectLayout) -> Result<Vec<String>, EngineError> {
    Ok(geometry_entries(layout)?
        .into_iter()
        .map(|entry| entry.name)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_names_from_input_directory() {
        let root = tempdir().unwrap();
        let input = root.path().join("init_mols");
        fs::create_dir(&input).unwrap();
        for file in ["water.xyz", "ammonia.xyz", "charge.json"] {
            fs::write(input.join(file), "").unwrap();
        }

        let layout = ProjectLayout::new(root.path().to_path_buf());
        assert_eq!(run(&layout).unwrap(), vec!["ammonia", "water"]);
    }

    #[test]
    fn missing_input_directory_names_the_path() {
        let root = tempdir().unwrap();
        let layout = ProjectLayout::new(root.path().to_path_buf());
        match run(&layout) {
            Err(EngineError::Discovery { path, .. }) => assert!(path.ends_with("init_mols")),
            other => panic!("expected discovery error, got {other:?}"),
        }
    }
}
