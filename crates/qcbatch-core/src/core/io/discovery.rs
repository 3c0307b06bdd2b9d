use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A geometry file found in the input directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GeometryEntry {
    /// Molecule identifier: the filename with its extension stripped.
    pub name: String,
    /// The filename as it appears on disk, used as the charge-table key.
    pub file_name: String,
    pub path: PathBuf,
}

/// Lists files in `dir` whose extension is exactly `extension`, sorted by name.
///
/// Subdirectories are ignored even if their name carries the extension.
pub fn find_geometry_files(dir: &Path, extension: &str) -> io::Result<Vec<GeometryEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let file_name = entry.file_name().to_string_lossy().into_owned();
        entries.push(GeometryEntry {
            name: name.to_string(),
            file_name,
            path,
        });
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names(dir: &Path) -> io::Result<Vec<String>> {
        Ok(find_geometry_files(dir, "xyz")?.into_iter().map(|e| e.name).collect())
    }

    #[test]
    fn lists_only_matching_files_sorted() {
        let dir = tempdir().unwrap();
        for name in ["b.xyz", "a.xyz", "charge.json", "notes.txt", "c.XYZ"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("folder.xyz")).unwrap();

        let names = names(dir.path()).unwrap();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn entries_keep_full_file_name_for_charge_lookup() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ethanol.xyz"), "").unwrap();

        let entries = find_geometry_files(dir.path(), "xyz").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ethanol");
        assert_eq!(entries[0].file_name, "ethanol.xyz");
        assert_eq!(entries[0].path, dir.path().join("ethanol.xyz"));
    }

    #[test]
    fn names_with_inner_dots_keep_everything_before_the_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("li.pf6.xyz"), "").unwrap();
        assert_eq!(names(dir.path()).unwrap(), vec!["li.pf6"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let err = names(&dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
