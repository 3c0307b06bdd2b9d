use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChargeTableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parsing error for '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("No charge entry for '{file}' in the charge table")]
    MissingEntry { file: String },
}

/// Charge and optional spin multiplicity for one geometry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeEntry {
    pub charge: i32,
    pub multiplicity: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawChargeEntry {
    Charge(i32),
    Detailed {
        charge: i32,
        #[serde(default)]
        multiplicity: Option<u32>,
    },
}

impl From<RawChargeEntry> for ChargeEntry {
    fn from(raw: RawChargeEntry) -> Self {
        match raw {
            RawChargeEntry::Charge(charge) => Self {
                charge,
                multiplicity: None,
            },
            RawChargeEntry::Detailed {
                charge,
                multiplicity,
            } => Self {
                charge,
                multiplicity,
            },
        }
    }
}

/// The `charge.json` sidecar: geometry filename (extension included) to charge.
///
/// Entries are either a bare integer (`"mol.xyz": -1`) or an object carrying
/// an explicit multiplicity (`"mol.xyz": {"charge": 0, "multiplicity": 3}`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeTable {
    entries: HashMap<String, ChargeEntry>,
}

impl ChargeTable {
    pub fn load(path: &Path) -> Result<Self, ChargeTableError> {
        let content = std::fs::read_to_string(path).map_err(|e| ChargeTableError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_json(&content).map_err(|e| ChargeTableError::Json {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, RawChargeEntry> = serde_json::from_str(content)?;
        Ok(Self {
            entries: raw.into_iter().map(|(k, v)| (k, v.into())).collect(),
        })
    }

    /// Looks up the entry for `file`, which must match the key exactly.
    pub fn lookup(&self, file: &str) -> Result<ChargeEntry, ChargeTableError> {
        self.entries
            .get(file)
            .copied()
            .ok_or_else(|| ChargeTableError::MissingEntry {
                file: file.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_bare_and_detailed_entries() {
        let table = ChargeTable::from_json(
            r#"{"a.xyz": -1, "b.xyz": {"charge": 0, "multiplicity": 3}, "c.xyz": {"charge": 2}}"#,
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.lookup("a.xyz").unwrap(),
            ChargeEntry {
                charge: -1,
                multiplicity: None
            }
        );
        assert_eq!(
            table.lookup("b.xyz").unwrap(),
            ChargeEntry {
                charge: 0,
                multiplicity: Some(3)
            }
        );
        assert_eq!(table.lookup("c.xyz").unwrap().multiplicity, None);
    }

    #[test]
    fn lookup_requires_exact_filename() {
        let table = ChargeTable::from_json(r#"{"a.xyz": 1}"#).unwrap();
        assert!(matches!(
            table.lookup("a"),
            Err(ChargeTableError::MissingEntry { file }) if file == "a"
        ));
        assert!(table.lookup("A.xyz").is_err());
    }

    #[test]
    fn non_integer_charge_is_rejected() {
        assert!(ChargeTable::from_json(r#"{"a.xyz": "one"}"#).is_err());
        assert!(ChargeTable::from_json(r#"{"a.xyz": 0.5}"#).is_err());
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("charge.json");
        match ChargeTable::load(&missing) {
            Err(ChargeTableError::Io { path, .. }) => assert!(path.ends_with("charge.json")),
            other => panic!("expected Io error, got {other:?}"),
        }

        std::fs::write(&missing, "{not json").unwrap();
        assert!(matches!(
            ChargeTable::load(&missing),
            Err(ChargeTableError::Json { .. })
        ));
    }
}
