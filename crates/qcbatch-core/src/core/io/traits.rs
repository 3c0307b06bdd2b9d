use crate::core::models::molecule::{Molecule, MoleculeError};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading molecular geometry formats.
///
/// Implementors parse atoms and coordinates only. Charge and multiplicity are
/// not part of a geometry file; a freshly read molecule is neutral and is
/// expected to be updated from the charge table afterwards.
pub trait GeometryFile {
    /// The file extension, without the leading dot, that identifies this format.
    const EXTENSION: &'static str;

    /// The error type for I/O and parsing failures.
    type Error: Error + From<io::Error> + From<MoleculeError>;

    /// Reads a molecule named `name` from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader reports an I/O error.
    fn read_from(name: &str, reader: &mut impl BufRead) -> Result<Molecule, Self::Error>;

    /// Reads a molecule from a file path, naming it after the file stem.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Molecule, Self::Error> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&name, &mut reader)
    }
}
