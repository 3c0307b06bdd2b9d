use crate::core::io::traits::GeometryFile;
use crate::core::models::atom::{Atom, Element};
use crate::core::models::molecule::{Molecule, MoleculeError};
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("No atom records found")]
    NoFrames,
    #[error(transparent)]
    Molecule(#[from] MoleculeError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{value}'")]
    InvalidAtomCount { value: String },
    #[error("Expected an element and three coordinates, found {found} field(s)")]
    TooFewFields { found: usize },
    #[error("Unknown element '{value}'")]
    UnknownElement { value: String },
    #[error("Invalid coordinate '{value}'")]
    InvalidFloat { value: String },
    #[error("Frame declares {expected} atom(s) but the file ends after {found}")]
    TruncatedFrame { expected: usize, found: usize },
}

/// Plain XYZ coordinates in Angstroms.
///
/// Files with several concatenated frames are accepted; the last frame wins,
/// which is what a trajectory dump from a previous optimization expects.
pub struct XyzFile;

fn parse_coordinate(value: &str, line: usize) -> Result<f64, XyzError> {
    // Fortran-style exponents (1.0D-03) show up in files written by older codes.
    value
        .replace(['D', 'd'], "e")
        .parse()
        .map_err(|_| XyzError::Parse {
            line,
            kind: XyzParseErrorKind::InvalidFloat {
                value: value.to_string(),
            },
        })
}

fn parse_atom_line(line: &str, line_num: usize) -> Result<Atom, XyzError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::TooFewFields {
                found: fields.len(),
            },
        });
    }
    let element: Element = fields[0].parse().map_err(|_| XyzError::Parse {
        line: line_num,
        kind: XyzParseErrorKind::UnknownElement {
            value: fields[0].to_string(),
        },
    })?;
    let x = parse_coordinate(fields[1], line_num)?;
    let y = parse_coordinate(fields[2], line_num)?;
    let z = parse_coordinate(fields[3], line_num)?;
    Ok(Atom::new(element, Point3::new(x, y, z)))
}

impl GeometryFile for XyzFile {
    const EXTENSION: &'static str = "xyz";
    type Error = XyzError;

    fn read_from(name: &str, reader: &mut impl BufRead) -> Result<Molecule, Self::Error> {
        let mut lines = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            lines.push((i + 1, line?));
        }

        let mut frames: Vec<Vec<Atom>> = Vec::new();
        let mut cursor = 0;
        while cursor < lines.len() {
            let (count_line, count_str) = &lines[cursor];
            let count_str = count_str.trim();
            if count_str.is_empty() {
                cursor += 1;
                continue;
            }
            let expected: usize = count_str.parse().map_err(|_| XyzError::Parse {
                line: *count_line,
                kind: XyzParseErrorKind::InvalidAtomCount {
                    value: count_str.to_string(),
                },
            })?;

            // Skip the count line and the free-form comment line.
            let first_atom = cursor + 2;
            let available = lines.len().saturating_sub(first_atom);
            if available < expected {
                return Err(XyzError::Parse {
                    line: lines.last().map_or(*count_line, |(n, _)| *n),
                    kind: XyzParseErrorKind::TruncatedFrame {
                        expected,
                        found: available,
                    },
                });
            }

            let mut atoms = Vec::with_capacity(expected);
            for (line_num, content) in &lines[first_atom..first_atom + expected] {
                atoms.push(parse_atom_line(content, *line_num)?);
            }
            frames.push(atoms);
            cursor = first_atom + expected;
        }

        let atoms = frames.pop().ok_or(XyzError::NoFrames)?;
        Ok(Molecule::new(name, atoms)?)
    }
}
