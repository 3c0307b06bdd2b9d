//! # Core Models Module
//!
//! Data structures describing the molecules that flow through the job pipeline.
//!
//! - [`atom`] - Elements and atoms with Cartesian positions
//! - [`molecule`] - A named molecule with its total charge and spin multiplicity
//!
//! ```ignore
//! use qcbatch::core::models::{atom::{Atom, Element}, molecule::Molecule};
//!
//! let oxygen: Element = "O".parse().unwrap();
//! let mut mol = Molecule::new("oxide", vec![Atom::new(oxygen, Point3::origin())])?;
//! mol.set_charge_and_spin(-2, None)?;
//! ```

pub mod atom;
pub mod molecule;
