//! # Core Module
//!
//! Stateless building blocks for Q-Chem job preparation and collection.
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms and charged molecules
//! - **File I/O** ([`io`]) - XYZ geometry files, the charge table and molecule discovery
//! - **Q-Chem Formats** ([`qchem`]) - Input file rendering and output file parsing
//! - **Utilities** ([`utils`]) - Periodic-table lookups

pub mod io;
pub mod models;
pub mod qchem;
pub mod utils;
