//! Provides input/output functionality for the files a job directory tree holds.
//!
//! Geometry formats implement the [`traits::GeometryFile`] trait; the charge
//! table and directory discovery are plain functions over the input folder.

pub mod charges;
pub mod discovery;
pub mod traits;
pub mod xyz;
