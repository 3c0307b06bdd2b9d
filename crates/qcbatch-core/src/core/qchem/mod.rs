//! Q-Chem file formats: input rendering and output parsing.

pub mod input;
pub mod output;
