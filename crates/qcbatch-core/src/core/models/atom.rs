use crate::core::utils::elements;
use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

/// A chemical element identified by its atomic number.
///
/// The atomic number is validated on construction, so every `Element` has a
/// symbol and contributes a known number of electrons to a molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    /// Creates an element from its atomic number.
    ///
    /// # Return
    ///
    /// Returns `None` if `atomic_number` is outside `1..=118`.
    pub fn from_atomic_number(atomic_number: u8) -> Option<Self> {
        elements::symbol_for(atomic_number).map(|_| Self(atomic_number))
    }

    pub fn atomic_number(&self) -> u8 {
        self.0
    }

    pub fn symbol(&self) -> &'static str {
        // The constructor guarantees the number is in the table.
        elements::symbol_for(self.0).unwrap_or("X")
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ();

    /// Parses a species label such as `C`, `cl`, `H3` or `8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        elements::parse_species(s).map(Self).ok_or(())
    }
}

/// A single atom of a molecule: its element and Cartesian position in Angstroms.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(element: Element, position: Point3<f64>) -> Self {
        Self { element, position }
    }
}
