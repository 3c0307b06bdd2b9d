use super::atom::Atom;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Molecule '{name}' has no atoms")]
    Empty { name: String },

    #[error(
        "Charge {charge} leaves molecule '{name}' with a negative electron count ({electrons})"
    )]
    NegativeElectronCount {
        name: String,
        charge: i32,
        electrons: i64,
    },

    #[error(
        "Charge {charge} and spin multiplicity {multiplicity} are not possible for molecule '{name}' with {electrons} electrons"
    )]
    IncompatibleSpin {
        name: String,
        charge: i32,
        multiplicity: u32,
        electrons: i64,
    },
}

/// A molecule ready to be written into a Q-Chem `$molecule` section.
///
/// Molecules start neutral with the lowest spin multiplicity allowed by the
/// electron count. [`Molecule::set_charge_and_spin`] changes both together so
/// the pair always stays physically consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    name: String,
    atoms: Vec<Atom>,
    charge: i32,
    spin_multiplicity: u32,
}

impl Molecule {
    pub fn new(name: impl Into<String>, atoms: Vec<Atom>) -> Result<Self, MoleculeError> {
        let name = name.into();
        if atoms.is_empty() {
            return Err(MoleculeError::Empty { name });
        }
        let mut molecule = Self {
            name,
            atoms,
            charge: 0,
            spin_multiplicity: 1,
        };
        molecule.set_charge_and_spin(0, None)?;
        Ok(molecule)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn spin_multiplicity(&self) -> u32 {
        self.spin_multiplicity
    }

    pub fn nuclear_charge(&self) -> i64 {
        self.atoms
            .iter()
            .map(|a| i64::from(a.element.atomic_number()))
            .sum()
    }

    pub fn electron_count(&self) -> i64 {
        self.nuclear_charge() - i64::from(self.charge)
    }

    /// Sets the total charge and spin multiplicity.
    ///
    /// When `multiplicity` is `None` the lowest multiplicity consistent with
    /// the resulting electron count is chosen: singlet for an even count,
    /// doublet for an odd one.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::NegativeElectronCount`] if the charge removes
    /// more electrons than the nuclei provide, and
    /// [`MoleculeError::IncompatibleSpin`] if an explicit multiplicity has the
    /// wrong parity for the electron count (or is zero). The molecule is left
    /// unchanged on error.
    pub fn set_charge_and_spin(
        &mut self,
        charge: i32,
        multiplicity: Option<u32>,
    ) -> Result<(), MoleculeError> {
        let electrons = self.nuclear_charge() - i64::from(charge);
        if electrons < 0 {
            return Err(MoleculeError::NegativeElectronCount {
                name: self.name.clone(),
                charge,
                electrons,
            });
        }

        let spin_multiplicity = match multiplicity {
            None => {
                if electrons % 2 == 0 {
                    1
                } else {
                    2
                }
            }
            Some(m) => {
                // Unpaired electrons = m - 1, which must share parity with the total.
                if m == 0 || (electrons + i64::from(m)) % 2 != 1 || i64::from(m) - 1 > electrons {
                    return Err(MoleculeError::IncompatibleSpin {
                        name: self.name.clone(),
                        charge,
                        multiplicity: m,
                        electrons,
                    });
                }
                m
            }
        };

        self.charge = charge;
        self.spin_multiplicity = spin_multiplicity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Element;
    use nalgebra::Point3;

    fn atom(z: u8, x: f64) -> Atom {
        Atom::new(
            Element::from_atomic_number(z).unwrap(),
            Point3::new(x, 0.0, 0.0),
        )
    }

    fn water() -> Molecule {
        Molecule::new("water", vec![atom(8, 0.0), atom(1, 0.96), atom(1, -0.96)]).unwrap()
    }

    #[test]
    fn new_molecule_is_neutral_singlet_for_even_electrons() {
        let mol = water();
        assert_eq!(mol.charge(), 0);
        assert_eq!(mol.spin_multiplicity(), 1);
        assert_eq!(mol.electron_count(), 10);
    }

    #[test]
    fn new_molecule_is_doublet_for_odd_electrons() {
        let hydroxyl = Molecule::new("oh", vec![atom(8, 0.0), atom(1, 0.97)]).unwrap();
        assert_eq!(hydroxyl.spin_multiplicity(), 2);
    }

    #[test]
    fn new_rejects_empty_atom_list() {
        let err = Molecule::new("empty", vec![]).unwrap_err();
        assert_eq!(
            err,
            MoleculeError::Empty {
                name: "empty".to_string()
            }
        );
    }

    #[test]
    fn charge_changes_default_multiplicity() {
        let mut mol = water();
        mol.set_charge_and_spin(1, None).unwrap();
        assert_eq!(mol.charge(), 1);
        assert_eq!(mol.spin_multiplicity(), 2);

        mol.set_charge_and_spin(-2, None).unwrap();
        assert_eq!(mol.spin_multiplicity(), 1);
    }

    #[test]
    fn explicit_multiplicity_with_matching_parity_is_accepted() {
        let mut mol = water();
        mol.set_charge_and_spin(0, Some(3)).unwrap();
        assert_eq!(mol.spin_multiplicity(), 3);
    }

    #[test]
    fn explicit_multiplicity_with_wrong_parity_is_rejected_and_state_kept() {
        let mut mol = water();
        let err = mol.set_charge_and_spin(0, Some(2)).unwrap_err();
        assert!(matches!(err, MoleculeError::IncompatibleSpin { .. }));
        assert_eq!(mol.charge(), 0);
        assert_eq!(mol.spin_multiplicity(), 1);
    }

    #[test]
    fn multiplicity_zero_is_rejected() {
        let mut mol = water();
        assert!(mol.set_charge_and_spin(1, Some(0)).is_err());
    }

    #[test]
    fn charge_removing_all_electrons_and_more_is_rejected() {
        let mut h = Molecule::new("h", vec![atom(1, 0.0)]).unwrap();
        h.set_charge_and_spin(1, None).unwrap();
        assert_eq!(h.electron_count(), 0);
        assert_eq!(h.spin_multiplicity(), 1);

        let err = h.set_charge_and_spin(2, None).unwrap_err();
        assert!(matches!(
            err,
            MoleculeError::NegativeElectronCount { electrons: -1, .. }
        ));
    }
}
