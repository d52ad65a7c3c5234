use crate::error::IntegralError;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Smallest internuclear distance, in bohr, accepted by `nuclear_repulsion`.
pub const MIN_SEPARATION: f64 = 1e-10;

/// A nucleus: charge Z and position in bohr.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub charge: f64,
    pub position: Vector3<f64>,
}

impl Atom {
    pub fn new(charge: f64, position: Vector3<f64>) -> Self {
        Atom { charge, position }
    }
}

/// Molecule descriptor shared by the integral files of one data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    /// Net molecular charge
    pub charge: i32,
    /// Number of atomic orbitals the integrals are expressed in
    pub nao: usize,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>, charge: i32, nao: usize) -> Self {
        Molecule { atoms, charge, nao }
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Point-charge repulsion of the nuclei, sum over A < B of Z_A Z_B / R_AB.
    ///
    /// Two nuclei closer than `MIN_SEPARATION` bohr make the sum undefined
    /// and are reported as a geometry error.
    pub fn nuclear_repulsion(&self) -> Result<f64, IntegralError> {
        let mut energy = 0.0;
        for (a, atom_a) in self.atoms.iter().enumerate() {
            for (b, atom_b) in self.atoms.iter().enumerate().skip(a + 1) {
                let r = (atom_a.position - atom_b.position).norm();
                if r < MIN_SEPARATION {
                    return Err(IntegralError::Geometry {
                        message: format!("atoms {} and {} are {:.3e} bohr apart", a + 1, b + 1, r),
                    });
                }
                energy += atom_a.charge * atom_b.charge / r;
            }
        }
        Ok(energy)
    }

    /// Electron count, sum of nuclear charges minus the molecular charge.
    pub fn n_electrons(&self) -> Result<usize, IntegralError> {
        let nuclear: f64 = self.atoms.iter().map(|a| a.charge).sum();
        let electrons = nuclear - self.charge as f64;
        if electrons < 0.0 || (electrons - electrons.round()).abs() > 1e-6 {
            return Err(IntegralError::Occupation {
                message: format!(
                    "nuclear charge {} with molecular charge {} does not give a whole electron count",
                    nuclear, self.charge
                ),
            });
        }
        Ok(electrons.round() as usize)
    }

    /// Doubly occupied orbitals of the closed-shell ground state.
    pub fn n_occupied(&self) -> Result<usize, IntegralError> {
        let electrons = self.n_electrons()?;
        if electrons % 2 != 0 {
            return Err(IntegralError::Occupation {
                message: format!("{} electrons cannot be paired in a restricted determinant", electrons),
            });
        }
        let n_occ = electrons / 2;
        if n_occ > self.nao {
            return Err(IntegralError::Occupation {
                message: format!("{} occupied orbitals exceed the {} atomic orbitals", n_occ, self.nao),
            });
        }
        Ok(n_occ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h2() -> Molecule {
        Molecule::new(
            vec![
                Atom::new(1.0, Vector3::new(0.0, 0.0, 0.0)),
                Atom::new(1.0, Vector3::new(0.0, 0.0, 1.4)),
            ],
            0,
            2,
        )
    }

    #[test]
    fn test_nuclear_repulsion_h2() {
        let mol = h2();
        assert!((mol.nuclear_repulsion().unwrap() - 1.0 / 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_nuclear_repulsion_sums_all_pairs() {
        let mol = Molecule::new(
            vec![
                Atom::new(8.0, Vector3::new(0.0, 0.0, 0.0)),
                Atom::new(1.0, Vector3::new(2.0, 0.0, 0.0)),
                Atom::new(1.0, Vector3::new(0.0, 2.0, 0.0)),
            ],
            0,
            7,
        );
        let expected = 8.0 / 2.0 + 8.0 / 2.0 + 1.0 / 8.0_f64.sqrt();
        assert!((mol.nuclear_repulsion().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_nuclei_are_rejected() {
        let mol = Molecule::new(
            vec![
                Atom::new(1.0, Vector3::new(0.0, 0.0, 0.7)),
                Atom::new(2.0, Vector3::zeros()),
                Atom::new(1.0, Vector3::new(0.0, 0.0, 0.7)),
            ],
            0,
            3,
        );
        match mol.nuclear_repulsion() {
            Err(IntegralError::Geometry { message }) => assert!(message.contains("atoms 1 and 3")),
            other => panic!("expected a geometry error, got {:?}", other),
        }
    }

    #[test]
    fn test_occupation_counts_charge() {
        assert_eq!(h2().n_electrons().unwrap(), 2);
        assert_eq!(h2().n_occupied().unwrap(), 1);

        let heh = Molecule::new(
            vec![
                Atom::new(2.0, Vector3::zeros()),
                Atom::new(1.0, Vector3::new(0.0, 0.0, 1.4632)),
            ],
            1,
            2,
        );
        assert_eq!(heh.n_occupied().unwrap(), 1);
    }

    #[test]
    fn test_open_shell_is_rejected() {
        let mut mol = h2();
        mol.charge = 1;
        assert!(matches!(mol.n_occupied(), Err(IntegralError::Occupation { .. })));
    }

    #[test]
    fn test_too_many_electrons_for_basis() {
        let mut mol = h2();
        mol.nao = 1;
        mol.charge = -2;
        assert!(mol.n_occupied().is_err());
    }
}
