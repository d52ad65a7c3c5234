use crate::eri::TwoElectronIntegrals;
use crate::error::IntegralError;
use crate::loader::{read_geometry, read_one_electron, read_scalar, read_two_electron, IntegralSources};
use crate::molecule::Molecule;
use itertools::iproduct;
use nalgebra::DMatrix;

/// Everything an SCF run reads from disk: the molecule, the three
/// one-electron matrices, the packed two-electron integrals and the nuclear
/// repulsion energy. Immutable once built.
#[derive(Debug, Clone)]
pub struct IntegralStore {
    molecule: Molecule,
    overlap: DMatrix<f64>,
    kinetic: DMatrix<f64>,
    potential: DMatrix<f64>,
    eri: TwoElectronIntegrals,
    nuclear_repulsion: f64,
}

fn check_square(what: &str, m: &DMatrix<f64>, nao: usize) -> Result<(), IntegralError> {
    if m.nrows() != nao || m.ncols() != nao {
        return Err(IntegralError::shape(
            what,
            format!("{}x{}", nao, nao),
            format!("{}x{}", m.nrows(), m.ncols()),
        ));
    }
    Ok(())
}

fn asymmetry(m: &DMatrix<f64>) -> f64 {
    iproduct!(0..m.nrows(), 0..m.ncols())
        .map(|(i, j)| (m[(i, j)] - m[(j, i)]).abs())
        .fold(0.0, f64::max)
}

impl IntegralStore {
    /// Assemble a store from in-memory data, checking that every piece is
    /// expressed in the molecule's `nao` orbitals.
    pub fn new(
        molecule: Molecule,
        overlap: DMatrix<f64>,
        kinetic: DMatrix<f64>,
        potential: DMatrix<f64>,
        eri: TwoElectronIntegrals,
        nuclear_repulsion: f64,
    ) -> Result<Self, IntegralError> {
        let nao = molecule.nao;
        check_square("overlap matrix", &overlap, nao)?;
        check_square("kinetic energy matrix", &kinetic, nao)?;
        check_square("nuclear attraction matrix", &potential, nao)?;
        if eri.nao() != nao {
            return Err(IntegralError::shape(
                "two-electron integrals",
                format!("nao = {}", nao),
                format!("nao = {}", eri.nao()),
            ));
        }

        Ok(IntegralStore {
            molecule,
            overlap,
            kinetic,
            potential,
            eri,
            nuclear_repulsion,
        })
    }

    /// Read a data set from disk.
    ///
    /// The nuclear repulsion energy is taken from its own file when one is
    /// given, otherwise it is computed from the geometry. The geometry is
    /// validated either way.
    pub fn load(sources: &IntegralSources, nao: usize, charge: i32) -> Result<Self, IntegralError> {
        let atoms = read_geometry(&sources.geometry)?;
        let molecule = Molecule::new(atoms, charge, nao);
        let geometric = molecule.nuclear_repulsion()?;

        let nuclear_repulsion = match sources.nuclear_repulsion {
            Some(ref path) => read_scalar(path)?,
            None => geometric,
        };

        let overlap = read_one_electron(&sources.overlap, nao, sources.format)?;
        let kinetic = read_one_electron(&sources.kinetic, nao, sources.format)?;
        let potential = read_one_electron(&sources.potential, nao, sources.format)?;
        let eri = read_two_electron(&sources.two_electron, nao, sources.format)?;

        Self::new(molecule, overlap, kinetic, potential, eri, nuclear_repulsion)
    }

    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    pub fn nao(&self) -> usize {
        self.molecule.nao
    }

    pub fn overlap(&self) -> &DMatrix<f64> {
        &self.overlap
    }

    pub fn kinetic(&self) -> &DMatrix<f64> {
        &self.kinetic
    }

    pub fn potential(&self) -> &DMatrix<f64> {
        &self.potential
    }

    pub fn eri(&self) -> &TwoElectronIntegrals {
        &self.eri
    }

    pub fn nuclear_repulsion(&self) -> f64 {
        self.nuclear_repulsion
    }

    /// Largest |M_ij - M_ji| over S, T and V.
    pub fn max_asymmetry(&self) -> f64 {
        [&self.overlap, &self.kinetic, &self.potential]
            .into_iter()
            .map(asymmetry)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::IntegralFormat;
    use crate::molecule::Atom;
    use nalgebra::Vector3;
    use std::fs;
    use std::path::PathBuf;

    fn h2_molecule() -> Molecule {
        Molecule::new(
            vec![
                Atom::new(1.0, Vector3::zeros()),
                Atom::new(1.0, Vector3::new(0.0, 0.0, 1.4)),
            ],
            0,
            2,
        )
    }

    #[test]
    fn test_new_rejects_mismatched_matrices() {
        let err = IntegralStore::new(
            h2_molecule(),
            DMatrix::identity(2, 2),
            DMatrix::zeros(3, 3),
            DMatrix::zeros(2, 2),
            TwoElectronIntegrals::zeros(2),
            0.0,
        )
        .unwrap_err();
        assert!(matches!(err, IntegralError::Shape { .. }));

        let err = IntegralStore::new(
            h2_molecule(),
            DMatrix::identity(2, 2),
            DMatrix::zeros(2, 2),
            DMatrix::zeros(2, 2),
            TwoElectronIntegrals::zeros(3),
            0.0,
        )
        .unwrap_err();
        assert!(matches!(err, IntegralError::Shape { .. }));
    }

    #[test]
    fn test_max_asymmetry() {
        let mut s = DMatrix::identity(2, 2);
        s[(0, 1)] = 0.5;
        s[(1, 0)] = 0.25;
        let store = IntegralStore::new(
            h2_molecule(),
            s,
            DMatrix::zeros(2, 2),
            DMatrix::zeros(2, 2),
            TwoElectronIntegrals::zeros(2),
            0.0,
        )
        .unwrap();
        assert!((store.max_asymmetry() - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_load_from_files() {
        let dir = std::env::temp_dir().join(format!("integrals-store-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let write = |name: &str, text: &str| -> PathBuf {
            let path = dir.join(name);
            fs::write(&path, text).unwrap();
            path
        };

        let sources = IntegralSources {
            format: IntegralFormat::Flat,
            geometry: write("geom.dat", "2\n1.0 0.0 0.0 0.0\n1.0 0.0 0.0 1.4\n"),
            nuclear_repulsion: None,
            overlap: write("s.dat", "1.0 0.6593\n0.6593 1.0\n"),
            kinetic: write("t.dat", "0.7600 0.2365\n0.2365 0.7600\n"),
            potential: write("v.dat", "-1.8804 -1.1948\n-1.1948 -1.8804\n"),
            two_electron: write("eri.dat", "0.7746 0.4441 0.2970 0.5697 0.4441 0.7746\n"),
        };

        let store = IntegralStore::load(&sources, 2, 0).unwrap();
        assert_eq!(store.nao(), 2);
        assert_eq!(store.overlap()[(0, 1)], 0.6593);
        assert_eq!(store.eri().get(0, 0, 1, 1), 0.5697);
        assert!((store.nuclear_repulsion() - 1.0 / 1.4).abs() < 1e-12);
        assert_eq!(store.max_asymmetry(), 0.0);

        let with_enuc = IntegralSources {
            nuclear_repulsion: Some(write("enuc.dat", "0.7142857142857143\n")),
            ..sources
        };
        let store = IntegralStore::load(&with_enuc, 2, 0).unwrap();
        assert_eq!(store.nuclear_repulsion(), 0.7142857142857143);

        let coincident = IntegralSources {
            geometry: write("geom_coincident.dat", "2\n1.0 0.0 0.0 1.4\n1.0 0.0 0.0 1.4\n"),
            ..with_enuc
        };
        let err = IntegralStore::load(&coincident, 2, 0).unwrap_err();
        assert!(matches!(err, IntegralError::Geometry { .. }));

        fs::remove_dir_all(&dir).ok();
    }
}
