//! Closed-shell Fock matrix, density matrix and electronic energy

use crate::error::{Result, ScfError};
use integrals::TwoElectronIntegrals;
use nalgebra::DMatrix;
use rayon::prelude::*;

fn check_square(what: &str, m: &DMatrix<f64>, n: usize) -> Result<()> {
    if m.shape() != (n, n) {
        return Err(ScfError::shape(what, (n, n), m.shape()));
    }
    Ok(())
}

/// H_core = T + V
pub fn core_hamiltonian(kinetic: &DMatrix<f64>, potential: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n = kinetic.nrows();
    check_square("kinetic energy matrix", kinetic, n)?;
    check_square("nuclear attraction matrix", potential, n)?;
    Ok(kinetic + potential)
}

/// Two-electron part G_ij = Σ_kl D_kl [2 (ij|kl) - (ik|jl)].
///
/// The (i, j) elements are independent and are computed in parallel. Each
/// element sums its k, l terms in a fixed order, so repeated builds from the
/// same inputs give bit-identical results.
pub fn two_electron_matrix(density: &DMatrix<f64>, eri: &TwoElectronIntegrals) -> Result<DMatrix<f64>> {
    let n = eri.nao();
    check_square("density matrix", density, n)?;
    let indexer = eri.indexer();

    // Create a vector of (i, j) pairs for parallel iteration
    let ij_pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| (0..n).map(move |j| (i, j))).collect();

    let g_values: Vec<f64> = ij_pairs
        .par_iter()
        .map(|&(i, j)| {
            let mut g_ij = 0.0;
            for k in 0..n {
                for l in 0..n {
                    let coulomb = eri.at(indexer.coulomb(i, j, k, l));
                    let exchange = eri.at(indexer.exchange(i, j, k, l));
                    g_ij += density[(k, l)] * (2.0 * coulomb - exchange);
                }
            }
            g_ij
        })
        .collect();

    // ij_pairs is row-major
    Ok(DMatrix::from_row_slice(n, n, &g_values))
}

/// F = H_core + G(D)
pub fn build_fock(
    h_core: &DMatrix<f64>,
    density: &DMatrix<f64>,
    eri: &TwoElectronIntegrals,
) -> Result<DMatrix<f64>> {
    check_square("core Hamiltonian", h_core, eri.nao())?;
    let g_matrix = two_electron_matrix(density, eri)?;
    Ok(h_core + g_matrix)
}

/// D = C_occ C_occ^T over the first `n_occupied` columns of `coeffs`.
///
/// No factor of two: with C^T S C = 1 this gives Tr(D S) = n_occupied.
pub fn density_matrix(coeffs: &DMatrix<f64>, n_occupied: usize) -> Result<DMatrix<f64>> {
    if n_occupied > coeffs.ncols() {
        return Err(ScfError::Shape {
            what: "occupied orbitals".to_string(),
            expected: format!("at most {}", coeffs.ncols()),
            found: n_occupied.to_string(),
        });
    }
    let occupied = coeffs.columns(0, n_occupied);
    Ok(&occupied * occupied.transpose())
}

/// E_elec = Σ_ij D_ij (H_core + F)_ij
pub fn electronic_energy(density: &DMatrix<f64>, h_core: &DMatrix<f64>, fock: &DMatrix<f64>) -> Result<f64> {
    let n = density.nrows();
    check_square("density matrix", density, n)?;
    check_square("core Hamiltonian", h_core, n)?;
    check_square("Fock matrix", fock, n)?;
    Ok(density.component_mul(&(h_core + fock)).sum())
}
