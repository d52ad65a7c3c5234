//! Symmetric eigenproblems and Löwdin orthogonalization

use crate::error::{Result, ScfError};
use nalgebra::{DMatrix, DVector};
use std::cmp::Ordering;

/// Iteration cap for the symmetric eigensolver.
const EIGEN_MAX_ITER: usize = 10_000;

/// Eigenpairs of a symmetric matrix, eigenvalues ascending and eigenvectors
/// as the matching columns.
///
/// nalgebra returns the eigenvalues in no particular order, so they are
/// sorted here; the occupied block of an SCF iteration is taken from the
/// leading columns.
pub fn sorted_symmetric_eigen(m: &DMatrix<f64>) -> Result<(DVector<f64>, DMatrix<f64>)> {
    if !m.is_square() {
        return Err(ScfError::shape(
            "symmetric eigenproblem",
            (m.nrows(), m.nrows()),
            m.shape(),
        ));
    }

    let eig = m
        .clone()
        .try_symmetric_eigen(f64::EPSILON, EIGEN_MAX_ITER)
        .ok_or_else(|| {
            ScfError::Numerical(format!(
                "symmetric eigensolver did not converge within {} iterations",
                EIGEN_MAX_ITER
            ))
        })?;

    if eig.eigenvalues.iter().any(|v| !v.is_finite()) {
        return Err(ScfError::Numerical(
            "symmetric eigensolver produced non-finite eigenvalues".to_string(),
        ));
    }

    let mut indices: Vec<usize> = (0..eig.eigenvalues.len()).collect();
    indices.sort_by(|&a, &b| {
        eig.eigenvalues[a]
            .partial_cmp(&eig.eigenvalues[b])
            .unwrap_or(Ordering::Equal)
    });
    let sorted_eigenvalues = DVector::from_fn(indices.len(), |i, _| eig.eigenvalues[indices[i]]);
    let sorted_eigenvectors = eig.eigenvectors.select_columns(&indices);

    Ok((sorted_eigenvalues, sorted_eigenvectors))
}

/// Symmetric (Löwdin) orthogonalizer X = S^(-1/2) = V Λ^(-1/2) V^T.
///
/// Every eigenvalue of S must be strictly positive. A zero or negative one
/// means the basis is (numerically) linearly dependent and is reported as a
/// numerical error; no eigenvalues are discarded.
pub fn inverse_sqrt(s: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let (eigenvalues, eigenvectors) = sorted_symmetric_eigen(s)?;

    if let Some(&smallest) = eigenvalues.iter().find(|&&v| v <= 0.0) {
        return Err(ScfError::Numerical(format!(
            "overlap matrix has non-positive eigenvalue {:.6e}; the orbital basis is linearly dependent",
            smallest
        )));
    }

    let inv_sqrt_d = DMatrix::from_diagonal(&eigenvalues.map(|v| 1.0 / v.sqrt()));
    Ok(&eigenvectors * inv_sqrt_d * eigenvectors.transpose())
}

/// Flip the sign of each column so that its largest-magnitude entry is
/// positive. Eigenvectors are only defined up to sign; this makes printed
/// MO coefficients reproducible.
pub fn align_eigenvectors(mut eigvecs: DMatrix<f64>) -> DMatrix<f64> {
    for mut col in eigvecs.column_iter_mut() {
        let pivot = col
            .iter()
            .copied()
            .fold(0.0_f64, |acc, x| if x.abs() > acc.abs() { x } else { acc });
        if pivot < 0.0 {
            col *= -1.0;
        }
    }
    eigvecs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_spd(n: usize) -> DMatrix<f64> {
        let a = DMatrix::<f64>::new_random(n, n);
        &a * a.transpose() + DMatrix::identity(n, n) * n as f64
    }

    fn assert_close(a: &DMatrix<f64>, b: &DMatrix<f64>, tol: f64) {
        assert_eq!(a.shape(), b.shape());
        let diff = (a - b).amax();
        assert!(diff < tol, "matrices differ by {:e}:\n{}\n{}", diff, a, b);
    }

    #[test]
    fn test_inverse_sqrt_of_identity() {
        let x = inverse_sqrt(&DMatrix::identity(4, 4)).unwrap();
        assert_close(&x, &DMatrix::identity(4, 4), 1e-14);
    }

    #[test]
    fn test_inverse_sqrt_round_trip() {
        for n in [2, 3, 5, 7] {
            let s = random_spd(n);
            let x = inverse_sqrt(&s).unwrap();
            let should_be_identity = x.transpose() * &s * &x;
            assert_close(&should_be_identity, &DMatrix::identity(n, n), 1e-10);
            // symmetric by construction
            assert_close(&x, &x.transpose(), 1e-12);
        }
    }

    #[test]
    fn test_inverse_sqrt_h2_overlap() {
        let s = DMatrix::from_row_slice(2, 2, &[1.0, 0.6593, 0.6593, 1.0]);
        let x = inverse_sqrt(&s).unwrap();
        assert!((x[(0, 0)] - 1.244768684923198).abs() < 1e-10);
        assert!((x[(0, 1)] + 0.4684544612479186).abs() < 1e-10);
    }

    #[test]
    fn test_inverse_sqrt_rejects_indefinite_overlap() {
        let s = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert!(matches!(inverse_sqrt(&s), Err(ScfError::Numerical(_))));
    }

    #[test]
    fn test_inverse_sqrt_rejects_singular_overlap() {
        let s = DMatrix::zeros(3, 3);
        assert!(matches!(inverse_sqrt(&s), Err(ScfError::Numerical(_))));
    }

    #[test]
    fn test_non_square_is_shape_error() {
        let m = DMatrix::<f64>::zeros(2, 3);
        assert!(matches!(sorted_symmetric_eigen(&m), Err(ScfError::Shape { .. })));
    }

    #[test]
    fn test_eigenpairs_are_sorted() {
        let m = DMatrix::from_diagonal(&DVector::from_vec(vec![3.0, -1.0, 2.0]));
        let (values, vectors) = sorted_symmetric_eigen(&m).unwrap();
        for (value, expected) in values.iter().zip([-1.0, 2.0, 3.0]) {
            assert!((value - expected).abs() < 1e-14);
        }
        // eigenvector of -1 is e_1 (up to sign)
        assert!((vectors[(1, 0)].abs() - 1.0).abs() < 1e-14);
        assert!((vectors[(2, 1)].abs() - 1.0).abs() < 1e-14);
        assert!((vectors[(0, 2)].abs() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_eigen_decomposition_reconstructs_matrix() {
        let m = random_spd(5);
        let (values, vectors) = sorted_symmetric_eigen(&m).unwrap();
        let rebuilt = &vectors * DMatrix::from_diagonal(&values) * vectors.transpose();
        assert_close(&rebuilt, &m, 1e-10);
        assert!(values.as_slice().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_align_eigenvectors() {
        let c = DMatrix::from_row_slice(2, 2, &[0.3, -0.2, -0.9, 0.1]);
        let aligned = align_eigenvectors(c);
        assert_eq!(aligned, DMatrix::from_row_slice(2, 2, &[-0.3, 0.2, 0.9, -0.1]));
    }
}
