use crate::error::IntegralError;
use crate::index::{QuadIndex, SymmetricIndexer};

/// Two-electron repulsion integrals (ij|kl) stored once per symmetry class.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoElectronIntegrals {
    indexer: SymmetricIndexer,
    values: Vec<f64>,
}

impl TwoElectronIntegrals {
    pub fn zeros(nao: usize) -> Self {
        let indexer = SymmetricIndexer::new(nao);
        let values = vec![0.0; indexer.n_quads()];
        TwoElectronIntegrals { indexer, values }
    }

    /// Wrap an already packed array, laid out in `QuadIndex` order.
    pub fn from_packed(nao: usize, values: Vec<f64>) -> Result<Self, IntegralError> {
        let indexer = SymmetricIndexer::new(nao);
        if values.len() != indexer.n_quads() {
            return Err(IntegralError::shape(
                "packed two-electron integrals",
                format!("{} values for nao = {}", indexer.n_quads(), nao),
                format!("{} values", values.len()),
            ));
        }
        Ok(TwoElectronIntegrals { indexer, values })
    }

    /// Fill every symmetry class from `f(i, j, k, l)`, evaluated once per
    /// class on its canonical representative.
    pub fn from_fn<F>(nao: usize, f: F) -> Self
    where
        F: Fn(usize, usize, usize, usize) -> f64,
    {
        let mut eri = Self::zeros(nao);
        let classes: Vec<_> = eri.indexer.unique_classes().collect();
        for (i, j, k, l) in classes {
            eri.set(i, j, k, l, f(i, j, k, l));
        }
        eri
    }

    pub fn nao(&self) -> usize {
        self.indexer.nao()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn indexer(&self) -> &SymmetricIndexer {
        &self.indexer
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// (ij|kl), any of its eight permutations gives the same value.
    pub fn get(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        self.values[self.indexer.coulomb(i, j, k, l).value()]
    }

    pub fn at(&self, index: QuadIndex) -> f64 {
        self.values[index.value()]
    }

    pub fn set(&mut self, i: usize, j: usize, k: usize, l: usize, value: f64) {
        let q = self.indexer.coulomb(i, j, k, l);
        self.values[q.value()] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    #[test]
    fn test_permutations_read_the_same_value() {
        let eri = TwoElectronIntegrals::from_fn(3, |i, j, k, l| {
            1.0 + (i * 1000 + j * 100 + k * 10 + l) as f64
        });

        for (i, j, k, l) in iproduct!(0..3, 0..3, 0..3, 0..3) {
            let v = eri.get(i, j, k, l);
            assert_eq!(v, eri.get(j, i, k, l));
            assert_eq!(v, eri.get(i, j, l, k));
            assert_eq!(v, eri.get(k, l, i, j));
            assert_eq!(v, eri.get(l, k, j, i));
        }
    }

    #[test]
    fn test_set_through_any_permutation() {
        let mut eri = TwoElectronIntegrals::zeros(2);
        eri.set(0, 1, 1, 1, 0.4441);
        assert_eq!(eri.get(1, 1, 1, 0), 0.4441);
        assert_eq!(eri.get(1, 0, 1, 1), 0.4441);
        assert_eq!(eri.as_slice().iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn test_from_packed_checks_length() {
        let ok = TwoElectronIntegrals::from_packed(2, vec![0.7746, 0.4441, 0.2970, 0.5697, 0.4441, 0.7746]);
        let eri = ok.expect("six classes for two orbitals");
        assert_eq!(eri.len(), 6);
        assert_eq!(eri.get(1, 1, 0, 0), 0.5697);
        assert_eq!(eri.get(1, 0, 1, 0), 0.2970);

        let err = TwoElectronIntegrals::from_packed(2, vec![1.0; 5]).unwrap_err();
        assert!(matches!(err, IntegralError::Shape { .. }));
    }

    #[test]
    fn test_at_agrees_with_get() {
        let eri = TwoElectronIntegrals::from_fn(3, |i, j, k, l| (i + 2 * j + 3 * k + 4 * l) as f64);
        let indexer = eri.indexer().clone();
        for (i, j, k, l) in iproduct!(0..3, 0..3, 0..3, 0..3) {
            assert_eq!(eri.at(indexer.exchange(i, j, k, l)), eri.get(i, k, j, l));
        }
    }
}
