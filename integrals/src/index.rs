//! Packed addressing for permutation-symmetric two-electron integrals
//!
//! An orbital pair (i, j) collapses to one triangular offset, and two such
//! pair offsets collapse again into a single quad offset. Because each level
//! is order independent, all eight permutations of (ij|kl) land on the same
//! slot:
//!
//! (ij|kl) = (ji|kl) = (ij|lk) = (ji|lk) = (kl|ij) = (lk|ij) = (kl|ji) = (lk|ji)

use serde::{Deserialize, Serialize};

/// Offset of an unordered orbital pair in the packed pair space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairIndex(usize);

/// Offset of an unordered pair of pairs, i.e. a slot in the packed ERI array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuadIndex(usize);

impl PairIndex {
    pub fn value(self) -> usize {
        self.0
    }
}

impl QuadIndex {
    pub fn value(self) -> usize {
        self.0
    }
}

/// Number of entries in the lower triangle (diagonal included) of an n x n matrix.
pub fn triangular(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Maps orbital indices to packed offsets.
///
/// The indexer owns a lookup table `offsets[n] = n (n + 1) / 2`, built once
/// for the orbital count it was created with. The table is long enough to
/// address the second level, where the arguments are pair offsets rather
/// than orbital indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetricIndexer {
    nao: usize,
    offsets: Vec<usize>,
}

impl SymmetricIndexer {
    pub fn new(nao: usize) -> Self {
        let n_pairs = triangular(nao);
        let offsets = (0..n_pairs.max(1)).map(triangular).collect();
        SymmetricIndexer { nao, offsets }
    }

    pub fn nao(&self) -> usize {
        self.nao
    }

    /// Number of unique orbital pairs, nao (nao + 1) / 2.
    pub fn n_pairs(&self) -> usize {
        triangular(self.nao)
    }

    /// Length of the packed two-electron array.
    pub fn n_quads(&self) -> usize {
        triangular(self.n_pairs())
    }

    /// `max(a, b) (max(a, b) + 1) / 2 + min(a, b)`
    pub fn tri_index(&self, a: usize, b: usize) -> usize {
        let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
        debug_assert!(
            hi < self.offsets.len(),
            "index {} outside the offset table ({} entries)",
            hi,
            self.offsets.len()
        );
        self.offsets[hi] + lo
    }

    pub fn pair(&self, i: usize, j: usize) -> PairIndex {
        debug_assert!(i < self.nao && j < self.nao, "orbital index out of range");
        PairIndex(self.tri_index(i, j))
    }

    pub fn quad(&self, ij: PairIndex, kl: PairIndex) -> QuadIndex {
        QuadIndex(self.tri_index(ij.0, kl.0))
    }

    /// Slot of the Coulomb-type integral (ij|kl).
    pub fn coulomb(&self, i: usize, j: usize, k: usize, l: usize) -> QuadIndex {
        self.quad(self.pair(i, j), self.pair(k, l))
    }

    /// Slot of the exchange-type integral (ik|jl) used alongside (ij|kl).
    pub fn exchange(&self, i: usize, j: usize, k: usize, l: usize) -> QuadIndex {
        self.quad(self.pair(i, k), self.pair(j, l))
    }

    /// Canonical representatives (i >= j, k >= l, ij >= kl) of every unique
    /// integral class, in ascending quad order within each i.
    pub fn unique_classes(&self) -> impl Iterator<Item = (usize, usize, usize, usize)> {
        let nao = self.nao;
        (0..nao).flat_map(move |i| {
            (0..=i).flat_map(move |j| {
                (0..=i).flat_map(move |k| {
                    let l_max = if k == i { j } else { k };
                    (0..=l_max).map(move |l| (i, j, k, l))
                })
            })
        })
    }
}
