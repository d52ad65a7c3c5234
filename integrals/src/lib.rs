//! Precomputed integral data for Hartree-Fock calculations
//!
//! Holds the one-electron matrices (overlap, kinetic, nuclear attraction),
//! the packed two-electron integrals and the molecular geometry, together
//! with the readers for the plain-text files they are distributed in.

pub mod eri;
pub mod error;
pub mod index;
pub mod loader;
pub mod molecule;
pub mod store;

pub use eri::TwoElectronIntegrals;
pub use error::IntegralError;
pub use index::{PairIndex, QuadIndex, SymmetricIndexer};
pub use loader::{IntegralFormat, IntegralSources};
pub use molecule::{Atom, Molecule};
pub use store::IntegralStore;
