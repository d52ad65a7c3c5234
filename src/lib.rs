//! Restricted Hartree-Fock self-consistent field from precomputed integrals
//!
//! The integral data (overlap, kinetic, nuclear attraction, packed
//! two-electron integrals) is read through the `integrals` crate; this crate
//! builds the orthogonalizer and Fock matrices and drives the SCF iteration.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod scf_impl;

pub use error::ScfError;
pub use scf_impl::{InitialGuess, IterationRecord, ScfState, ScfSummary, SimpleSCF, Termination, SCF};
