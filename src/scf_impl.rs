//! Restricted Hartree-Fock SCF driver
//!
//! This module provides the SCF trait definition, the shared iteration
//! bookkeeping types, and `SimpleSCF`, a closed-shell Hartree-Fock driver
//! working from precomputed integrals.
//!
//! # Algorithm
//!
//! With X = S^(-1/2) computed once from the overlap matrix, every iteration
//! performs
//!
//! 1. F' = X^T F X
//! 2. F' C' = C' ε (eigenpairs sorted by ascending ε)
//! 3. C = X C'
//! 4. D = C_occ C_occ^T over the lowest `n_occupied` orbitals
//! 5. F = H_core + G(D)
//! 6. E_elec = Σ D_ij (H_core + F)_ij
//!
//! The loop runs for a fixed number of cycles. An energy/density threshold
//! can additionally stop it early; without one the trajectory is exactly the
//! fixed-budget one.

pub mod fock;
pub mod linalg;
mod simple;

pub use simple::SimpleSCF;

use crate::error::Result;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The SCF trait defines the interface for Self-Consistent Field calculations
pub trait SCF {
    /// Build the core Hamiltonian and the orthogonalizer.
    fn init_core(&mut self) -> Result<()>;
    /// Choose the density entering the first Fock build.
    fn init_density_matrix(&mut self) -> Result<()>;
    /// Build the first Fock matrix and energy; the driver is then ready.
    fn init_fock_matrix(&mut self) -> Result<()>;
    /// Run one diagonalize / density / Fock / energy iteration.
    fn step(&mut self) -> Result<IterationRecord>;
    fn scf_cycle(&mut self) -> Result<ScfSummary>;
    fn electronic_energy(&self) -> f64;
    fn calculate_total_energy(&self) -> f64;
}

/// Lifecycle of an SCF driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScfState {
    Uninitialized,
    Ready,
    Iterating,
    Done,
}

impl fmt::Display for ScfState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScfState::Uninitialized => "uninitialized",
            ScfState::Ready => "ready",
            ScfState::Iterating => "iterating",
            ScfState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Density used for the first Fock build.
///
/// `Zero` starts from D = 0, so the first Fock matrix is the bare core
/// Hamiltonian. `CoreProjection` diagonalizes the core Hamiltonian in the
/// orthogonal basis and occupies its lowest orbitals. Both reach the same
/// fixed point; `Zero` is one iteration behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InitialGuess {
    #[default]
    Zero,
    #[value(name = "core_projection")]
    CoreProjection,
}

impl fmt::Display for InitialGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitialGuess::Zero => f.write_str("zero density"),
            InitialGuess::CoreProjection => f.write_str("core Hamiltonian projection"),
        }
    }
}

/// Energies and density change of one completed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationRecord {
    /// 1-based iteration number
    pub cycle: usize,
    pub electronic_energy: f64,
    pub total_energy: f64,
    /// Change of the electronic energy relative to the previous iteration
    pub delta_energy: f64,
    /// Root-mean-square change of the density matrix elements
    pub density_rms: f64,
}

/// Why the SCF loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// No threshold configured; the cycle budget was spent.
    FixedBudget,
    /// Energy and density changes fell below the threshold.
    Converged,
    /// A threshold was configured but not reached within the budget.
    MaxCycleReached,
}

/// Result of a complete `scf_cycle` run.
#[derive(Debug, Clone)]
pub struct ScfSummary {
    pub records: Vec<IterationRecord>,
    pub termination: Termination,
    pub electronic_energy: f64,
    pub nuclear_repulsion: f64,
    pub total_energy: f64,
    pub orbital_energies: DVector<f64>,
}

impl ScfSummary {
    pub fn cycles(&self) -> usize {
        self.records.len()
    }
}
