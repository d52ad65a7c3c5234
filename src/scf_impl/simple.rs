//! Simple implementation of the SCF trait (Restricted Hartree-Fock)

use super::fock::{build_fock, core_hamiltonian, density_matrix, electronic_energy};
use super::linalg::{align_eigenvectors, inverse_sqrt, sorted_symmetric_eigen};
use super::{InitialGuess, IterationRecord, ScfState, ScfSummary, Termination, SCF};
use crate::error::{Result, ScfError};
use integrals::IntegralStore;
use nalgebra::{DMatrix, DVector};
use tracing::{info, warn};

#[derive(Clone)]
pub struct SimpleSCF {
    pub num_basis: usize,
    pub n_occupied: usize,
    store: IntegralStore,
    pub initial_guess: InitialGuess,
    pub max_cycle: usize,
    /// `None` runs exactly `max_cycle` iterations.
    pub convergence_threshold: Option<f64>,
    pub h_core: DMatrix<f64>,
    /// X = S^(-1/2)
    pub orthogonalizer: DMatrix<f64>,
    pub density_matrix: DMatrix<f64>,
    pub fock_matrix: DMatrix<f64>,
    pub coeffs: DMatrix<f64>,
    pub e_level: DVector<f64>,
    energy: f64,
    state: ScfState,
    core_built: bool,
    cycles_done: usize,
}

/// Root-mean-square difference of two equally shaped matrices.
fn rms_change(old: &DMatrix<f64>, new: &DMatrix<f64>) -> f64 {
    if new.is_empty() {
        return 0.0;
    }
    ((new - old).norm_squared() / new.len() as f64).sqrt()
}

fn check_finite(fock: &DMatrix<f64>, energy: f64) -> Result<()> {
    if fock.iter().any(|v| !v.is_finite()) || !energy.is_finite() {
        return Err(ScfError::Numerical(
            "Fock matrix or electronic energy is not finite".to_string(),
        ));
    }
    Ok(())
}

impl SimpleSCF {
    pub fn new(store: IntegralStore, n_occupied: usize) -> SimpleSCF {
        let num_basis = store.nao();
        SimpleSCF {
            num_basis,
            n_occupied,
            store,
            initial_guess: InitialGuess::default(),
            max_cycle: 10,
            convergence_threshold: None,
            h_core: DMatrix::zeros(0, 0),
            orthogonalizer: DMatrix::zeros(0, 0),
            density_matrix: DMatrix::zeros(0, 0),
            fock_matrix: DMatrix::zeros(0, 0),
            coeffs: DMatrix::zeros(0, 0),
            e_level: DVector::zeros(0),
            energy: 0.0,
            state: ScfState::Uninitialized,
            core_built: false,
            cycles_done: 0,
        }
    }

    /// Driver with the occupation derived from the molecule's electron count.
    pub fn from_store(store: IntegralStore) -> Result<SimpleSCF> {
        let n_occupied = store.molecule().n_occupied()?;
        Ok(Self::new(store, n_occupied))
    }

    pub fn set_initial_guess(&mut self, guess: InitialGuess) {
        self.initial_guess = guess;
        info!("Initial guess set to {}", guess);
    }

    pub fn set_max_cycle(&mut self, max_cycle: usize) {
        self.max_cycle = max_cycle;
        info!("Maximum SCF cycles set to {}", max_cycle);
    }

    pub fn set_convergence_threshold(&mut self, threshold: Option<f64>) {
        self.convergence_threshold = threshold;
        match threshold {
            Some(t) => info!("Convergence threshold set to {}", t),
            None => info!("No convergence threshold, running a fixed number of cycles"),
        }
    }

    pub fn store(&self) -> &IntegralStore {
        &self.store
    }

    pub fn state(&self) -> ScfState {
        self.state
    }

    pub fn cycles_done(&self) -> usize {
        self.cycles_done
    }

    fn require_state(&self, allowed: &[ScfState]) -> Result<()> {
        if allowed.contains(&self.state) {
            return Ok(());
        }
        let expected = allowed
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        Err(ScfError::State {
            expected,
            found: self.state.to_string(),
        })
    }

    fn require_core(&self) -> Result<()> {
        self.require_state(&[ScfState::Uninitialized])?;
        if !self.core_built {
            return Err(ScfError::State {
                expected: "initialized with a core Hamiltonian".to_string(),
                found: self.state.to_string(),
            });
        }
        Ok(())
    }

    /// Solve F C = S C ε through the orthogonal basis: F' = X^T F X, then
    /// C = X C'. Orbitals come back in ascending energy order.
    fn diagonalize(&self, fock: &DMatrix<f64>) -> Result<(DVector<f64>, DMatrix<f64>)> {
        let x = &self.orthogonalizer;
        let f_prime = x.transpose() * fock * x;
        let (e_level, c_prime) = sorted_symmetric_eigen(&f_prime)?;
        let coeffs = align_eigenvectors(x * c_prime);
        Ok((e_level, coeffs))
    }

    fn summary(&self, records: Vec<IterationRecord>, termination: Termination) -> ScfSummary {
        ScfSummary {
            records,
            termination,
            electronic_energy: self.energy,
            nuclear_repulsion: self.store.nuclear_repulsion(),
            total_energy: self.calculate_total_energy(),
            orbital_energies: self.e_level.clone(),
        }
    }
}

impl SCF for SimpleSCF {
    fn init_core(&mut self) -> Result<()> {
        self.require_state(&[ScfState::Uninitialized])?;
        if self.n_occupied > self.num_basis {
            return Err(ScfError::Shape {
                what: "occupied orbitals".to_string(),
                expected: format!("at most {}", self.num_basis),
                found: self.n_occupied.to_string(),
            });
        }

        self.h_core = core_hamiltonian(self.store.kinetic(), self.store.potential())?;
        self.orthogonalizer = inverse_sqrt(self.store.overlap())?;
        self.density_matrix = DMatrix::zeros(self.num_basis, self.num_basis);
        self.core_built = true;

        info!(
            "Core Hamiltonian and orthogonalizer built for {} basis functions, {} occupied orbitals",
            self.num_basis, self.n_occupied
        );
        Ok(())
    }

    fn init_density_matrix(&mut self) -> Result<()> {
        self.require_core()?;

        match self.initial_guess {
            InitialGuess::Zero => {
                self.density_matrix = DMatrix::zeros(self.num_basis, self.num_basis);
            }
            InitialGuess::CoreProjection => {
                let (e_level, coeffs) = self.diagonalize(&self.h_core)?;
                self.density_matrix = density_matrix(&coeffs, self.n_occupied)?;
                self.e_level = e_level;
                self.coeffs = coeffs;
            }
        }

        info!("Initial density matrix from {}", self.initial_guess);
        Ok(())
    }

    fn init_fock_matrix(&mut self) -> Result<()> {
        self.require_core()?;

        let fock = build_fock(&self.h_core, &self.density_matrix, self.store.eri())?;
        let energy = electronic_energy(&self.density_matrix, &self.h_core, &fock)?;
        check_finite(&fock, energy)?;

        self.fock_matrix = fock;
        self.energy = energy;
        self.state = ScfState::Ready;

        info!("Initial electronic energy: {:.12} au", self.energy);
        Ok(())
    }

    fn step(&mut self) -> Result<IterationRecord> {
        self.require_state(&[ScfState::Ready, ScfState::Iterating])?;

        let (e_level, coeffs) = self.diagonalize(&self.fock_matrix)?;
        let density = density_matrix(&coeffs, self.n_occupied)?;
        let fock = build_fock(&self.h_core, &density, self.store.eri())?;
        let energy = electronic_energy(&density, &self.h_core, &fock)?;
        check_finite(&fock, energy)?;

        let record = IterationRecord {
            cycle: self.cycles_done + 1,
            electronic_energy: energy,
            total_energy: energy + self.store.nuclear_repulsion(),
            delta_energy: energy - self.energy,
            density_rms: rms_change(&self.density_matrix, &density),
        };

        self.e_level = e_level;
        self.coeffs = coeffs;
        self.density_matrix = density;
        self.fock_matrix = fock;
        self.energy = energy;
        self.cycles_done = record.cycle;
        self.state = ScfState::Iterating;

        info!(
            "Cycle {}: E_elec = {:.12} au, E_nuc = {:.12} au, dE = {:.3e}, rms(dD) = {:.3e}",
            record.cycle,
            record.electronic_energy,
            self.store.nuclear_repulsion(),
            record.delta_energy,
            record.density_rms
        );
        Ok(record)
    }

    fn scf_cycle(&mut self) -> Result<ScfSummary> {
        self.require_state(&[ScfState::Ready])?;

        let mut records = Vec::with_capacity(self.max_cycle);
        let mut termination = match self.convergence_threshold {
            Some(_) => Termination::MaxCycleReached,
            None => Termination::FixedBudget,
        };

        for _ in 0..self.max_cycle {
            let record = self.step()?;
            records.push(record);

            if let Some(threshold) = self.convergence_threshold {
                if record.delta_energy.abs() < threshold && record.density_rms < threshold {
                    info!("SCF converged in {} cycles", record.cycle);
                    termination = Termination::Converged;
                    break;
                }
            }
        }

        if termination == Termination::MaxCycleReached {
            warn!("SCF did not converge within {} cycles", self.max_cycle);
        }

        self.state = ScfState::Done;
        info!(
            "Final electronic energy: {:.12} au, total energy: {:.12} au",
            self.energy,
            self.calculate_total_energy()
        );
        Ok(self.summary(records, termination))
    }

    fn electronic_energy(&self) -> f64 {
        self.energy
    }

    fn calculate_total_energy(&self) -> f64 {
        self.energy + self.store.nuclear_repulsion()
    }
}
