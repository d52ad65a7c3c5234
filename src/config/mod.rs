//! Configuration management for SCF calculations
//!
//! This module handles the YAML run description, its defaults, and the
//! merge with command-line overrides.

mod args;

pub use args::Args;

use crate::scf_impl::InitialGuess;
use integrals::IntegralSources;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for SCF calculations
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub molecule: MoleculeParams,
    pub integrals: IntegralSources,
    #[serde(default)]
    pub scf_params: ScfParams,
}

/// Size and charge of the system the integrals describe
#[derive(Debug, Deserialize, Serialize)]
pub struct MoleculeParams {
    pub charge: Option<i32>,
    pub nao: usize,
    /// Overrides the electron count from the geometry
    pub n_occupied: Option<usize>,
}

/// SCF-specific parameters
#[derive(Debug, Deserialize, Serialize)]
pub struct ScfParams {
    pub max_cycle: Option<usize>,
    pub initial_guess: Option<InitialGuess>,
    pub convergence_threshold: Option<f64>,
    pub print_matrices: Option<bool>,
}

impl Default for ScfParams {
    fn default() -> Self {
        ScfParams {
            max_cycle: Some(10),
            initial_guess: Some(InitialGuess::Zero),
            convergence_threshold: None,
            print_matrices: Some(true),
        }
    }
}

impl ScfParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.max_cycle.is_none() {
            self.max_cycle = defaults.max_cycle;
        }
        if self.initial_guess.is_none() {
            self.initial_guess = defaults.initial_guess;
        }
        if self.print_matrices.is_none() {
            self.print_matrices = defaults.print_matrices;
        }
        self
    }
}

impl Config {
    /// Apply defaults to all configuration sections
    pub fn with_defaults(mut self) -> Self {
        self.scf_params = self.scf_params.with_defaults();
        if self.molecule.charge.is_none() {
            self.molecule.charge = Some(0);
        }
        self
    }

    /// Make relative integral paths relative to `config_dir`.
    pub fn resolve_paths(mut self, config_dir: &Path) -> Self {
        self.integrals = self.integrals.resolve_against(config_dir);
        self
    }

    pub fn charge(&self) -> i32 {
        self.molecule.charge.unwrap_or(0)
    }

    /// Command-line value if given, otherwise the configured one.
    pub fn max_cycle(&self, args: &Args) -> usize {
        args.max_cycle.or(self.scf_params.max_cycle).unwrap_or(10)
    }

    pub fn initial_guess(&self, args: &Args) -> InitialGuess {
        args.initial_guess
            .or(self.scf_params.initial_guess)
            .unwrap_or_default()
    }

    pub fn convergence_threshold(&self, args: &Args) -> Option<f64> {
        args.convergence_threshold
            .or(self.scf_params.convergence_threshold)
    }

    pub fn print_matrices(&self, args: &Args) -> bool {
        !args.quiet_matrices && self.scf_params.print_matrices.unwrap_or(true)
    }
}
