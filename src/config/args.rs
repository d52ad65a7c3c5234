//! Command-line argument parsing for SCF calculations

use crate::scf_impl::InitialGuess;
use clap::Parser;

/// Restricted Hartree-Fock SCF from precomputed integrals
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "example/h2_sto3g.yaml")]
    pub config_file: String,

    /// Override maximum SCF cycles
    #[arg(long)]
    pub max_cycle: Option<usize>,

    /// Override the initial density guess
    #[arg(long, value_enum)]
    pub initial_guess: Option<InitialGuess>,

    /// Stop early once |dE| and rms(dD) fall below this value
    #[arg(long)]
    pub convergence_threshold: Option<f64>,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Skip the matrix printout, energies only
    #[arg(long)]
    pub quiet_matrices: bool,
}
