use crate::app::report::report_initial_matrices;
use crate::app::workspace::CalculationWorkspace;
use crate::config::{Args, Config};
use crate::scf_impl::{ScfSummary, SimpleSCF, SCF};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

pub fn run_restricted(
    workspace: CalculationWorkspace,
    args: &Args,
    config: &Config,
) -> Result<(SimpleSCF, ScfSummary)> {
    let mut scf = SimpleSCF::new(workspace.store, workspace.n_occupied);
    configure_restricted(&mut scf, args, config);

    initialize_scf(&mut scf)?;
    if config.print_matrices(args) {
        report_initial_matrices(&scf);
    }

    info!("\nStarting SCF cycle...\n");
    let summary = scf.scf_cycle().wrap_err("SCF iteration failed")?;
    Ok((scf, summary))
}

fn configure_restricted(scf: &mut SimpleSCF, args: &Args, config: &Config) {
    scf.set_max_cycle(config.max_cycle(args));
    scf.set_initial_guess(config.initial_guess(args));
    scf.set_convergence_threshold(config.convergence_threshold(args));
}

pub fn initialize_scf(scf: &mut impl SCF) -> Result<()> {
    info!("\nInitializing SCF calculation...");
    scf.init_core()
        .wrap_err("Failed to build the core Hamiltonian and orthogonalizer")?;
    scf.init_density_matrix()
        .wrap_err("Failed to build the initial density matrix")?;
    scf.init_fock_matrix()
        .wrap_err("Failed to build the initial Fock matrix")?;
    Ok(())
}
