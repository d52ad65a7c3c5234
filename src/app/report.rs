use crate::io::{format_levels, format_matrix};
use crate::scf_impl::{ScfSummary, SimpleSCF, Termination};
use tracing::info;

pub fn report_initial_matrices(scf: &SimpleSCF) {
    info!("\nCore Hamiltonian:\n{}", format_matrix(&scf.h_core));
    info!("\nS^-1/2 matrix:\n{}", format_matrix(&scf.orthogonalizer));
    info!("\nInitial density matrix:\n{}", format_matrix(&scf.density_matrix));
    info!("\nInitial Fock matrix:\n{}", format_matrix(&scf.fock_matrix));
}

pub fn report_restricted_summary(scf: &SimpleSCF, summary: &ScfSummary, print_matrices: bool) {
    info!("\nSCF calculation finished.");
    match summary.termination {
        Termination::FixedBudget => info!("Ran {} SCF cycles", summary.cycles()),
        Termination::Converged => info!("Converged after {} SCF cycles", summary.cycles()),
        Termination::MaxCycleReached => {
            info!("Not converged after {} SCF cycles", summary.cycles())
        }
    }

    info!("\nIteration history:");
    info!("  {:>5} {:>20} {:>20} {:>12}", "cycle", "E_elec", "E_total", "dE");
    for record in &summary.records {
        info!(
            "  {:>5} {:>20.12} {:>20.12} {:>12.3e}",
            record.cycle, record.electronic_energy, record.total_energy, record.delta_energy
        );
    }

    info!("\nFinal Energy Levels:\n{}", format_levels(&summary.orbital_energies));

    if print_matrices {
        info!("\nMO coefficients:\n{}", format_matrix(&scf.coeffs));
        info!("\nFinal density matrix:\n{}", format_matrix(&scf.density_matrix));
        info!("\nFinal Fock matrix:\n{}", format_matrix(&scf.fock_matrix));
    }

    info!("\nElectronic energy:        {:.10} au", summary.electronic_energy);
    info!("Nuclear repulsion energy: {:.10} au", summary.nuclear_repulsion);
    info!("Hartree-Fock Total Energy: {:.10} au", summary.total_energy);
}
