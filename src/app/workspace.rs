use crate::config::Config;
use color_eyre::eyre::{Result, WrapErr};
use integrals::IntegralStore;
use tracing::{info, warn};

/// Largest tolerated difference between a tabulated and a recomputed nuclear
/// repulsion energy.
const ENUC_TOLERANCE: f64 = 1e-6;

/// Largest tolerated |M_ij - M_ji| in the one-electron input.
const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// In-memory representation of everything needed to run an SCF calculation.
#[derive(Clone)]
pub struct CalculationWorkspace {
    pub store: IntegralStore,
    pub n_occupied: usize,
}

impl CalculationWorkspace {
    pub fn new(store: IntegralStore, n_occupied: usize) -> Self {
        Self { store, n_occupied }
    }

    /// Load the integral files named in `config` and settle the occupation.
    pub fn load(config: &Config) -> Result<Self> {
        info!("\nLoading integrals...");
        let store = IntegralStore::load(&config.integrals, config.molecule.nao, config.charge())
            .wrap_err("Failed to load integral data")?;

        report_geometry(&store);
        check_nuclear_repulsion(&store, config.integrals.nuclear_repulsion.is_some())?;

        let asymmetry = store.max_asymmetry();
        if asymmetry > SYMMETRY_TOLERANCE {
            warn!(
                "One-electron matrices are not symmetric (max |M_ij - M_ji| = {:.3e})",
                asymmetry
            );
        }

        let n_occupied = match config.molecule.n_occupied {
            Some(n) => {
                info!("Occupied orbitals from configuration: {}", n);
                n
            }
            None => {
                let n = store
                    .molecule()
                    .n_occupied()
                    .wrap_err("Cannot determine the number of occupied orbitals")?;
                info!("Occupied orbitals from electron count: {}", n);
                n
            }
        };

        Ok(Self::new(store, n_occupied))
    }
}

fn report_geometry(store: &IntegralStore) {
    let molecule = store.molecule();
    info!(
        "{} atoms, charge {}, {} atomic orbitals",
        molecule.num_atoms(),
        molecule.charge,
        molecule.nao
    );
    for (i, atom) in molecule.atoms.iter().enumerate() {
        info!(
            "  Atom {}: Z = {:.1} at [{:.6}, {:.6}, {:.6}]",
            i + 1,
            atom.charge,
            atom.position.x,
            atom.position.y,
            atom.position.z
        );
    }
}

fn check_nuclear_repulsion(store: &IntegralStore, from_file: bool) -> Result<()> {
    let enuc = store.nuclear_repulsion();
    if !from_file {
        info!("Nuclear repulsion energy (from geometry): {:.12} au", enuc);
        return Ok(());
    }

    info!("Nuclear repulsion energy (from file): {:.12} au", enuc);
    let geometric = store
        .molecule()
        .nuclear_repulsion()
        .wrap_err("Cannot compare the tabulated nuclear repulsion with the geometry")?;
    if (enuc - geometric).abs() > ENUC_TOLERANCE {
        warn!(
            "Tabulated nuclear repulsion {:.12} au differs from the geometry value {:.12} au; using the tabulated one",
            enuc, geometric
        );
    }
    Ok(())
}
