//! End-to-end SCF runs on the bundled STO-3G data sets
//!
//! These tests load the YAML files under `example/` and run the full
//! load / initialize / iterate pipeline.

use std::path::PathBuf;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use clap::Parser;
    use rhf_scf::app::{load_config, run_restricted, CalculationWorkspace};
    use rhf_scf::config::Args;
    use rhf_scf::{InitialGuess, ScfState, Termination, SCF};

    /// Helper function to get the path to example files
    fn example_path(filename: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("example")
            .join(filename)
    }

    fn args_for(filename: &str, extra: &[&str]) -> Args {
        let path = example_path(filename);
        let mut argv = vec!["rhf_scf".to_string(), "--config-file".to_string(), path.display().to_string()];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::parse_from(argv)
    }

    #[test]
    fn test_h2_sto3g_fixed_budget() {
        let args = args_for("h2_sto3g.yaml", &[]);
        let config = load_config(&example_path("h2_sto3g.yaml")).unwrap();
        let workspace = CalculationWorkspace::load(&config).unwrap();
        assert_eq!(workspace.n_occupied, 1);
        assert!((workspace.store.nuclear_repulsion() - 0.7142857142857143).abs() < 1e-15);

        let (scf, summary) = run_restricted(workspace, &args, &config).unwrap();
        assert_eq!(scf.state(), ScfState::Done);
        assert_eq!(summary.cycles(), 10);
        assert_eq!(summary.termination, Termination::FixedBudget);
        assert!((summary.electronic_energy - (-1.8309181218)).abs() < 1e-6);
        assert!((summary.total_energy - (-1.1166324076)).abs() < 1e-6);
        for record in &summary.records {
            assert!((record.electronic_energy - (-1.8309181218)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_heh_sto3g_indexed_data() {
        let args = args_for("heh_sto3g.yaml", &["--initial-guess", "zero"]);
        let config = load_config(&example_path("heh_sto3g.yaml")).unwrap();
        assert_eq!(config.initial_guess(&args), InitialGuess::Zero);

        let workspace = CalculationWorkspace::load(&config).unwrap();
        assert_eq!(workspace.n_occupied, 1);
        let s = workspace.store.overlap();
        assert_eq!(s[(0, 1)], 0.4508);
        assert_eq!(s[(1, 0)], 0.4508);
        assert!((workspace.store.nuclear_repulsion() - 2.0 / 1.4632).abs() < 1e-12);

        let (scf, summary) = run_restricted(workspace, &args, &config).unwrap();
        assert!((summary.records[0].electronic_energy - (-4.1416733084)).abs() < 1e-6);
        assert!((summary.electronic_energy - (-4.2273646551)).abs() < 1e-6);
        assert!((scf.calculate_total_energy() - (-2.8604975146)).abs() < 1e-6);
    }

    #[test]
    fn test_heh_sto3g_core_projection_from_config() {
        let args = args_for("heh_sto3g.yaml", &["--max-cycle", "1"]);
        let config = load_config(&example_path("heh_sto3g.yaml")).unwrap();
        let workspace = CalculationWorkspace::load(&config).unwrap();

        let (_, summary) = run_restricted(workspace, &args, &config).unwrap();
        assert_eq!(summary.cycles(), 1);
        assert!((summary.electronic_energy - (-4.2263278593)).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_from_command_line() {
        let args = args_for("heh_sto3g.yaml", &["--convergence-threshold", "1e-6", "--quiet-matrices"]);
        let config = load_config(&example_path("heh_sto3g.yaml")).unwrap();
        let workspace = CalculationWorkspace::load(&config).unwrap();

        let (_, summary) = run_restricted(workspace, &args, &config).unwrap();
        assert_eq!(summary.termination, Termination::Converged);
        assert!(summary.cycles() < 10);
        assert!((summary.electronic_energy - (-4.2273646551)).abs() < 1e-6);
    }

    #[test]
    fn test_missing_config_is_reported() {
        let err = load_config(&example_path("does_not_exist.yaml")).unwrap_err();
        assert!(err.to_string().contains("Unable to read configuration file"));
    }
}
