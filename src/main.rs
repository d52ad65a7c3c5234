//! SCF Calculation Command-Line Interface
//!
//! This is the main entry point for running SCF calculations with YAML configuration.

use color_eyre::eyre::Result;
use rhf_scf::app::ScfApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    ScfApplication::from_cli()?.run()
}
