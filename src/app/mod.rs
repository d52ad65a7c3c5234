mod report;
mod runner;
mod workspace;

pub use runner::{initialize_scf, run_restricted};
pub use workspace::CalculationWorkspace;

use self::report::report_restricted_summary;
use crate::config::{Args, Config};
use crate::io::setup_output;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use std::path::Path;
use tracing::info;

pub struct ScfApplication {
    args: Args,
    config: Config,
}

impl ScfApplication {
    pub fn from_cli() -> Result<Self> {
        Self::new(Args::parse())
    }

    pub fn new(args: Args) -> Result<Self> {
        let config = load_config(Path::new(&args.config_file))?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref());
        info!("Configuration loaded from {}:\n{:?}", self.args.config_file, self.config);

        let workspace = CalculationWorkspace::load(&self.config)?;
        let (scf, summary) = run_restricted(workspace, &self.args, &self.config)?;
        report_restricted_summary(&scf, &summary, self.config.print_matrices(&self.args));

        Ok(())
    }
}

/// Read a YAML run description; integral paths are resolved against the
/// directory holding the file.
pub fn load_config(path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", path.display()))?;

    let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults()
        .resolve_paths(config_dir);

    Ok(config)
}
