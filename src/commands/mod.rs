//! Top-level command orchestration.
pub mod provision;

use anyhow::Result;

use crate::cli::Cli;
use crate::config::{Config, ConfigSearch};
use crate::error::ProvisionError;
use crate::logging::Log;

/// Shared state produced by the command setup sequence: the resolved and
/// loaded configuration.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded configuration.
    pub config: Config,
}

impl CommandSetup {
    /// Locate and load the configuration file, then report its warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration file is found or it fails to
    /// load.
    pub fn init(args: &Cli, log: &dyn Log) -> Result<Self> {
        log.stage("Loading configuration");
        let path = ConfigSearch::from_env(args.config.clone())
            .resolve()
            .map_err(ProvisionError::from)?;
        log.info(&format!("config: {}", path.display()));
        let config = Config::load(&path).map_err(ProvisionError::from)?;

        let warnings = config.validate();
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!("  {warning}"));
            }
        }

        Ok(Self { config })
    }
}
