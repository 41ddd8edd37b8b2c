//! Provisioning configuration: one TOML file describing what to install.
pub mod dotfiles;
pub mod packages;
pub mod runtimes;
pub mod shell;
pub mod source_build;
pub mod ssh;
pub mod toml_loader;
pub mod validation;

use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "PROVISION_CONFIG";

/// File name looked up in the working directory and config directories.
pub const CONFIG_FILE: &str = "provision.toml";

/// All loaded configuration. Every section is optional; a missing section
/// contributes no steps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// File the configuration was loaded from.
    #[serde(skip)]
    pub path: PathBuf,
    /// `[package_manager]`
    pub package_manager: Option<packages::PackageManagerSection>,
    /// `[packages]`
    pub packages: Option<packages::PackagesSection>,
    /// `[shell]`
    pub shell: Option<shell::ShellSection>,
    /// `[[config_lines]]`
    #[serde(default)]
    pub config_lines: Vec<shell::ConfigLineEntry>,
    /// `[version_manager]`
    pub version_manager: Option<runtimes::VersionManagerSection>,
    /// `[source_build]`
    pub source_build: Option<source_build::SourceBuildSection>,
    /// `[dotfiles]`
    pub dotfiles: Option<dotfiles::DotfilesSection>,
    /// `[ssh]`
    pub ssh: Option<ssh::SshSection>,
}

impl Config {
    /// Load and check the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// it selects a dotfiles link set that is not defined.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml_loader::load_config(path)?;
        config.path = path.to_path_buf();
        config.check_link_sets()?;
        config.check_config_lines()?;
        Ok(config)
    }

    /// Parse configuration from a string (for tests and embedded defaults).
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus I/O.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml_loader::parse_config(content, path)?;
        config.path = path.to_path_buf();
        config.check_link_sets()?;
        config.check_config_lines()?;
        Ok(config)
    }

    /// Every selected link set must be defined.
    fn check_link_sets(&self) -> Result<(), ConfigError> {
        let Some(dotfiles) = &self.dotfiles else {
            return Ok(());
        };
        match dotfiles
            .apply
            .iter()
            .find(|name| !dotfiles.sets.contains_key(*name))
        {
            Some(name) => Err(ConfigError::UnknownLinkSet(name.clone())),
            None => Ok(()),
        }
    }

    /// Each config line must be a single line of text.
    fn check_config_lines(&self) -> Result<(), ConfigError> {
        match self
            .config_lines
            .iter()
            .find(|entry| entry.line.trim().contains(['\n', '\r']))
        {
            Some(entry) => Err(ConfigError::MultiLineConfigLine {
                path: entry.path.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Non-blocking problems worth reporting before the run.
    #[must_use]
    pub fn validate(&self) -> Vec<validation::ValidationWarning> {
        validation::validate_all(self)
    }
}

/// Inputs for locating the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigSearch {
    /// Path given with `--config`.
    pub explicit: Option<PathBuf>,
    /// Value of `PROVISION_CONFIG`.
    pub env: Option<OsString>,
    /// Working directory.
    pub cwd: PathBuf,
    /// Value of `XDG_CONFIG_HOME`.
    pub xdg_config_home: Option<OsString>,
    /// Value of `HOME`.
    pub home: Option<OsString>,
}

impl ConfigSearch {
    /// Capture the search inputs from the process environment.
    #[must_use]
    pub fn from_env(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            env: std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()),
            home: std::env::var_os("HOME"),
        }
    }

    /// Candidate paths in lookup order.
    ///
    /// An explicit path or `PROVISION_CONFIG` is the only candidate when set.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.explicit {
            return vec![path.clone()];
        }
        if let Some(env) = &self.env {
            return vec![PathBuf::from(env)];
        }
        let config_home = self.xdg_config_home.as_ref().map_or_else(
            || {
                self.home
                    .as_ref()
                    .map(|h| PathBuf::from(h).join(".config"))
            },
            |x| Some(PathBuf::from(x)),
        );
        let mut candidates = vec![
            self.cwd.join(CONFIG_FILE),
            self.cwd.join("conf").join(CONFIG_FILE),
        ];
        if let Some(dir) = config_home {
            candidates.push(dir.join("provision").join(CONFIG_FILE));
        }
        candidates
    }

    /// The first candidate that exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] listing every location tried.
    pub fn resolve(&self) -> Result<PathBuf, ConfigError> {
        let candidates = self.candidates();
        candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or_else(|| ConfigError::NotFound {
                searched: candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
