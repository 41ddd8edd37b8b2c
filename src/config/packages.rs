//! Package manager and package list configuration.
use serde::Deserialize;

/// `[package_manager]`: how to detect and install the package manager.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageManagerSection {
    /// Display name.
    #[serde(default = "default_manager_name")]
    pub name: String,
    /// Binary used both to detect the manager and to install packages.
    #[serde(default = "default_manager_binary")]
    pub binary: String,
    /// Shell snippet that installs the manager.
    pub install_script: String,
    /// Directories prepended to `PATH` for every command (the manager's
    /// install location is usually not on the inherited `PATH`).
    #[serde(default)]
    pub bin_dirs: Vec<String>,
    /// Failure aborts the run (default `true`).
    pub fatal: Option<bool>,
}

fn default_manager_name() -> String {
    "Homebrew".to_string()
}

fn default_manager_binary() -> String {
    "brew".to_string()
}

/// `[packages]`: formulae and casks to install.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackagesSection {
    /// Command-line packages, installed early.
    #[serde(default)]
    pub formulae: Vec<String>,
    /// GUI applications, installed late.
    #[serde(default)]
    pub casks: Vec<String>,
    /// Packages whose failure aborts the run.
    #[serde(default)]
    pub required: Vec<String>,
    /// Override: make every package fatal (`true`) or none (`false`).
    pub fatal: Option<bool>,
}

impl PackagesSection {
    /// Whether failing to install `name` aborts the run.
    #[must_use]
    pub fn is_fatal(&self, name: &str) -> bool {
        self.fatal
            .unwrap_or_else(|| self.required.iter().any(|r| r == name))
    }
}
