//! Login shell and config-line configuration.
use serde::Deserialize;

/// `[shell]`: the login shell to register and select.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellSection {
    /// Absolute path of the shell binary.
    pub path: String,
    /// Allowed-shells file (default `/etc/shells`).
    pub shells_file: Option<String>,
    /// Failure aborts the run (default `true`).
    pub fatal: Option<bool>,
}

/// `[[config_lines]]`: a line that must be present in a text file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLineEntry {
    /// File to edit (`~/` allowed).
    pub path: String,
    /// Line to append when absent.
    pub line: String,
    /// Failure aborts the run (default `false`).
    pub fatal: Option<bool>,
}
