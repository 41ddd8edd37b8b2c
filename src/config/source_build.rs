//! Build-from-source configuration.
use serde::Deserialize;

/// `[source_build]`: one tool compiled from a git checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceBuildSection {
    /// Tool name.
    pub name: String,
    /// Remote URL.
    pub repo: String,
    /// Branch or tag to build.
    #[serde(default = "default_ref")]
    pub git_ref: String,
    /// Binary that proves the tool is installed.
    pub binary: String,
    /// Checkout directory (`~/` allowed).
    pub checkout: String,
    /// Build command, run inside the checkout.
    #[serde(default)]
    pub build: Vec<String>,
    /// Install command, run inside the checkout.
    #[serde(default)]
    pub install: Vec<String>,
    /// Failure aborts the run (default `false`).
    pub fatal: Option<bool>,
}

fn default_ref() -> String {
    "stable".to_string()
}
