//! Version manager and runtime configuration.
use serde::Deserialize;

/// `[version_manager]`: the tool that installs language runtimes.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionManagerSection {
    /// Version manager binary.
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Arguments that select the global scope when setting a version.
    #[serde(default = "default_global_args")]
    pub global_args: Vec<String>,
    /// File recording global selections (default `~/.tool-versions`).
    #[serde(default = "default_tool_versions")]
    pub tool_versions: String,
    /// Runtimes to install, in order.
    #[serde(default)]
    pub runtimes: Vec<Runtime>,
    /// Failure aborts the run (default `false`).
    pub fatal: Option<bool>,
}

fn default_binary() -> String {
    "asdf".to_string()
}

fn default_global_args() -> Vec<String> {
    vec!["global".to_string()]
}

fn default_tool_versions() -> String {
    "~/.tool-versions".to_string()
}

/// One runtime version to install.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Runtime {
    /// Plugin providing the runtime (e.g. `nodejs`).
    pub plugin: String,
    /// Version to install.
    pub version: String,
    /// Also select this version globally.
    #[serde(default)]
    pub global: bool,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_asdf_global() {
        let section: VersionManagerSection = toml::from_str(
            "[[runtimes]]\nplugin = \"nodejs\"\nversion = \"20.11.1\"\n",
        )
        .unwrap();
        assert_eq!(section.binary, "asdf");
        assert_eq!(section.global_args, vec!["global"]);
        assert_eq!(section.tool_versions, "~/.tool-versions");
        assert_eq!(section.runtimes.len(), 1);
        assert!(!section.runtimes[0].global);
    }
}
