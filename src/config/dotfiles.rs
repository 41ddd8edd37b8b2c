//! Dotfiles repository and link set configuration.
use serde::Deserialize;
use std::collections::BTreeMap;

/// `[dotfiles]`: the repository to clone and the link sets to apply.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DotfilesSection {
    /// Remote URL.
    pub repo: String,
    /// Checkout directory (`~/` allowed).
    #[serde(default = "default_checkout")]
    pub checkout: String,
    /// Optional branch to clone.
    pub git_ref: Option<String>,
    /// Names of the link sets to apply, in order.
    #[serde(default)]
    pub apply: Vec<String>,
    /// Link sets by name.
    #[serde(default)]
    pub sets: BTreeMap<String, Vec<LinkEntry>>,
    /// Failure aborts the run (default `false`).
    pub fatal: Option<bool>,
}

fn default_checkout() -> String {
    "~/.dotfiles".to_string()
}

/// A single entry in a link set: either a plain source path or a
/// structured `{ source, target }` pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LinkEntry {
    /// Plain string `"gitconfig"`: target is `~/.gitconfig` by convention.
    Simple(String),
    /// Explicit target.
    WithTarget {
        /// Path relative to the dotfiles checkout.
        source: String,
        /// Link location (`~/` allowed).
        target: String,
    },
}

impl LinkEntry {
    /// Path relative to the dotfiles checkout.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Simple(source) | Self::WithTarget { source, .. } => source,
        }
    }

    /// Link location; for plain entries `~/.<source>`.
    #[must_use]
    pub fn target(&self) -> String {
        match self {
            Self::Simple(source) => format!("~/.{source}"),
            Self::WithTarget { target, .. } => target.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_entry_forms() {
        let section: DotfilesSection = toml::from_str(
            r#"
repo = "https://example.com/dots.git"
apply = ["base"]
[sets]
base = ["gitconfig", { source = "fish", target = "~/.config/fish" }]
"#,
        )
        .unwrap();
        assert_eq!(section.checkout, "~/.dotfiles");
        let base = &section.sets["base"];
        assert_eq!(base[0].source(), "gitconfig");
        assert_eq!(base[0].target(), "~/.gitconfig");
        assert_eq!(base[1].source(), "fish");
        assert_eq!(base[1].target(), "~/.config/fish");
    }
}
