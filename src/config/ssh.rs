//! SSH key configuration.
use serde::Deserialize;

use crate::resources::ssh_key::DEFAULT_KEY_TYPE;

/// `[ssh]`: the keypair to generate.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SshSection {
    /// Private key path (`~/` allowed).
    #[serde(default = "default_key")]
    pub key: String,
    /// Comment embedded in the public key.
    pub email: String,
    /// Key algorithm.
    #[serde(default = "default_key_type")]
    pub key_type: String,
    /// Failure aborts the run (default `false`).
    pub fatal: Option<bool>,
}

fn default_key() -> String {
    "~/.ssh/id_ed25519".to_string()
}

fn default_key_type() -> String {
    DEFAULT_KEY_TYPE.to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let section: SshSection = toml::from_str("email = \"me@example.com\"\n").unwrap();
        assert_eq!(section.key, "~/.ssh/id_ed25519");
        assert_eq!(section.key_type, "ed25519");
    }
}
