//! SSH keypair resource.
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::helpers::fs::{ensure_parent_dir, remove_existing};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;
use crate::prompt::Prompter;

/// Default key algorithm passed to `ssh-keygen -t`.
pub const DEFAULT_KEY_TYPE: &str = "ed25519";

/// An SSH keypair labelled with the operator's email.
///
/// Replacing an existing key asks the [`Prompter`] first; the default answer
/// is "no".
pub struct SshKeyResource<'a> {
    /// Private key path; the public key lives beside it with `.pub` appended.
    pub key: PathBuf,
    /// Comment embedded in the public key.
    pub email: String,
    /// Key algorithm.
    pub key_type: String,
    executor: &'a dyn Executor,
    prompter: &'a dyn Prompter,
}

impl<'a> SshKeyResource<'a> {
    /// Create a new SSH key resource.
    #[must_use]
    pub const fn new(
        key: PathBuf,
        email: String,
        key_type: String,
        executor: &'a dyn Executor,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            key,
            email,
            key_type,
            executor,
            prompter,
        }
    }

    /// Path of the public half.
    #[must_use]
    pub fn public_key(&self) -> PathBuf {
        let mut path = self.key.clone().into_os_string();
        path.push(".pub");
        PathBuf::from(path)
    }
}

impl fmt::Debug for SshKeyResource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshKeyResource")
            .field("key", &self.key)
            .field("email", &self.email)
            .field("key_type", &self.key_type)
            .finish_non_exhaustive()
    }
}

/// Comment field of an OpenSSH public key line (`<type> <base64> <comment>`).
fn public_key_comment(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    Ok(contents
        .split_whitespace()
        .skip(2)
        .collect::<Vec<_>>()
        .join(" "))
}

impl Applicable for SshKeyResource<'_> {
    fn description(&self) -> String {
        format!("ssh key {} ({})", self.key.display(), self.email)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let public = self.public_key();
        if self.key.exists() || public.exists() {
            let question = format!("Overwrite existing SSH key at {}?", self.key.display());
            if !self.prompter.confirm(&question, false)? {
                return Ok(ResourceChange::Skipped {
                    reason: format!("kept existing key at {}", self.key.display()),
                });
            }
            remove_existing(&self.key)?;
            remove_existing(&public)?;
        }

        ensure_parent_dir(&self.key)?;
        let key = self
            .key
            .to_str()
            .with_context(|| format!("non UTF-8 path: {}", self.key.display()))?;
        self.executor.run(
            "ssh-keygen",
            &["-q", "-t", &self.key_type, "-C", &self.email, "-f", key, "-N", ""],
        )?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for SshKeyResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let public = self.public_key();
        match (self.key.exists(), public.exists()) {
            (false, false) => Ok(ResourceState::Missing),
            (true, true) => {
                let comment = public_key_comment(&public)?;
                if comment == self.email {
                    Ok(ResourceState::Correct)
                } else {
                    Ok(ResourceState::Incorrect {
                        current: format!("key labelled '{comment}'"),
                    })
                }
            }
            _ => Ok(ResourceState::Incorrect {
                current: "incomplete key pair".to_string(),
            }),
        }
    }
}
