//! Symlink resources: single links and named link sets.
use anyhow::{Context as _, Result, bail};
use std::path::{Path, PathBuf};

use super::helpers::fs::{ensure_parent_dir, move_aside, remove_existing};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A symlink resource that can be checked and applied.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    fn target_is_real_dir(&self) -> bool {
        self.target
            .symlink_metadata()
            .is_ok_and(|m| m.is_dir() && !m.is_symlink())
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !self.source.exists() {
            bail!("source does not exist: {}", self.source.display());
        }
        if self.target_is_real_dir() {
            bail!(
                "{} is a real directory; refusing to replace it",
                self.target.display()
            );
        }

        ensure_parent_dir(&self.target)?;

        match self.target.symlink_metadata() {
            Ok(meta) if meta.is_symlink() => remove_existing(&self.target)?,
            Ok(_) => {
                move_aside(&self.target)?;
            }
            Err(_) => {}
        }

        create_symlink(&self.source, &self.target)
            .with_context(|| format!("create link: {}", self.target.display()))?;

        Ok(ResourceChange::Applied)
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        if self.target_is_real_dir() {
            return Ok(ResourceState::Incorrect {
                current: "target is a real directory".to_string(),
            });
        }

        std::fs::read_link(&self.target).map_or_else(
            |_| {
                if self.target.exists() {
                    Ok(ResourceState::Incorrect {
                        current: "target is a regular file".to_string(),
                    })
                } else {
                    Ok(ResourceState::Missing)
                }
            },
            |existing| {
                if existing == self.source {
                    Ok(ResourceState::Correct)
                } else {
                    Ok(ResourceState::Incorrect {
                        current: format!("points to {}", existing.display()),
                    })
                }
            },
        )
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).with_context(|| {
            format!(
                "failed to create symlink {} -> {}",
                link.display(),
                target.display()
            )
        })
    }
    #[cfg(not(unix))]
    {
        bail!(
            "symlinks are only supported on Unix hosts: {} -> {}",
            link.display(),
            target.display()
        )
    }
}

/// A named set of symlinks applied as one unit.
///
/// Satisfied when every link points at its source. Apply fixes each link
/// that is not correct and fails if any of them could not be fixed.
#[derive(Debug, Clone)]
pub struct LinkSetResource {
    /// Set name (e.g. `"base"`).
    pub name: String,
    /// Links in the set.
    pub links: Vec<SymlinkResource>,
}

impl LinkSetResource {
    /// Create a new link set.
    #[must_use]
    pub const fn new(name: String, links: Vec<SymlinkResource>) -> Self {
        Self { name, links }
    }
}

impl Applicable for LinkSetResource {
    fn description(&self) -> String {
        format!("link set {} ({} links)", self.name, self.links.len())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let mut changed = 0;
        let mut failures = Vec::new();
        for link in &self.links {
            if matches!(link.current_state(), Ok(ResourceState::Correct)) {
                continue;
            }
            match link.apply() {
                Ok(_) => changed += 1,
                Err(e) => failures.push(format!("{}: {e:#}", link.target.display())),
            }
        }
        if !failures.is_empty() {
            bail!(
                "{} of {} links in set '{}' failed: {}",
                failures.len(),
                self.links.len(),
                self.name,
                failures.join("; ")
            );
        }
        if changed == 0 {
            Ok(ResourceChange::AlreadyCorrect)
        } else {
            Ok(ResourceChange::Applied)
        }
    }
}

impl Resource for LinkSetResource {
    fn current_state(&self) -> Result<ResourceState> {
        let mut missing = 0;
        let mut incorrect = 0;
        for link in &self.links {
            match link.current_state()? {
                ResourceState::Correct => {}
                ResourceState::Missing => missing += 1,
                ResourceState::Incorrect { .. } => incorrect += 1,
            }
        }
        Ok(match (missing, incorrect) {
            (0, 0) => ResourceState::Correct,
            (m, 0) if m == self.links.len() => ResourceState::Missing,
            (m, i) => ResourceState::Incorrect {
                current: format!("{m} missing, {i} wrong of {} links", self.links.len()),
            },
        })
    }
}
