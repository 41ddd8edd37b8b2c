//! Git checkout resource.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use super::helpers::fs::ensure_parent_dir;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Clone `repo` into `dest`, optionally shallow and at a branch or tag.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or `git clone`
/// fails.
pub fn clone_repo(
    executor: &dyn Executor,
    repo: &str,
    dest: &Path,
    git_ref: Option<&str>,
    shallow: bool,
) -> Result<()> {
    ensure_parent_dir(dest)?;
    let dest_str = dest
        .to_str()
        .with_context(|| format!("non UTF-8 path: {}", dest.display()))?;
    let mut args = vec!["clone"];
    if shallow {
        args.extend(["--depth", "1"]);
    }
    if let Some(git_ref) = git_ref {
        args.extend(["--branch", git_ref]);
    }
    args.extend([repo, dest_str]);
    executor
        .run("git", &args)
        .with_context(|| format!("cloning {repo}"))?;
    Ok(())
}

/// Whether `dir` exists and has at least one entry.
fn is_non_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_some())
}

/// A repository checked out at a local path.
#[derive(Debug)]
pub struct GitCloneResource<'a> {
    /// Remote URL.
    pub repo: String,
    /// Checkout directory.
    pub dest: PathBuf,
    /// Optional branch or tag to clone.
    pub git_ref: Option<String>,
    executor: &'a dyn Executor,
}

impl<'a> GitCloneResource<'a> {
    /// Create a new clone resource.
    #[must_use]
    pub const fn new(
        repo: String,
        dest: PathBuf,
        git_ref: Option<String>,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            repo,
            dest,
            git_ref,
            executor,
        }
    }
}

impl Applicable for GitCloneResource<'_> {
    fn description(&self) -> String {
        format!("{} -> {}", self.repo, self.dest.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.dest.join(".git").exists() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        if is_non_empty_dir(&self.dest) {
            bail!(
                "{} exists and is not a git checkout; refusing to clone over it",
                self.dest.display()
            );
        }
        clone_repo(
            self.executor,
            &self.repo,
            &self.dest,
            self.git_ref.as_deref(),
            false,
        )?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for GitCloneResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.dest.join(".git").exists() {
            Ok(ResourceState::Correct)
        } else if self.dest.symlink_metadata().is_ok() {
            Ok(ResourceState::Incorrect {
                current: "exists without .git".to_string(),
            })
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
