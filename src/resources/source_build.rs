//! Build-from-source resource.
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::git_clone::clone_repo;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// A tool built and installed from a git checkout.
///
/// Satisfied when the tool's binary is on PATH. Apply clones the repository
/// (or refreshes an existing checkout to `git_ref`), then runs the build and
/// install commands inside the checkout with the terminal attached.
#[derive(Debug)]
pub struct SourceBuildResource<'a> {
    /// Tool name, for display.
    pub name: String,
    /// Remote URL.
    pub repo: String,
    /// Branch or tag to build.
    pub git_ref: String,
    /// Binary that proves the tool is installed.
    pub binary: String,
    /// Checkout directory.
    pub checkout: PathBuf,
    /// Build command (program followed by arguments). Empty skips the build.
    pub build: Vec<String>,
    /// Install command (program followed by arguments). Empty skips install.
    pub install: Vec<String>,
    executor: &'a dyn Executor,
}

impl<'a> SourceBuildResource<'a> {
    /// Create a new source build resource.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        name: String,
        repo: String,
        git_ref: String,
        binary: String,
        checkout: PathBuf,
        build: Vec<String>,
        install: Vec<String>,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            name,
            repo,
            git_ref,
            binary,
            checkout,
            build,
            install,
            executor,
        }
    }

    /// Clone the repository, or move an existing checkout to `git_ref`.
    fn sync_checkout(&self) -> Result<()> {
        if self.checkout.join(".git").exists() {
            self.executor.run_in(
                &self.checkout,
                "git",
                &["fetch", "--depth", "1", "origin", &self.git_ref],
            )?;
            self.executor
                .run_in(&self.checkout, "git", &["checkout", "--force", "FETCH_HEAD"])?;
            Ok(())
        } else {
            clone_repo(
                self.executor,
                &self.repo,
                &self.checkout,
                Some(&self.git_ref),
                true,
            )
        }
    }

    /// Run one configured command inside the checkout.
    fn run_stage(&self, stage: &str, command: &[String]) -> Result<()> {
        let Some((program, args)) = command.split_first() else {
            return Ok(());
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.executor
            .run_interactive_in(&self.checkout, program, &args)
            .with_context(|| format!("{stage} step of {}", self.name))?;
        Ok(())
    }
}

impl Applicable for SourceBuildResource<'_> {
    fn description(&self) -> String {
        format!("{} from source ({})", self.name, self.git_ref)
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.sync_checkout()
            .with_context(|| format!("preparing {} checkout", self.name))?;
        self.run_stage("build", &self.build)?;
        self.run_stage("install", &self.install)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for SourceBuildResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.executor.which(&self.binary) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
