//! Package manager bootstrap resource.
use anyhow::{Context as _, Result};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// The package manager itself, installed by a shell script.
///
/// Satisfied when `binary` resolves on the executor's search path. The
/// install script runs through `/bin/bash -c` with the terminal attached,
/// since installers commonly ask for a password or a confirmation.
#[derive(Debug)]
pub struct PackageManagerResource<'a> {
    /// Display name (e.g. `"Homebrew"`).
    pub name: String,
    /// Binary that proves the manager is installed (e.g. `"brew"`).
    pub binary: String,
    /// Shell snippet that installs the manager.
    pub install_script: String,
    executor: &'a dyn Executor,
}

impl<'a> PackageManagerResource<'a> {
    /// Create a new package manager resource.
    #[must_use]
    pub const fn new(
        name: String,
        binary: String,
        install_script: String,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            name,
            binary,
            install_script,
            executor,
        }
    }
}

impl Applicable for PackageManagerResource<'_> {
    fn description(&self) -> String {
        format!("{} ({})", self.name, self.binary)
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.executor
            .run_interactive("/bin/bash", &["-c", &self.install_script])
            .with_context(|| format!("installing {}", self.name))?;
        if !self.executor.which(&self.binary) {
            anyhow::bail!(
                "{} installer finished but '{}' is still not on PATH",
                self.name,
                self.binary
            );
        }
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PackageManagerResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.executor.which(&self.binary) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;

    fn brew(executor: &dyn Executor) -> PackageManagerResource<'_> {
        PackageManagerResource::new(
            "Homebrew".to_string(),
            "brew".to_string(),
            "echo install".to_string(),
            executor,
        )
    }

    #[test]
    fn description_names_binary() {
        let executor = MockExecutor::ok("");
        assert_eq!(brew(&executor).description(), "Homebrew (brew)");
    }

    #[test]
    fn correct_when_binary_found() {
        let executor = MockExecutor::ok("").with_which(true);
        assert_eq!(brew(&executor).current_state().unwrap(), ResourceState::Correct);
        assert_eq!(executor.call_count(), 0, "check must not run commands");
    }

    #[test]
    fn missing_when_binary_absent() {
        let executor = MockExecutor::ok("");
        assert_eq!(brew(&executor).current_state().unwrap(), ResourceState::Missing);
    }

    #[test]
    fn apply_runs_script_through_bash() {
        let executor = MockExecutor::ok("").with_which(true);
        assert_eq!(brew(&executor).apply().unwrap(), ResourceChange::Applied);
        assert_eq!(executor.calls(), vec!["/bin/bash -c echo install"]);
    }

    #[test]
    fn apply_fails_when_binary_still_missing() {
        let executor = MockExecutor::ok("");
        let err = brew(&executor).apply().unwrap_err();
        assert!(err.to_string().contains("still not on PATH"), "{err}");
    }

    #[test]
    fn apply_propagates_script_failure() {
        let executor = MockExecutor::fail();
        let err = brew(&executor).apply().unwrap_err();
        assert!(format!("{err:#}").contains("installing Homebrew"));
    }
}
