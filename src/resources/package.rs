//! Package installation resource.
use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Kind of package managed by a Homebrew-style package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Command-line package.
    Formula,
    /// GUI application.
    Cask,
}

impl PackageKind {
    const fn list_flag(self) -> &'static str {
        match self {
            Self::Formula => "--formula",
            Self::Cask => "--cask",
        }
    }
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Formula => write!(f, "formula"),
            Self::Cask => write!(f, "cask"),
        }
    }
}

/// A package that can be checked and installed.
#[derive(Debug)]
pub struct PackageResource<'a> {
    /// Package name.
    pub name: String,
    /// Formula or cask.
    pub kind: PackageKind,
    /// Package manager binary (e.g. `"brew"`).
    manager: String,
    executor: &'a dyn Executor,
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(
        name: String,
        kind: PackageKind,
        manager: String,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            name,
            kind,
            manager,
            executor,
        }
    }
}

impl Applicable for PackageResource<'_> {
    fn description(&self) -> String {
        format!("{} ({} {})", self.name, self.manager, self.kind)
    }

    fn apply(&self) -> Result<ResourceChange> {
        match self.kind {
            PackageKind::Formula => self.executor.run(&self.manager, &["install", &self.name])?,
            PackageKind::Cask => self
                .executor
                .run(&self.manager, &["install", "--cask", &self.name])?,
        };
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PackageResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let result = self
            .executor
            .run_unchecked(&self.manager, &["list", self.kind.list_flag(), &self.name])?;
        if result.success {
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

    fn package<'a>(name: &str, kind: PackageKind, executor: &'a MockExecutor) -> PackageResource<'a> {
        PackageResource::new(name.to_string(), kind, "brew".to_string(), executor)
    }

    #[test]
    fn description_includes_kind() {
        let executor = MockExecutor::ok("");
        assert_eq!(
            package("git", PackageKind::Formula, &executor).description(),
            "git (brew formula)"
        );
        assert_eq!(
            package("iterm2", PackageKind::Cask, &executor).description(),
            "iterm2 (brew cask)"
        );
    }

    // ------------------------------------------------------------------
    // current_state
    // ------------------------------------------------------------------

    #[test]
    fn current_state_correct_when_list_succeeds() {
        let executor = MockExecutor::ok("git\n");
        let resource = package("git", PackageKind::Formula, &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(executor.calls(), vec!["brew list --formula git"]);
    }

    #[test]
    fn current_state_missing_when_list_fails() {
        let executor = MockExecutor::fail();
        let resource = package("firefox", PackageKind::Cask, &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(executor.calls(), vec!["brew list --cask firefox"]);
    }

    // ------------------------------------------------------------------
    // apply
    // ------------------------------------------------------------------

    #[test]
    fn apply_formula_runs_install() {
        let executor = MockExecutor::ok("");
        let resource = package("fish", PackageKind::Formula, &executor);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(executor.calls(), vec!["brew install fish"]);
    }

    #[test]
    fn apply_cask_passes_cask_flag() {
        let executor = MockExecutor::ok("");
        let resource = package("iterm2", PackageKind::Cask, &executor);
        resource.apply().unwrap();
        assert_eq!(executor.calls(), vec!["brew install --cask iterm2"]);
    }

    #[test]
    fn apply_propagates_install_failure() {
        let executor = MockExecutor::fail();
        let resource = package("fish", PackageKind::Formula, &executor);
        assert!(resource.apply().is_err());
    }
}
