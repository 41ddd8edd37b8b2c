//! Declarative provisioning steps.
use std::fmt;
use std::rc::Rc;

use anyhow::{Result, anyhow};

use crate::resources::{Resource, ResourceChange, ResourceState};

/// Capability that reports the live state of a step's goal. Must not mutate.
pub type CheckFn<'a> = Box<dyn Fn() -> Result<ResourceState> + 'a>;

/// Capability that performs a step's mutation.
pub type ApplyFn<'a> = Box<dyn Fn() -> Result<ResourceChange> + 'a>;

/// One declarative unit of provisioning work.
///
/// A step is satisfied exactly when its check reports
/// [`ResourceState::Correct`]. Steps are built with a consuming builder:
///
/// ```
/// use provision_cli::engine::Step;
/// use provision_cli::resources::{ResourceChange, ResourceState};
///
/// let step = Step::new("Install fish")
///     .fatal(true)
///     .with_check(|| Ok(ResourceState::Missing))
///     .with_apply(|| Ok(ResourceChange::Applied));
///
/// assert_eq!(step.name(), "Install fish");
/// assert!(step.is_fatal());
/// ```
pub struct Step<'a> {
    name: String,
    description: Option<String>,
    fatal: bool,
    check: Option<CheckFn<'a>>,
    apply: Option<ApplyFn<'a>>,
}

impl<'a> Step<'a> {
    /// Create a non-fatal step with no capabilities attached yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fatal: false,
            check: None,
            apply: None,
        }
    }

    /// Build a step whose check and apply delegate to `resource`.
    #[must_use]
    pub fn from_resource<R: Resource + 'a>(name: impl Into<String>, resource: R) -> Self {
        let description = resource.description();
        let resource = Rc::new(resource);
        let checked = Rc::clone(&resource);
        Self::new(name)
            .with_description(description)
            .with_check(move || checked.current_state())
            .with_apply(move || resource.apply())
    }

    /// Set whether a failure of this step aborts the run.
    #[must_use]
    pub const fn fatal(mut self, fatal: bool) -> Self {
        self.fatal = fatal;
        self
    }

    /// Describe what the step manages (e.g. `git (brew formula)`).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach the check capability.
    #[must_use]
    pub fn with_check(mut self, check: impl Fn() -> Result<ResourceState> + 'a) -> Self {
        self.check = Some(Box::new(check));
        self
    }

    /// Attach the apply capability.
    #[must_use]
    pub fn with_apply(mut self, apply: impl Fn() -> Result<ResourceChange> + 'a) -> Self {
        self.apply = Some(Box::new(apply));
        self
    }

    /// Human-readable step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the step manages, when known.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether a failure of this step aborts the run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// Name of the first capability this step lacks, if any.
    pub(super) const fn missing_capability(&self) -> Option<&'static str> {
        if self.check.is_none() {
            Some("check")
        } else if self.apply.is_none() {
            Some("apply")
        } else {
            None
        }
    }

    /// Query the live state of the step's goal.
    pub(super) fn check(&self) -> Result<ResourceState> {
        let check = self
            .check
            .as_ref()
            .ok_or_else(|| anyhow!("step '{}' has no check capability", self.name))?;
        check()
    }

    /// Perform the step's mutation.
    pub(super) fn apply(&self) -> Result<ResourceChange> {
        let apply = self
            .apply
            .as_ref()
            .ok_or_else(|| anyhow!("step '{}' has no apply capability", self.name))?;
        apply()
    }
}

impl fmt::Debug for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("fatal", &self.fatal)
            .field("check", &self.check.as_ref().map(|_| "<fn>"))
            .field("apply", &self.apply.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::Applicable;
    use std::cell::Cell;

    #[derive(Debug)]
    struct CountingResource<'c> {
        state: ResourceState,
        applied: &'c Cell<u32>,
    }

    impl Applicable for CountingResource<'_> {
        fn description(&self) -> String {
            "counting".to_string()
        }

        fn apply(&self) -> Result<ResourceChange> {
            self.applied.set(self.applied.get() + 1);
            Ok(ResourceChange::Applied)
        }
    }

    impl Resource for CountingResource<'_> {
        fn current_state(&self) -> Result<ResourceState> {
            Ok(self.state.clone())
        }
    }

    #[test]
    fn new_step_is_non_fatal_and_incomplete() {
        let step = Step::new("bare");
        assert!(!step.is_fatal());
        assert_eq!(step.description(), None);
        assert_eq!(step.missing_capability(), Some("check"));
    }

    #[test]
    fn missing_apply_is_reported() {
        let step = Step::new("no apply").with_check(|| Ok(ResourceState::Correct));
        assert_eq!(step.missing_capability(), Some("apply"));
        assert!(step.apply().is_err());
    }

    #[test]
    fn from_resource_delegates_both_capabilities() {
        let applied = Cell::new(0);
        let step = Step::from_resource(
            "counting",
            CountingResource {
                state: ResourceState::Missing,
                applied: &applied,
            },
        );
        assert_eq!(step.missing_capability(), None);
        assert_eq!(step.description(), Some("counting"));
        assert_eq!(step.check().unwrap(), ResourceState::Missing);
        assert_eq!(step.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(applied.get(), 1);
    }

    #[test]
    fn debug_hides_closures() {
        let step = Step::new("dbg").with_check(|| Ok(ResourceState::Correct));
        let rendered = format!("{step:?}");
        assert!(rendered.contains("\"dbg\""));
        assert!(rendered.contains("<fn>"));
    }
}
