//! Idempotent resource primitives (check + apply pattern).
//!
//! Each resource wraps one external collaborator: it can report the live
//! state of its goal without side effects, and apply the change that makes
//! the goal hold. [`Step::from_resource`](crate::engine::Step::from_resource)
//! adapts a resource into an engine step.
pub mod config_line;
pub mod git_clone;
pub mod helpers;
pub mod package;
pub mod package_manager;
pub mod shell;
pub mod source_build;
pub mod ssh_key;
pub mod symlink;
pub mod version_manager;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// This method should:
    /// - Create parent directories if needed
    /// - Update the resource to match the desired state
    /// - Return the appropriate `ResourceChange` result
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be made: a command exits
    /// non-zero, an I/O operation fails, or the host is in a state the
    /// resource refuses to touch.
    fn apply(&self) -> Result<ResourceChange>;
}

/// Live state of a resource's goal.
///
/// # Examples
///
/// ```
/// use provision_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "/bin/zsh".into() };
///
/// assert_ne!(missing, correct);
/// assert_ne!(wrong, correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use provision_cli::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
/// let declined = ResourceChange::Skipped { reason: "kept existing key".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// assert_ne!(noop, declined);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Apply deliberately did nothing (e.g. the operator declined a prompt).
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
///
/// `current_state` must be a pure query: it is called in dry-run mode and
/// may be called again after `apply`.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined (I/O failure, a
    /// query command that cannot be spawned). The engine treats this as
    /// "not satisfied".
    fn current_state(&self) -> Result<ResourceState>;
}
