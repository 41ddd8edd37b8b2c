//! Per-step outcomes and the overall run result.
use std::fmt;

use crate::error::StepError;

/// Outcome classification of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepStatus {
    /// The check reported not satisfied and apply succeeded.
    Applied,
    /// The check reported satisfied, or apply deliberately did nothing.
    Skipped,
    /// Dry-run: the check reported not satisfied, apply was suppressed.
    WouldApply,
    /// A non-fatal step's apply failed; the run continued.
    FailedNonFatal,
    /// A fatal step's apply failed; the run stopped here.
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Applied => "applied",
            Self::Skipped => "skipped",
            Self::WouldApply => "would apply",
            Self::FailedNonFatal => "failed (non-fatal)",
            Self::Failed => "failed",
        })
    }
}

/// Recorded result of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// 1-based position of the step in the plan.
    pub position: usize,
    /// Step name.
    pub name: String,
    /// Outcome classification.
    pub status: StepStatus,
    /// Optional diagnostic (failure reason, skip reason).
    pub message: Option<String>,
}

/// Result of a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Outcomes in declaration order. Steps after a fatal failure have none.
    pub outcomes: Vec<StepOutcome>,
    /// True unless a fatal step failed.
    pub completed: bool,
    /// 1-based position of the fatal step that terminated the run.
    pub fatal_position: Option<usize>,
    /// The terminal error, when a fatal step failed.
    pub failure: Option<StepError>,
    /// Whether the run was a dry run.
    pub dry_run: bool,
}

impl RunResult {
    /// Number of outcomes with `status`.
    #[must_use]
    pub fn count(&self, status: StepStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Number of non-fatal failures.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(StepStatus::FailedNonFatal)
    }

    /// Statuses in declaration order.
    #[must_use]
    pub fn statuses(&self) -> Vec<StepStatus> {
        self.outcomes.iter().map(|o| o.status).collect()
    }

    /// Convert into a `Result`, yielding the terminal error on a fatal failure.
    ///
    /// # Errors
    ///
    /// Returns the [`StepError`] recorded for the fatal step.
    pub fn into_result(self) -> Result<Self, StepError> {
        match self.failure.clone() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn outcome(position: usize, status: StepStatus) -> StepOutcome {
        StepOutcome {
            position,
            name: format!("step {position}"),
            status,
            message: None,
        }
    }

    fn result(outcomes: Vec<StepOutcome>) -> RunResult {
        RunResult {
            outcomes,
            completed: true,
            fatal_position: None,
            failure: None,
            dry_run: false,
        }
    }

    #[test]
    fn counts_by_status() {
        let r = result(vec![
            outcome(1, StepStatus::Skipped),
            outcome(2, StepStatus::FailedNonFatal),
            outcome(3, StepStatus::FailedNonFatal),
            outcome(4, StepStatus::Applied),
        ]);
        assert_eq!(r.count(StepStatus::Skipped), 1);
        assert_eq!(r.count(StepStatus::Failed), 0);
        assert_eq!(r.warning_count(), 2);
        assert_eq!(
            r.statuses(),
            vec![
                StepStatus::Skipped,
                StepStatus::FailedNonFatal,
                StepStatus::FailedNonFatal,
                StepStatus::Applied
            ]
        );
    }

    #[test]
    fn into_result_surfaces_fatal_error() {
        let mut r = result(vec![outcome(1, StepStatus::Failed)]);
        r.completed = false;
        r.fatal_position = Some(1);
        r.failure = Some(StepError::Fatal {
            position: 1,
            step: "step 1".to_string(),
            reason: "boom".to_string(),
        });
        let err = r.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Step 1 'step 1' failed: boom");
    }

    #[test]
    fn into_result_passes_completed_runs() {
        let r = result(vec![outcome(1, StepStatus::Applied)]);
        assert!(r.into_result().is_ok());
    }

    #[test]
    fn status_display() {
        assert_eq!(StepStatus::WouldApply.to_string(), "would apply");
        assert_eq!(StepStatus::FailedNonFatal.to_string(), "failed (non-fatal)");
    }
}
