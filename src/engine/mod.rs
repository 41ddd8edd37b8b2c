//! Idempotent step runner.
//!
//! [`run`] validates a plan, then executes its steps strictly in declaration
//! order: check, then apply only when the check reports the goal is not yet
//! met and the run is not a dry run. Step-level errors become
//! [`StepOutcome`] records; only configuration errors leave `run` as an
//! `Err`, and a fatal step failure is reported through
//! [`RunResult::failure`].
mod result;
mod step;

use std::collections::HashSet;

pub use result::{RunResult, StepOutcome, StepStatus};
pub use step::{ApplyFn, CheckFn, Step};

use crate::error::{ConfigError, StepError};
use crate::logging::Log;
use crate::resources::{ResourceChange, ResourceState};

/// Options for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Perform checks and reporting only; never invoke apply.
    pub dry_run: bool,
}

/// Reject empty plans, steps without both capabilities, and duplicate names.
///
/// # Errors
///
/// Returns the first [`ConfigError`] found, in declaration order.
pub fn validate(steps: &[Step<'_>]) -> Result<(), ConfigError> {
    if steps.is_empty() {
        return Err(ConfigError::EmptyPlan);
    }
    let mut seen = HashSet::new();
    for step in steps {
        if let Some(capability) = step.missing_capability() {
            return Err(ConfigError::MissingCapability {
                step: step.name().to_string(),
                capability,
            });
        }
        if !seen.insert(step.name()) {
            return Err(ConfigError::DuplicateStep(step.name().to_string()));
        }
    }
    Ok(())
}

/// Execute `steps` in order and collect one outcome per evaluated step.
///
/// A fatal failure stops the run: later steps are never checked and the
/// result carries `completed = false` plus the terminal [`StepError`].
///
/// # Errors
///
/// Returns a [`ConfigError`] when validation fails; no step is touched in
/// that case.
pub fn run(
    steps: &[Step<'_>],
    opts: &RunOptions,
    log: &dyn Log,
) -> Result<RunResult, ConfigError> {
    validate(steps)?;

    let total = steps.len();
    log.stage(&format!("run start: {total} steps"));

    let mut result = RunResult {
        outcomes: Vec::with_capacity(total),
        completed: true,
        fatal_position: None,
        failure: None,
        dry_run: opts.dry_run,
    };

    for (idx, step) in steps.iter().enumerate() {
        let position = idx + 1;
        let outcome = run_step(step, position, total, opts, log);
        let failed = outcome.status == StepStatus::Failed;
        let reason = outcome.message.clone().unwrap_or_default();
        result.outcomes.push(outcome);
        if failed {
            result.completed = false;
            result.fatal_position = Some(position);
            result.failure = Some(StepError::Fatal {
                position,
                step: step.name().to_string(),
                reason,
            });
            break;
        }
    }

    match result.fatal_position {
        Some(position) => log.stage(&format!("run end: aborted at step {position}/{total}")),
        None => log.stage(&format!(
            "run end: {} applied, {} skipped, {} would apply, {} failed (non-fatal)",
            result.count(StepStatus::Applied),
            result.count(StepStatus::Skipped),
            result.count(StepStatus::WouldApply),
            result.warning_count(),
        )),
    }

    Ok(result)
}

/// Check and, when needed, apply one step.
fn run_step(
    step: &Step<'_>,
    position: usize,
    total: usize,
    opts: &RunOptions,
    log: &dyn Log,
) -> StepOutcome {
    let name = step.name();
    let tag = format!("[{position}/{total}] {name}");
    let outcome = |status, message: Option<String>| StepOutcome {
        position,
        name: name.to_string(),
        status,
        message,
    };

    if let Some(description) = step.description() {
        log.debug(&format!("{tag}: checking {description}"));
    }

    let state = match step.check() {
        Ok(state) => state,
        Err(e) => {
            log.warn(&format!(
                "{tag}: check failed ({e:#}); treating as not satisfied"
            ));
            ResourceState::Missing
        }
    };

    let current = match state {
        ResourceState::Correct => {
            log.info(&format!("{tag}: already satisfied, skipped"));
            return outcome(StepStatus::Skipped, None);
        }
        ResourceState::Missing => None,
        ResourceState::Incorrect { current } => Some(current),
    };

    if opts.dry_run {
        let msg = current.map_or_else(
            || format!("{tag}: would apply"),
            |current| format!("{tag}: would apply (currently {current})"),
        );
        log.dry_run(&msg);
        return outcome(StepStatus::WouldApply, None);
    }

    log.debug(&format!("{tag}: applying"));
    match step.apply() {
        Ok(ResourceChange::Applied) => {
            log.info(&format!("{tag}: applied"));
            outcome(StepStatus::Applied, None)
        }
        Ok(ResourceChange::AlreadyCorrect) => {
            log.info(&format!("{tag}: already satisfied, skipped"));
            outcome(StepStatus::Skipped, None)
        }
        Ok(ResourceChange::Skipped { reason }) => {
            log.info(&format!("{tag}: skipped ({reason})"));
            outcome(StepStatus::Skipped, Some(reason))
        }
        Err(e) if step.is_fatal() => {
            let reason = format!("{e:#}");
            log.error(&format!("{tag}: failed: {reason}"));
            outcome(StepStatus::Failed, Some(reason))
        }
        Err(e) => {
            let reason = format!("{e:#}");
            log.warn(&format!("{tag}: failed (non-fatal), continuing: {reason}"));
            outcome(StepStatus::FailedNonFatal, Some(reason))
        }
    }
}
