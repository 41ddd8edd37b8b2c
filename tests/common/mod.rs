// Shared helpers for integration tests.
//
// Provides a simulated host whose state is a set of satisfied goals, steps
// bound to it, and a log that records every line, so engine properties can
// be exercised without touching the real machine.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashSet};

use anyhow::bail;
use provision_cli::engine::Step;
use provision_cli::logging::Log;
use provision_cli::resources::{ResourceChange, ResourceState};

/// In-memory machine state: the goals that currently hold, plus the goals
/// whose apply is rigged to fail.
#[derive(Debug, Default)]
pub struct SimulatedHost {
    satisfied: RefCell<HashSet<String>>,
    broken: RefCell<HashSet<String>>,
    applies: Cell<usize>,
    applied: RefCell<Vec<String>>,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `goal` as already satisfied.
    pub fn satisfy(&self, goal: &str) -> &Self {
        self.satisfied.borrow_mut().insert(goal.to_string());
        self
    }

    /// Make every apply of `goal` fail.
    pub fn break_goal(&self, goal: &str) -> &Self {
        self.broken.borrow_mut().insert(goal.to_string());
        self
    }

    pub fn is_satisfied(&self, goal: &str) -> bool {
        self.satisfied.borrow().contains(goal)
    }

    /// Sorted snapshot of the satisfied goals.
    pub fn state(&self) -> BTreeSet<String> {
        self.satisfied.borrow().iter().cloned().collect()
    }

    /// Total number of apply invocations.
    pub fn apply_count(&self) -> usize {
        self.applies.get()
    }

    /// Goals applied, in invocation order.
    pub fn applied(&self) -> Vec<String> {
        self.applied.borrow().clone()
    }

    /// A step whose goal is `name` on this host.
    pub fn step(&self, name: &str, fatal: bool) -> Step<'_> {
        let check_goal = name.to_string();
        let apply_goal = name.to_string();
        Step::new(name)
            .fatal(fatal)
            .with_check(move || {
                Ok(if self.is_satisfied(&check_goal) {
                    ResourceState::Correct
                } else {
                    ResourceState::Missing
                })
            })
            .with_apply(move || {
                self.applies.set(self.applies.get() + 1);
                self.applied.borrow_mut().push(apply_goal.clone());
                if self.broken.borrow().contains(&apply_goal) {
                    bail!("{apply_goal} installer exited with status 1");
                }
                self.satisfied.borrow_mut().insert(apply_goal.clone());
                Ok(ResourceChange::Applied)
            })
    }
}

/// A [`Log`] that keeps every line as `"<level> <message>"`.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: RefCell<Vec<String>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Whether any line at `level` contains `needle`.
    pub fn contains(&self, level: &str, needle: &str) -> bool {
        self.lines
            .borrow()
            .iter()
            .any(|l| l.starts_with(level) && l.contains(needle))
    }

    fn push(&self, level: &str, msg: &str) {
        self.lines.borrow_mut().push(format!("{level} {msg}"));
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
}
