//! Domain-specific error types for the provisioning engine.
//!
//! Internal modules return typed errors ([`ConfigError`], [`StepError`])
//! while the CLI boundary converts them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! ProvisionError
//! ├── Config(ConfigError): config file, plan validation, step filters
//! └── Step(StepError): a fatal step failed and aborted the run
//! ```
//!
//! Non-fatal step failures and check errors are not errors at this level:
//! the engine turns them into outcome records.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a provisioning run.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Configuration or plan error, raised before any step runs.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A fatal step failed and the run was aborted.
    #[error("Provisioning aborted: {0}")]
    Step(#[from] StepError),
}

/// Errors raised before any step executes.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No configuration file could be located.
    #[error(
        "no configuration file found (searched: {searched}); use --config or set PROVISION_CONFIG"
    )]
    NotFound {
        /// Human-readable list of the locations that were tried.
        searched: String,
    },

    /// The configuration file could not be read.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the expected schema.
    #[error("Invalid config {path}: {message}")]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A dotfiles link set was selected but never defined.
    #[error("Unknown dotfiles link set '{0}'")]
    UnknownLinkSet(String),

    /// A `[[config_lines]]` entry holds more than one line.
    #[error("Config line for {path} spans multiple lines")]
    MultiLineConfigLine {
        /// Target file of the offending entry.
        path: String,
    },

    /// The plan to run contains no steps.
    #[error("No steps to run")]
    EmptyPlan,

    /// A step lacks a required capability.
    #[error("Step '{step}' has no {capability} capability")]
    MissingCapability {
        /// Name of the malformed step.
        step: String,
        /// The missing capability (`check` or `apply`).
        capability: &'static str,
    },

    /// Two steps share a name.
    #[error("Duplicate step name '{0}'")]
    DuplicateStep(String),
}

/// Terminal failure of a provisioning run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    /// A step marked fatal failed to apply.
    #[error("Step {position} '{step}' failed: {reason}")]
    Fatal {
        /// One-based position of the step in the run.
        position: usize,
        /// Name of the step that failed.
        step: String,
        /// Diagnostic from the failed apply.
        reason: String,
    },
}
