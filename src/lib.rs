//! Idempotent machine provisioning engine.
//!
//! Bootstraps a fresh machine from one TOML file: package manager, packages,
//! login shell, runtimes, a tool built from source, dotfiles, SSH key. Every
//! step is checked against the live system first and applied only when the
//! goal state does not already hold, so a second run changes nothing.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: locate, parse and validate `provision.toml`
//! - **[`resources`]**: idempotent `check + apply` primitives
//! - **[`plan`]**: turn a configuration into an ordered list of steps
//! - **[`engine`]**: run steps in order with dry-run and fatal handling
//! - **[`commands`]**: the command orchestration used by the binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod plan;
pub mod prompt;
pub mod resources;
