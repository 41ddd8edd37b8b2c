//! Command execution behind an injectable [`Executor`] trait.
use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output};

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard output (empty for interactive runs).
    pub stdout: String,
    /// Captured standard error (empty for interactive runs).
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

impl From<ExitStatus> for ExecResult {
    fn from(status: ExitStatus) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Abstraction over running external programs.
///
/// Resources receive a `&dyn Executor` so tests can substitute a mock and
/// never touch the host.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command, capturing output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command in `dir`, capturing output. Fails on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command, capturing output, without failing on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command attached to the terminal (for installers that prompt
    /// for a password or confirmation). Blocks until the program exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Like [`run_interactive`](Self::run_interactive), in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_interactive_in(&self, dir: &Path, program: &str, args: &[&str])
    -> Result<ExecResult>;

    /// Check if a program is available on the search path.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that spawns real processes.
///
/// Directories passed to [`with_search_paths`](Self::with_search_paths) are
/// prepended to `PATH` for both program lookup and the child environment,
/// so a package manager installed mid-run is found by later steps.
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    search_path: Option<OsString>,
}

impl SystemExecutor {
    /// Create an executor that uses the inherited `PATH` unchanged.
    #[must_use]
    pub const fn new() -> Self {
        Self { search_path: None }
    }

    /// Create an executor with `dirs` prepended to the inherited `PATH`.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory contains the platform path separator.
    pub fn with_search_paths(dirs: &[PathBuf]) -> Result<Self> {
        if dirs.is_empty() {
            return Ok(Self::new());
        }
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let joined = std::env::join_paths(
            dirs.iter()
                .cloned()
                .chain(std::env::split_paths(&inherited)),
        )
        .context("invalid search path entry")?;
        Ok(Self {
            search_path: Some(joined),
        })
    }

    fn command(&self, program: &str) -> Command {
        let Some(path) = &self.search_path else {
            return Command::new(program);
        };
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let resolved = which::which_in(program, Some(path), cwd)
            .unwrap_or_else(|_| PathBuf::from(program));
        let mut cmd = Command::new(resolved);
        cmd.env("PATH", path);
        cmd
    }
}

/// Execute a command and return the result, bailing on non-zero exit.
fn execute_checked(mut cmd: Command, label: &str) -> Result<ExecResult> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to execute: {label}"))?;
    let result = ExecResult::from(output);
    if !result.success {
        bail!(
            "{label} failed (exit {}): {}",
            result.code.unwrap_or(-1),
            result.stderr.trim()
        );
    }
    Ok(result)
}

/// Execute a command with inherited stdio, bailing on non-zero exit.
fn execute_interactive(mut cmd: Command, label: &str) -> Result<ExecResult> {
    let status = cmd
        .status()
        .with_context(|| format!("failed to execute: {label}"))?;
    let result = ExecResult::from(status);
    if !result.success {
        bail!("{label} failed (exit {})", result.code.unwrap_or(-1));
    }
    Ok(result)
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = self.command(program);
        cmd.args(args);
        execute_checked(cmd, program)
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = self.command(program);
        cmd.args(args).current_dir(dir);
        execute_checked(cmd, &format!("{program} in {}", dir.display()))
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = self
            .command(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = self.command(program);
        cmd.args(args);
        execute_interactive(cmd, program)
    }

    fn run_interactive_in(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<ExecResult> {
        let mut cmd = self.command(program);
        cmd.args(args).current_dir(dir);
        execute_interactive(cmd, &format!("{program} in {}", dir.display()))
    }

    fn which(&self, program: &str) -> bool {
        match &self.search_path {
            Some(path) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(program, Some(path), cwd).is_ok()
            }
            None => which::which(program).is_ok(),
        }
    }
}
