//! Login shell resources: allowed-shells registration and default shell.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use super::helpers::fs::{file_has_line, lacks_trailing_newline};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;
use crate::platform::Platform;

/// Default location of the allowed login shells list.
pub const SHELLS_FILE: &str = "/etc/shells";

const APPEND: &str = r#"printf '%s\n' "$1" >> "$2""#;
const APPEND_AFTER_NEWLINE: &str = r#"printf '\n%s\n' "$1" >> "$2""#;

/// Registers a shell binary as an allowed login shell.
#[derive(Debug)]
pub struct ShellRegistrationResource<'a> {
    /// Absolute path of the shell binary.
    pub shell: PathBuf,
    /// Allowed-shells file (normally `/etc/shells`).
    pub shells_file: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> ShellRegistrationResource<'a> {
    /// Create a registration resource for `shell` against `/etc/shells`.
    #[must_use]
    pub fn new(shell: PathBuf, executor: &'a dyn Executor) -> Self {
        Self::with_shells_file(shell, PathBuf::from(SHELLS_FILE), executor)
    }

    /// Create a registration resource against an explicit shells file.
    #[must_use]
    pub const fn with_shells_file(
        shell: PathBuf,
        shells_file: PathBuf,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            shell,
            shells_file,
            executor,
        }
    }

    fn shell_str(&self) -> Result<&str> {
        self.shell
            .to_str()
            .with_context(|| format!("shell path is not UTF-8: {}", self.shell.display()))
    }
}

impl Applicable for ShellRegistrationResource<'_> {
    fn description(&self) -> String {
        format!(
            "register {} in {}",
            self.shell.display(),
            self.shells_file.display()
        )
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !self.shell.is_file() {
            bail!("shell binary not found: {}", self.shell.display());
        }
        let shell = self.shell_str()?;
        let file = self
            .shells_file
            .to_str()
            .with_context(|| format!("non UTF-8 path: {}", self.shells_file.display()))?;
        // An unterminated last entry gets its newline first
        let script = if lacks_trailing_newline(&self.shells_file) {
            APPEND_AFTER_NEWLINE
        } else {
            APPEND
        };
        // Arguments are passed positionally so the path is never re-parsed by the shell
        self.executor
            .run_interactive("sudo", &["sh", "-c", script, "sh", shell, file])?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ShellRegistrationResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if file_has_line(&self.shells_file, self.shell_str()?)? {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

/// Sets a shell as the current user's login shell.
#[derive(Debug)]
pub struct DefaultShellResource<'a> {
    /// Absolute path of the target shell.
    pub shell: PathBuf,
    /// Account whose login shell is changed.
    pub user: String,
    platform: Platform,
    executor: &'a dyn Executor,
}

impl<'a> DefaultShellResource<'a> {
    /// Create a new default shell resource.
    #[must_use]
    pub const fn new(
        shell: PathBuf,
        user: String,
        platform: Platform,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            shell,
            user,
            platform,
            executor,
        }
    }

    /// Query the account database for the user's login shell.
    fn login_shell(&self) -> Result<String> {
        if self.platform.is_macos() {
            let record = format!("/Users/{}", self.user);
            let result = self
                .executor
                .run("dscl", &[".", "-read", &record, "UserShell"])?;
            Ok(parse_dscl_shell(&result.stdout))
        } else {
            let result = self.executor.run("getent", &["passwd", &self.user])?;
            Ok(parse_passwd_shell(&result.stdout))
        }
    }
}

/// Extract the shell from `dscl` output (`UserShell: /bin/zsh`).
fn parse_dscl_shell(output: &str) -> String {
    output
        .lines()
        .find_map(|l| l.strip_prefix("UserShell:"))
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// Extract the shell (last field) from a `passwd` entry.
fn parse_passwd_shell(output: &str) -> String {
    output
        .lines()
        .next()
        .and_then(|l| l.rsplit(':').next())
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

impl Applicable for DefaultShellResource<'_> {
    fn description(&self) -> String {
        format!("default shell → {}", self.shell.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let shell = self
            .shell
            .to_str()
            .with_context(|| format!("shell path is not UTF-8: {}", self.shell.display()))?;
        // chsh asks for the account password
        self.executor.run_interactive("chsh", &["-s", shell])?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DefaultShellResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let current = self.login_shell()?;
        if current.is_empty() {
            Ok(ResourceState::Missing)
        } else if Path::new(&current) == self.shell {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect { current })
        }
    }
}
