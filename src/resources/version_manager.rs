//! Version manager resources: plugins, runtime installs, global versions.
//!
//! Modelled on `asdf`: `plugin list`, `plugin add`, `list <plugin>`,
//! `install <plugin> <version>` and a `~/.tool-versions` file recording the
//! global selection.
use std::path::PathBuf;

use anyhow::Result;

use super::helpers::fs::file_has_line;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// A version manager plugin (e.g. `nodejs`).
#[derive(Debug)]
pub struct PluginResource<'a> {
    /// Version manager binary (e.g. `"asdf"`).
    pub manager: String,
    /// Plugin name.
    pub plugin: String,
    executor: &'a dyn Executor,
}

impl<'a> PluginResource<'a> {
    /// Create a new plugin resource.
    #[must_use]
    pub const fn new(manager: String, plugin: String, executor: &'a dyn Executor) -> Self {
        Self {
            manager,
            plugin,
            executor,
        }
    }
}

impl Applicable for PluginResource<'_> {
    fn description(&self) -> String {
        format!("{} plugin {}", self.manager, self.plugin)
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.executor
            .run(&self.manager, &["plugin", "add", &self.plugin])?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PluginResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let result = self.executor.run_unchecked(&self.manager, &["plugin", "list"])?;
        if result.success && result.stdout.lines().any(|l| l.trim() == self.plugin) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

/// One installed version of a runtime.
#[derive(Debug)]
pub struct RuntimeResource<'a> {
    /// Version manager binary.
    pub manager: String,
    /// Plugin providing the runtime.
    pub plugin: String,
    /// Version to install.
    pub version: String,
    executor: &'a dyn Executor,
}

impl<'a> RuntimeResource<'a> {
    /// Create a new runtime resource.
    #[must_use]
    pub const fn new(
        manager: String,
        plugin: String,
        version: String,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            manager,
            plugin,
            version,
            executor,
        }
    }
}

/// Whether `version` appears in `list` output, where the current selection
/// may be prefixed with `*`.
fn lists_version(output: &str, version: &str) -> bool {
    output
        .lines()
        .map(|l| l.trim().trim_start_matches('*').trim())
        .any(|l| l == version)
}

impl Applicable for RuntimeResource<'_> {
    fn description(&self) -> String {
        format!("{} {}", self.plugin, self.version)
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.executor
            .run(&self.manager, &["install", &self.plugin, &self.version])?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for RuntimeResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let result = self
            .executor
            .run_unchecked(&self.manager, &["list", &self.plugin])?;
        if result.success && lists_version(&result.stdout, &self.version) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

/// Global version selection recorded in `~/.tool-versions`.
#[derive(Debug)]
pub struct GlobalVersionResource<'a> {
    /// Version manager binary.
    pub manager: String,
    /// Arguments selecting the global scope (`["global"]`, or
    /// `["set", "--home"]` for newer asdf releases).
    pub global_args: Vec<String>,
    /// Plugin providing the runtime.
    pub plugin: String,
    /// Version to select.
    pub version: String,
    /// The `.tool-versions` file consulted by the check.
    pub tool_versions: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> GlobalVersionResource<'a> {
    /// Create a new global version resource.
    #[must_use]
    pub const fn new(
        manager: String,
        global_args: Vec<String>,
        plugin: String,
        version: String,
        tool_versions: PathBuf,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            manager,
            global_args,
            plugin,
            version,
            tool_versions,
            executor,
        }
    }

    fn expected_line(&self) -> String {
        format!("{} {}", self.plugin, self.version)
    }
}

impl Applicable for GlobalVersionResource<'_> {
    fn description(&self) -> String {
        format!("global {}", self.expected_line())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let mut args: Vec<&str> = self.global_args.iter().map(String::as_str).collect();
        args.push(&self.plugin);
        args.push(&self.version);
        self.executor.run(&self.manager, &args)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for GlobalVersionResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if file_has_line(&self.tool_versions, &self.expected_line())? {
            return Ok(ResourceState::Correct);
        }
        let contents = std::fs::read_to_string(&self.tool_versions).unwrap_or_default();
        let prefix = format!("{} ", self.plugin);
        Ok(contents
            .lines()
            .map(str::trim)
            .find(|l| l.starts_with(&prefix))
            .map_or(ResourceState::Missing, |l| ResourceState::Incorrect {
                current: l.to_string(),
            }))
    }
}
