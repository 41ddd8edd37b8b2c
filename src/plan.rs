//! Turn a [`Config`] into the ordered step list the engine runs.
//!
//! Order: package manager, formulae, login shell, config lines, runtimes,
//! source build, casks, dotfiles, SSH key. Each section's `fatal` setting
//! overrides its default.
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::engine::Step;
use crate::exec::Executor;
use crate::platform::Platform;
use crate::prompt::Prompter;
use crate::resources::config_line::ConfigLineResource;
use crate::resources::git_clone::GitCloneResource;
use crate::resources::helpers::fs::expand_home;
use crate::resources::package::{PackageKind, PackageResource};
use crate::resources::package_manager::PackageManagerResource;
use crate::resources::shell::{DefaultShellResource, ShellRegistrationResource};
use crate::resources::source_build::SourceBuildResource;
use crate::resources::ssh_key::SshKeyResource;
use crate::resources::symlink::{LinkSetResource, SymlinkResource};
use crate::resources::version_manager::{GlobalVersionResource, PluginResource, RuntimeResource};

/// Package manager binary used when `[package_manager]` is absent.
const DEFAULT_PACKAGE_BINARY: &str = "brew";

/// Host collaborators and facts the plan binds resources to.
pub struct Context<'a> {
    /// Runs external commands.
    pub executor: &'a dyn Executor,
    /// Answers confirmation prompts.
    pub prompter: &'a dyn Prompter,
    /// Home directory used to expand `~/`.
    pub home: PathBuf,
    /// Login name whose shell is changed.
    pub user: String,
    /// Host platform.
    pub platform: Platform,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("executor", &self.executor)
            .field("home", &self.home)
            .field("user", &self.user)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl Context<'_> {
    fn path(&self, raw: &str) -> PathBuf {
        expand_home(raw, &self.home)
    }
}

/// Build the ordered step list for `config`.
#[must_use]
pub fn build<'a>(config: &Config, ctx: &Context<'a>) -> Vec<Step<'a>> {
    let mut steps = Vec::new();
    let manager = config
        .package_manager
        .as_ref()
        .map_or(DEFAULT_PACKAGE_BINARY, |pm| pm.binary.as_str());

    if let Some(pm) = &config.package_manager {
        steps.push(
            Step::from_resource(
                format!("Install {}", pm.name),
                PackageManagerResource::new(
                    pm.name.clone(),
                    pm.binary.clone(),
                    pm.install_script.clone(),
                    ctx.executor,
                ),
            )
            .fatal(pm.fatal.unwrap_or(true)),
        );
    }

    if let Some(packages) = &config.packages {
        push_packages(&mut steps, ctx, manager, packages, PackageKind::Formula);
    }

    if let Some(shell) = &config.shell {
        let path = ctx.path(&shell.path);
        let fatal = shell.fatal.unwrap_or(true);
        let registration = shell.shells_file.as_ref().map_or_else(
            || ShellRegistrationResource::new(path.clone(), ctx.executor),
            |file| {
                ShellRegistrationResource::with_shells_file(
                    path.clone(),
                    ctx.path(file),
                    ctx.executor,
                )
            },
        );
        steps.push(
            Step::from_resource(format!("Register shell {}", path.display()), registration)
                .fatal(fatal),
        );
        steps.push(
            Step::from_resource(
                format!("Set default shell {}", path.display()),
                DefaultShellResource::new(path, ctx.user.clone(), ctx.platform.clone(), ctx.executor),
            )
            .fatal(fatal),
        );
    }

    for entry in &config.config_lines {
        let path = ctx.path(&entry.path);
        steps.push(
            Step::from_resource(
                format!("Add '{}' to {}", entry.line.trim(), entry.path),
                ConfigLineResource::new(path, entry.line.clone()),
            )
            .fatal(entry.fatal.unwrap_or(false)),
        );
    }

    if let Some(vm) = &config.version_manager {
        let fatal = vm.fatal.unwrap_or(false);
        let tool_versions = ctx.path(&vm.tool_versions);
        // Only the last global selection per plugin is kept.
        let last_global: HashMap<&str, usize> = vm
            .runtimes
            .iter()
            .enumerate()
            .filter(|(_, r)| r.global)
            .map(|(idx, r)| (r.plugin.as_str(), idx))
            .collect();
        let mut plugins = HashSet::new();
        let mut installs = HashSet::new();
        for (idx, runtime) in vm.runtimes.iter().enumerate() {
            if plugins.insert(runtime.plugin.as_str()) {
                steps.push(
                    Step::from_resource(
                        format!("Add {} plugin {}", vm.binary, runtime.plugin),
                        PluginResource::new(vm.binary.clone(), runtime.plugin.clone(), ctx.executor),
                    )
                    .fatal(fatal),
                );
            }
            if installs.insert((runtime.plugin.as_str(), runtime.version.as_str())) {
                steps.push(
                    Step::from_resource(
                        format!("Install {} {}", runtime.plugin, runtime.version),
                        RuntimeResource::new(
                            vm.binary.clone(),
                            runtime.plugin.clone(),
                            runtime.version.clone(),
                            ctx.executor,
                        ),
                    )
                    .fatal(fatal),
                );
            }
            if last_global.get(runtime.plugin.as_str()) == Some(&idx) {
                steps.push(
                    Step::from_resource(
                        format!("Set global {} {}", runtime.plugin, runtime.version),
                        GlobalVersionResource::new(
                            vm.binary.clone(),
                            vm.global_args.clone(),
                            runtime.plugin.clone(),
                            runtime.version.clone(),
                            tool_versions.clone(),
                            ctx.executor,
                        ),
                    )
                    .fatal(fatal),
                );
            }
        }
    }

    if let Some(build) = &config.source_build {
        steps.push(
            Step::from_resource(
                format!("Build {} from source", build.name),
                SourceBuildResource::new(
                    build.name.clone(),
                    build.repo.clone(),
                    build.git_ref.clone(),
                    build.binary.clone(),
                    ctx.path(&build.checkout),
                    build.build.clone(),
                    build.install.clone(),
                    ctx.executor,
                ),
            )
            .fatal(build.fatal.unwrap_or(false)),
        );
    }

    if let Some(packages) = &config.packages {
        push_packages(&mut steps, ctx, manager, packages, PackageKind::Cask);
    }

    if let Some(dotfiles) = &config.dotfiles {
        let fatal = dotfiles.fatal.unwrap_or(false);
        let checkout = ctx.path(&dotfiles.checkout);
        steps.push(
            Step::from_resource(
                "Clone dotfiles",
                GitCloneResource::new(
                    dotfiles.repo.clone(),
                    checkout.clone(),
                    dotfiles.git_ref.clone(),
                    ctx.executor,
                ),
            )
            .fatal(fatal),
        );
        for set_name in &dotfiles.apply {
            let Some(entries) = dotfiles.sets.get(set_name) else {
                continue;
            };
            let links = entries
                .iter()
                .map(|e| SymlinkResource::new(checkout.join(e.source()), ctx.path(&e.target())))
                .collect();
            steps.push(
                Step::from_resource(
                    format!("Link dotfiles set {set_name}"),
                    LinkSetResource::new(set_name.clone(), links),
                )
                .fatal(fatal),
            );
        }
    }

    if let Some(ssh) = &config.ssh {
        steps.push(
            Step::from_resource(
                "Generate SSH key",
                SshKeyResource::new(
                    ctx.path(&ssh.key),
                    ssh.email.clone(),
                    ssh.key_type.clone(),
                    ctx.executor,
                    ctx.prompter,
                ),
            )
            .fatal(ssh.fatal.unwrap_or(false)),
        );
    }

    steps
}

/// Push one step per distinct package of `kind`.
fn push_packages<'a>(
    steps: &mut Vec<Step<'a>>,
    ctx: &Context<'a>,
    manager: &str,
    packages: &crate::config::packages::PackagesSection,
    kind: PackageKind,
) {
    let names = match kind {
        PackageKind::Formula => &packages.formulae,
        PackageKind::Cask => &packages.casks,
    };
    let mut seen = HashSet::new();
    for name in names.iter().filter(|n| seen.insert(n.as_str())) {
        steps.push(
            Step::from_resource(
                format!("Install {kind} {name}"),
                PackageResource::new(name.clone(), kind, manager.to_string(), ctx.executor),
            )
            .fatal(packages.is_fatal(name)),
        );
    }
}

/// Keep steps whose name contains an `only` keyword (when any are given),
/// then drop steps whose name contains a `skip` keyword. Matching is
/// case-insensitive.
#[must_use]
pub fn filter<'a>(steps: Vec<Step<'a>>, only: &[String], skip: &[String]) -> Vec<Step<'a>> {
    let lower = |keywords: &[String]| -> Vec<String> {
        keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    };
    let only = lower(only);
    let skip = lower(skip);
    steps
        .into_iter()
        .filter(|step| {
            let name = step.name().to_lowercase();
            (only.is_empty() || only.iter().any(|k| name.contains(k.as_str())))
                && !skip.iter().any(|k| name.contains(k.as_str()))
        })
        .collect()
}

/// Resolve the home directory from `HOME`.
#[must_use]
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(|| PathBuf::from("/"), PathBuf::from)
}

/// Resolve the current login name from `USER` or `LOGNAME`.
#[must_use]
pub fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_default()
}

/// Expand each `bin_dirs` entry of the package manager section.
#[must_use]
pub fn bin_dirs(config: &Config, home: &Path) -> Vec<PathBuf> {
    config
        .package_manager
        .as_ref()
        .map(|pm| pm.bin_dirs.iter().map(|d| expand_home(d, home)).collect())
        .unwrap_or_default()
}
