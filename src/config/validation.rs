//! Non-blocking configuration checks.
//!
//! Problems found here are reported as warnings before the run; they never
//! stop it. Blocking problems are [`ConfigError`](crate::error::ConfigError)s
//! raised while loading.
use std::collections::HashSet;
use std::path::Path;

use super::Config;
use super::dotfiles::DotfilesSection;
use super::packages::PackagesSection;
use super::runtimes::VersionManagerSection;
use super::shell::ShellSection;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration section (e.g., "packages", "dotfiles").
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a new warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.source, self.item, self.message)
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self) -> Vec<ValidationWarning>;
}

/// Run every validator over `config`.
#[must_use]
pub fn validate_all(config: &Config) -> Vec<ValidationWarning> {
    let mut validators: Vec<Box<dyn ConfigValidator + '_>> = Vec::new();
    if let Some(packages) = &config.packages {
        validators.push(Box::new(PackageValidator::new(packages)));
    }
    if let Some(shell) = &config.shell {
        validators.push(Box::new(ShellValidator::new(shell)));
    }
    if let Some(vm) = &config.version_manager {
        validators.push(Box::new(RuntimeValidator::new(vm)));
    }
    if let Some(dotfiles) = &config.dotfiles {
        validators.push(Box::new(DotfilesValidator::new(dotfiles)));
    }
    validators.iter().flat_map(|v| v.validate()).collect()
}

/// Validator for the package lists.
#[derive(Debug)]
pub struct PackageValidator<'a> {
    packages: &'a PackagesSection,
}

impl<'a> PackageValidator<'a> {
    /// Create a validator for `packages`.
    #[must_use]
    pub const fn new(packages: &'a PackagesSection) -> Self {
        Self { packages }
    }
}

impl ConfigValidator for PackageValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for name in self.packages.formulae.iter().chain(&self.packages.casks) {
            if name.trim().is_empty() {
                warnings.push(ValidationWarning::new(
                    "packages",
                    name,
                    "package name is empty",
                ));
            } else if !seen.insert(name.as_str()) {
                warnings.push(ValidationWarning::new(
                    "packages",
                    name,
                    "package listed more than once",
                ));
            }
        }

        for name in &self.packages.required {
            if !seen.contains(name.as_str()) {
                warnings.push(ValidationWarning::new(
                    "packages",
                    name,
                    "required package is not listed in formulae or casks",
                ));
            }
        }

        warnings
    }
}

/// Validator for the login shell.
#[derive(Debug)]
pub struct ShellValidator<'a> {
    shell: &'a ShellSection,
}

impl<'a> ShellValidator<'a> {
    /// Create a validator for `shell`.
    #[must_use]
    pub const fn new(shell: &'a ShellSection) -> Self {
        Self { shell }
    }
}

impl ConfigValidator for ShellValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        if Path::new(&self.shell.path).is_absolute() {
            Vec::new()
        } else {
            vec![ValidationWarning::new(
                "shell",
                &self.shell.path,
                "shell path should be absolute",
            )]
        }
    }
}

/// Validator for runtimes.
#[derive(Debug)]
pub struct RuntimeValidator<'a> {
    version_manager: &'a VersionManagerSection,
}

impl<'a> RuntimeValidator<'a> {
    /// Create a validator for `version_manager`.
    #[must_use]
    pub const fn new(version_manager: &'a VersionManagerSection) -> Self {
        Self { version_manager }
    }
}

impl ConfigValidator for RuntimeValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut globals = HashSet::new();
        let mut seen = HashSet::new();
        for runtime in &self.version_manager.runtimes {
            if !seen.insert((runtime.plugin.as_str(), runtime.version.as_str())) {
                warnings.push(ValidationWarning::new(
                    "version_manager",
                    format!("{} {}", runtime.plugin, runtime.version),
                    "runtime listed more than once; it is installed once",
                ));
            }
            if runtime.version.trim().is_empty() {
                warnings.push(ValidationWarning::new(
                    "version_manager",
                    &runtime.plugin,
                    "runtime version is empty",
                ));
            }
            if runtime.global && !globals.insert(runtime.plugin.as_str()) {
                warnings.push(ValidationWarning::new(
                    "version_manager",
                    &runtime.plugin,
                    "more than one global version selected; the last one wins",
                ));
            }
        }
        warnings
    }
}

/// Validator for dotfiles link sets.
#[derive(Debug)]
pub struct DotfilesValidator<'a> {
    dotfiles: &'a DotfilesSection,
}

impl<'a> DotfilesValidator<'a> {
    /// Create a validator for `dotfiles`.
    #[must_use]
    pub const fn new(dotfiles: &'a DotfilesSection) -> Self {
        Self { dotfiles }
    }
}

impl ConfigValidator for DotfilesValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut targets = HashSet::new();

        for set_name in &self.dotfiles.apply {
            let Some(entries) = self.dotfiles.sets.get(set_name) else {
                continue;
            };
            for entry in entries {
                if Path::new(entry.source()).is_absolute() {
                    warnings.push(ValidationWarning::new(
                        "dotfiles",
                        entry.source(),
                        "source path should be relative to the dotfiles checkout",
                    ));
                }
                let target = entry.target();
                if !targets.insert(target.clone()) {
                    warnings.push(ValidationWarning::new(
                        "dotfiles",
                        target,
                        format!("target linked more than once (set '{set_name}')"),
                    ));
                }
            }
        }

        warnings
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn config(toml: &str) -> Config {
        Config::parse(toml, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn clean_config_has_no_warnings() {
        let c = config(
            r#"
[packages]
formulae = ["git", "fish"]
required = ["fish"]
[shell]
path = "/usr/bin/fish"
"#,
        );
        assert!(c.validate().is_empty());
    }

    #[test]
    fn duplicate_and_undeclared_packages() {
        let c = config(
            r#"
[packages]
formulae = ["git", "git"]
casks = ["iterm2"]
required = ["fish"]
"#,
        );
        let warnings = c.validate();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].item, "git");
        assert!(warnings[0].message.contains("more than once"));
        assert_eq!(warnings[1].item, "fish");
    }

    #[test]
    fn relative_shell_path_warns() {
        let c = config("[shell]\npath = \"fish\"\n");
        assert_eq!(
            c.validate(),
            vec![ValidationWarning::new(
                "shell",
                "fish",
                "shell path should be absolute"
            )]
        );
    }

    #[test]
    fn empty_runtime_version_warns() {
        let c = config(
            "[version_manager]\n[[version_manager.runtimes]]\nplugin = \"nodejs\"\nversion = \"\"\n",
        );
        let warnings = c.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "runtime version is empty");
    }

    #[test]
    fn repeated_runtime_warns() {
        let c = config(
            r#"
[version_manager]
[[version_manager.runtimes]]
plugin = "nodejs"
version = "20.11.1"
[[version_manager.runtimes]]
plugin = "nodejs"
version = "20.11.1"
global = true
"#,
        );
        let warnings = c.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item, "nodejs 20.11.1");
        assert!(warnings[0].message.contains("more than once"));
    }

    #[test]
    fn duplicate_link_targets_warn() {
        let c = config(
            r#"
[dotfiles]
repo = "r"
apply = ["base", "work"]
[dotfiles.sets]
base = ["gitconfig"]
work = [{ source = "work/gitconfig", target = "~/.gitconfig" }]
"#,
        );
        let warnings = c.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item, "~/.gitconfig");
        assert!(warnings[0].to_string().starts_with("[dotfiles] ~/.gitconfig:"));
    }
}
