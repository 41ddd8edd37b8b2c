//! Append-if-absent resource for small text configuration files.
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::helpers::fs::{ensure_parent_dir, file_has_line, lacks_trailing_newline};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A line that must be present in a text file.
#[derive(Debug, Clone)]
pub struct ConfigLineResource {
    /// File to edit.
    pub path: PathBuf,
    /// Line that must be present (compared trimmed).
    pub line: String,
}

impl ConfigLineResource {
    /// Create a new config line resource.
    #[must_use]
    pub const fn new(path: PathBuf, line: String) -> Self {
        Self { path, line }
    }
}

impl Applicable for ConfigLineResource {
    fn description(&self) -> String {
        format!("'{}' in {}", self.line.trim(), self.path.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if file_has_line(&self.path, &self.line)? {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        ensure_parent_dir(&self.path)?;

        let needs_separator = lacks_trailing_newline(&self.path);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        if needs_separator {
            writeln!(file).with_context(|| format!("write {}", self.path.display()))?;
        }
        writeln!(file, "{}", self.line.trim())
            .with_context(|| format!("write {}", self.path.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ConfigLineResource {
    fn current_state(&self) -> Result<ResourceState> {
        if file_has_line(&self.path, &self.line)? {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;

    const LINE: &str = "source (brew --prefix asdf)/libexec/asdf.fish";

    #[test]
    fn creates_missing_file_and_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".config/fish/config.fish");
        let resource = ConfigLineResource::new(path.clone(), LINE.to_string());
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(fs::read_to_string(&path).unwrap(), format!("{LINE}\n"));
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn appends_separator_when_file_lacks_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.fish");
        fs::write(&path, "set -gx EDITOR nvim").unwrap();
        ConfigLineResource::new(path.clone(), LINE.to_string())
            .apply()
            .unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("set -gx EDITOR nvim\n{LINE}\n")
        );
    }

    #[test]
    fn apply_twice_appends_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.fish");
        let resource = ConfigLineResource::new(path.clone(), LINE.to_string());
        resource.apply().unwrap();
        assert_eq!(resource.apply().unwrap(), ResourceChange::AlreadyCorrect);
        assert_eq!(fs::read_to_string(&path).unwrap().matches(LINE).count(), 1);
    }

    #[test]
    fn existing_indented_line_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.fish");
        fs::write(&path, format!("  {LINE}  \n")).unwrap();
        let resource = ConfigLineResource::new(path, LINE.to_string());
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }
}
