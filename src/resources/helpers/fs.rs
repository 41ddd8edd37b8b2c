//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to a regular file that a symlink replaces.
pub const BACKUP_SUFFIX: &str = ".pre-provision";

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Remove an existing file or symlink at `path`, including broken symlinks.
///
/// Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    if path.symlink_metadata().is_ok() {
        fs::remove_file(path).with_context(|| format!("remove existing: {}", path.display()))?;
    }
    Ok(())
}

/// Move `path` aside to `<path>.pre-provision`, replacing an older backup.
///
/// # Errors
///
/// Returns an error if the rename fails.
pub fn move_aside(path: &Path) -> Result<PathBuf> {
    let mut backup = OsString::from(path.as_os_str());
    backup.push(BACKUP_SUFFIX);
    let backup = PathBuf::from(backup);
    remove_existing(&backup)?;
    fs::rename(path, &backup).with_context(|| {
        format!("move {} aside to {}", path.display(), backup.display())
    })?;
    Ok(backup)
}

/// Expand a leading `~` or `~/` against `home`.
///
/// Other paths are returned unchanged.
#[must_use]
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Whether appending a line to `path` first needs a newline, because the
/// file is non-empty and its last line is unterminated.
#[must_use]
pub fn lacks_trailing_newline(path: &Path) -> bool {
    fs::read(path).is_ok_and(|bytes| !bytes.is_empty() && !bytes.ends_with(b"\n"))
}

/// Whether the text file at `path` has a line equal to `line` after trimming.
///
/// A missing file has no lines.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn file_has_line(path: &Path, line: &str) -> Result<bool> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(e).with_context(|| format!("read {}", path.display()));
        }
    };
    let wanted = line.trim();
    Ok(contents.lines().any(|l| l.trim() == wanted))
}
