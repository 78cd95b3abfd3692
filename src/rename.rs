//! Batch renamer - renumbers the files of one directory
//!
//! Files are sorted by name and renamed to `<prefix><number><ext>`, with the
//! number zero-padded to the width of the largest number used.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::RenameError;
use crate::prompt::Confirm;

/// Detail recorded when the new name is already taken
pub const TARGET_EXISTS: &str = "Target name already exists";

/// One planned rename
#[derive(Debug, Clone, PartialEq)]
pub struct RenameEntry {
    pub old_name: OsString,
    pub new_name: OsString,
}

/// Renames computed for a directory, not yet applied
#[derive(Debug, Clone)]
pub struct RenamePlan {
    pub dir: PathBuf,
    pub prefix: String,
    pub start: u64,
    pub digits: usize,
    pub entries: Vec<RenameEntry>,
}

impl RenamePlan {
    /// Name of the first file without its extension, as shown to the user
    pub fn example_name(&self) -> String {
        format!("{}{:0width$}", self.prefix, self.start, width = self.digits)
    }
}

/// A file that could not be renamed
#[derive(Debug, Clone, Serialize)]
pub struct RenameFailure {
    pub old_name: String,
    pub reason: String,
}

/// Summary of an applied plan
#[derive(Debug, Clone, Serialize)]
pub struct RenameReport {
    pub total: usize,
    pub renamed: usize,
    pub failures: Vec<RenameFailure>,
}

/// Result of asking to apply a plan
#[derive(Debug, Clone)]
pub enum RenameOutcome {
    Cancelled,
    Completed(RenameReport),
}

fn matches_extension(name: &OsString, extension: Option<&str>) -> bool {
    match extension {
        Some(ext) => {
            let ext = if ext.starts_with('.') {
                ext.to_lowercase()
            } else {
                format!(".{}", ext.to_lowercase())
            };
            name.to_string_lossy().to_lowercase().ends_with(&ext)
        }
        None => true,
    }
}

/// Build the rename plan for the regular files in `dir`.
pub fn plan_renames(
    dir: &Path,
    prefix: &str,
    start: u64,
    extension: Option<&str>,
) -> Result<RenamePlan, RenameError> {
    if !dir.exists() {
        return Err(RenameError::PathMissing(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(RenameError::NotADirectory(dir.to_path_buf()));
    }
    if prefix.is_empty() {
        return Err(RenameError::EmptyPrefix);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name();
        if matches_extension(&name, extension) {
            files.push(name);
        }
    }
    if files.is_empty() {
        return Err(RenameError::NoFiles);
    }
    files.sort();

    let count = files.len();
    let last = u64::try_from(count - 1)
        .ok()
        .and_then(|extra| start.checked_add(extra))
        .ok_or(RenameError::StartTooLarge { start, count })?;
    let digits = last.to_string().len();

    let entries = files
        .into_iter()
        .zip(start..=last)
        .map(|(old_name, number)| {
            let mut new_name = OsString::from(format!("{}{:0width$}", prefix, number, width = digits));
            if let Some(ext) = Path::new(&old_name).extension() {
                new_name.push(".");
                new_name.push(ext);
            }
            RenameEntry { old_name, new_name }
        })
        .collect();

    tracing::debug!("Planned renames in {} with {} digits", dir.display(), digits);

    Ok(RenamePlan {
        dir: dir.to_path_buf(),
        prefix: prefix.to_string(),
        start,
        digits,
        entries,
    })
}

/// Ask once, then rename every entry in order.
pub fn apply_renames(plan: &RenamePlan, confirm: &mut dyn Confirm) -> RenameOutcome {
    let question = format!(
        "Are you sure to rename all files in format like '{}'?",
        plan.example_name()
    );
    if !confirm.confirm(&question) {
        tracing::info!("Rename cancelled");
        return RenameOutcome::Cancelled;
    }

    let mut renamed = 0;
    let mut failures = Vec::new();
    for entry in &plan.entries {
        let old_path = plan.dir.join(&entry.old_name);
        let new_path = plan.dir.join(&entry.new_name);
        let old_name = entry.old_name.to_string_lossy().into_owned();

        if new_path.exists() {
            failures.push(RenameFailure {
                old_name,
                reason: TARGET_EXISTS.to_string(),
            });
            continue;
        }
        match std::fs::rename(&old_path, &new_path) {
            Ok(()) => renamed += 1,
            Err(e) => {
                tracing::warn!("Failed to rename {}: {}", old_path.display(), e);
                failures.push(RenameFailure {
                    old_name,
                    reason: e.to_string(),
                });
            }
        }
    }

    RenameOutcome::Completed(RenameReport {
        total: plan.entries.len(),
        renamed,
        failures,
    })
}
