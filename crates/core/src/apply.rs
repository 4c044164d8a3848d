use crate::catalog::{load_catalog, Catalog};
use crate::error::EngineError;
use crate::planner::{RenameCandidate, RenamePlan};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Terminal result of one batch. `success_count` survives a failure so the
/// caller can tell the folder is half renamed.
#[derive(Debug)]
pub struct RenameOutcome {
    pub success_count: usize,
    pub skipped_count: usize,
    pub error: Option<EngineError>,
}

impl RenameOutcome {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug)]
pub struct RenameReport {
    pub outcome: RenameOutcome,
    /// Folder listing read back after the batch. `None` when that read failed.
    pub catalog: Option<Catalog>,
}

/// Renames every changed candidate in order and stops at the first failure.
/// Completed renames are not rolled back. The folder is always read again
/// afterwards.
///
/// Errors returned directly (stale plan, invalid target name) are raised
/// before anything on disk is touched. Target names are checked for the whole
/// plan ahead of the fail-stop loop, so one bad name rejects the batch before
/// any earlier candidate is renamed.
pub fn apply_plan(catalog: &Catalog, plan: &RenamePlan) -> Result<RenameReport, EngineError> {
    if plan.snapshot() != catalog.snapshot() || plan.folder() != catalog.folder() {
        return Err(EngineError::StaleCatalog);
    }
    validate_target_names(plan.candidates())?;

    let folder = catalog.folder();
    let mut outcome = RenameOutcome {
        success_count: 0,
        skipped_count: 0,
        error: None,
    };

    for candidate in plan.candidates() {
        let old_path = folder.join(&candidate.old_name);
        let new_path = folder.join(&candidate.new_name);
        if old_path == new_path {
            outcome.skipped_count += 1;
            continue;
        }

        if let Err(source) = rename_file(&old_path, &new_path) {
            warn!(
                from = %candidate.old_name,
                to = %candidate.new_name,
                error = %source,
                renamed = outcome.success_count,
                "rename failed, stopping batch"
            );
            outcome.error = Some(EngineError::Rename {
                from: candidate.old_name.clone(),
                to: candidate.new_name.clone(),
                source,
            });
            break;
        }
        debug!(from = %candidate.old_name, to = %candidate.new_name, "renamed");
        outcome.success_count += 1;
    }

    info!(
        folder = %folder.display(),
        renamed = outcome.success_count,
        skipped = outcome.skipped_count,
        failed = outcome.error.is_some(),
        "rename batch finished"
    );

    let catalog = match load_catalog(folder) {
        Ok(reloaded) => Some(reloaded),
        Err(err) => {
            warn!(folder = %folder.display(), error = %err, "reload after rename failed");
            outcome.error = Some(err);
            None
        }
    };

    Ok(RenameReport { outcome, catalog })
}

fn validate_target_names(candidates: &[RenameCandidate]) -> Result<(), EngineError> {
    for candidate in candidates.iter().filter(|c| c.old_name != c.new_name) {
        let name = candidate.new_name.as_str();
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.chars().any(|c| c == '/' || std::path::is_separator(c))
        {
            return Err(EngineError::InvalidTargetName {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn rename_file(old_path: &Path, new_path: &Path) -> io::Result<()> {
    // a case-only rename on a case-insensitive volume finds its own source here
    if fs::symlink_metadata(new_path).is_ok() && !is_same_file(old_path, new_path) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", new_path.display()),
        ));
    }
    fs::rename(old_path, new_path)
}

#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
