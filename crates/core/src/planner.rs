use crate::catalog::{Catalog, SnapshotId};
use crate::error::EngineError;
use crate::filter::FilteredFiles;
use crate::rule::RenameRule;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameCandidate {
    pub old_name: String,
    pub new_name: String,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct RenameStats {
    pub planned: usize,
    pub unchanged: usize,
}

/// Old/new name pairs, index-aligned with the filtered files they were
/// generated from. Only [`generate_plan`] builds one.
#[derive(Debug, Clone, Serialize)]
pub struct RenamePlan {
    folder: PathBuf,
    snapshot: SnapshotId,
    rule: RenameRule,
    candidates: Vec<RenameCandidate>,
    stats: RenameStats,
}

impl RenamePlan {
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn snapshot(&self) -> SnapshotId {
        self.snapshot
    }

    pub fn rule(&self) -> &RenameRule {
        &self.rule
    }

    pub fn candidates(&self) -> &[RenameCandidate] {
        &self.candidates
    }

    pub fn stats(&self) -> &RenameStats {
        &self.stats
    }

    pub fn new_names(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.new_name.as_str())
    }
}

/// Derives a new name for every filtered file. Output is index-aligned with
/// the input; collisions between outputs are left for the executor.
pub fn generate_names(filtered: &FilteredFiles, rule: &RenameRule) -> Vec<String> {
    filtered
        .files()
        .iter()
        .map(|file| rule.apply(&file.name))
        .collect()
}

pub fn generate_plan(
    catalog: &Catalog,
    filtered: &FilteredFiles,
    rule: &RenameRule,
) -> Result<RenamePlan, EngineError> {
    if filtered.snapshot() != catalog.snapshot() {
        return Err(EngineError::StaleCatalog);
    }

    let mut stats = RenameStats::default();
    let mut candidates = Vec::with_capacity(filtered.len());
    for (file, new_name) in filtered.files().iter().zip(generate_names(filtered, rule)) {
        let changed = new_name != file.name;
        if !changed {
            stats.unchanged += 1;
        }
        stats.planned += 1;
        debug!(from = %file.name, to = %new_name, changed, "planned rename");
        candidates.push(RenameCandidate {
            old_name: file.name.clone(),
            new_name,
            changed,
        });
    }

    Ok(RenamePlan {
        folder: catalog.folder().to_path_buf(),
        snapshot: catalog.snapshot(),
        rule: rule.clone(),
        candidates,
        stats,
    })
}
