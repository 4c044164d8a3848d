use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
}

impl FileEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Fingerprint of a folder listing. Loading an unchanged folder twice yields
/// the same id, so plans built from either load stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SnapshotId(u64);

impl SnapshotId {
    fn compute(folder: &Path, files: &[FileEntry]) -> Self {
        let mut hasher = DefaultHasher::new();
        folder.hash(&mut hasher);
        files.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Flat listing of the non-directory files in one folder, in the order the
/// OS returned them.
#[derive(Debug, Clone)]
pub struct Catalog {
    folder: PathBuf,
    files: Vec<FileEntry>,
    skipped: usize,
    snapshot: SnapshotId,
}

impl Catalog {
    pub(crate) fn from_parts(folder: PathBuf, files: Vec<FileEntry>, skipped: usize) -> Self {
        let snapshot = SnapshotId::compute(&folder, &files);
        Self {
            folder,
            files,
            skipped,
            snapshot,
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Entries left out because their metadata or name could not be read.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn snapshot(&self) -> SnapshotId {
        self.snapshot
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn reload(&self) -> Result<Catalog, EngineError> {
        load_catalog(&self.folder)
    }
}

pub fn load_catalog(folder: impl AsRef<Path>) -> Result<Catalog, EngineError> {
    let folder = folder.as_ref();
    let entries = fs::read_dir(folder).map_err(|source| EngineError::DirectoryRead {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    let mut skipped = 0usize;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(folder = %folder.display(), error = %err, "skipping unreadable entry");
                skipped += 1;
                continue;
            }
        };
        let path = entry.path();

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping entry without metadata");
                skipped += 1;
                continue;
            }
        };
        if metadata.is_dir() {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            warn!(path = %path.display(), "skipping entry with non UTF-8 name");
            skipped += 1;
            continue;
        };
        debug!(name = %name, "loaded file");
        files.push(FileEntry { name });
    }

    info!(
        folder = %folder.display(),
        loaded = files.len(),
        skipped,
        "catalog loaded"
    );
    Ok(Catalog::from_parts(folder.to_path_buf(), files, skipped))
}
