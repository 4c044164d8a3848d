use crate::catalog::{Catalog, FileEntry, SnapshotId};
use crate::rule::split_extension;

/// Semicolon separated extension allow-list such as `.txt;JPG`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    extensions: Vec<String>,
}

impl FilterSpec {
    pub fn parse(raw: &str) -> Self {
        let extensions = raw
            .split(';')
            .map(|token| token.trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .map(|token| {
                if token.starts_with('.') {
                    token
                } else {
                    format!(".{token}")
                }
            })
            .collect();
        Self { extensions }
    }

    /// Normalized tokens: lower-case, each with a leading dot.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn matches_everything(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.matches_everything() {
            return true;
        }
        let (_, ext) = split_extension(name);
        if ext.is_empty() {
            return false;
        }
        let ext = ext.to_lowercase();
        self.extensions.iter().any(|token| *token == ext)
    }
}

impl From<&str> for FilterSpec {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Catalog entries that passed a filter, tagged with the snapshot they came from.
#[derive(Debug, Clone)]
pub struct FilteredFiles {
    snapshot: SnapshotId,
    files: Vec<FileEntry>,
}

impl FilteredFiles {
    pub fn snapshot(&self) -> SnapshotId {
        self.snapshot
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

pub fn apply_filter(catalog: &Catalog, spec: &FilterSpec) -> FilteredFiles {
    let files = if spec.matches_everything() {
        catalog.files().to_vec()
    } else {
        catalog
            .files()
            .iter()
            .filter(|file| spec.matches(&file.name))
            .cloned()
            .collect()
    };

    FilteredFiles {
        snapshot: catalog.snapshot(),
        files,
    }
}
