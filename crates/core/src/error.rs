use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read directory {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to rename {from} -> {to}: {source}")]
    Rename {
        from: String,
        to: String,
        #[source]
        source: io::Error,
    },
    #[error("file list no longer matches the loaded folder; reload and regenerate the preview")]
    StaleCatalog,
    #[error("unknown {slot} mode: {value}")]
    InvalidMode { slot: &'static str, value: String },
    #[error("invalid target file name: {name:?}")]
    InvalidTargetName { name: String },
}

impl EngineError {
    /// Name of the file the failure is attributed to, if any.
    pub fn failed_name(&self) -> Option<&str> {
        match self {
            EngineError::Rename { from, .. } => Some(from),
            EngineError::InvalidTargetName { name } => Some(name),
            _ => None,
        }
    }
}
