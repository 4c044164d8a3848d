mod apply;
mod catalog;
mod config;
mod error;
mod filter;
mod planner;
mod rule;

pub use apply::{apply_plan, RenameOutcome, RenameReport};
pub use catalog::{load_catalog, Catalog, FileEntry, SnapshotId};
pub use config::{
    app_paths, load_config, load_config_from, save_config, save_config_to, AppConfig, AppPaths,
};
pub use error::EngineError;
pub use filter::{apply_filter, FilterSpec, FilteredFiles};
pub use planner::{generate_names, generate_plan, RenameCandidate, RenamePlan, RenameStats};
pub use rule::{AffixMode, AffixRule, ExtensionMode, ExtensionRule, RenameRule};
