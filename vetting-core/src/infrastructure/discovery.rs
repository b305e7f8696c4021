// vetting-core/src/infrastructure/discovery.rs

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::infrastructure::error::InfrastructureError;

fn is_yaml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "yml" || ext == "yaml")
}

pub struct RuleDiscovery;

impl RuleDiscovery {
    /// Expands configured rule paths into rule files.
    ///
    /// Files are taken as given. Directories are walked recursively for
    /// `.yml` / `.yaml` files in file name order, so the merge order is
    /// stable across platforms. Paths keep their configured order.
    pub fn discover(paths: &[PathBuf]) -> Result<Vec<PathBuf>, InfrastructureError> {
        let mut files = Vec::new();

        for root in paths {
            if root.is_file() {
                files.push(root.clone());
                continue;
            }
            if !root.is_dir() {
                return Err(InfrastructureError::ConfigError(format!(
                    "Rule path {:?} does not exist",
                    root
                )));
            }

            let walker = WalkDir::new(root).follow_links(true).sort_by_file_name();
            for entry in walker.into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if entry.file_type().is_file() && is_yaml(path) {
                    files.push(path.to_path_buf());
                }
            }
        }

        debug!(count = files.len(), "Rule files discovered");
        Ok(files)
    }
}
