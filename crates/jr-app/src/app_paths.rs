use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub entry_cache_dir: PathBuf,
    pub identity_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_data_root(root: &Path) -> Self {
        Self {
            entry_cache_dir: root.join("cache").join("entries"),
            identity_path: root.join("identity.json"),
            logs_dir: root.join("logs"),
        }
    }
}
