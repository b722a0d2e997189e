use std::path::{Path, PathBuf};

/// File holding the workspace configuration
pub const CONFIG_FILE_NAME: &str = ".gitws.yml";

/// Configuration file written by older releases
pub const LEGACY_CONFIG_FILE_NAME: &str = ".gitws";

/// Append-only invocation history
pub const HISTORY_FILE_NAME: &str = ".gitws_history";

/// A workspace directory and the well-known files inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Workspace root
    pub root_path: PathBuf,
}

impl Workspace {
    /// Create a new Workspace rooted at `root_path`
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.root_path.join(CONFIG_FILE_NAME)
    }

    /// Path of the legacy configuration file
    pub fn legacy_config_path(&self) -> PathBuf {
        self.root_path.join(LEGACY_CONFIG_FILE_NAME)
    }

    /// Path of the history log
    pub fn history_path(&self) -> PathBuf {
        self.root_path.join(HISTORY_FILE_NAME)
    }

    /// Whether a configuration file exists
    pub fn is_initialized(&self) -> bool {
        self.config_path().is_file()
    }

    /// Search upward from `start_path` for a directory holding a configuration file
    pub fn discover_workspace_root(start_path: &Path) -> Option<PathBuf> {
        start_path
            .ancestors()
            .find(|candidate| Self::new(*candidate).is_initialized())
            .map(Path::to_path_buf)
    }

    /// Search upward for a directory holding a legacy configuration file
    pub fn discover_legacy_root(start_path: &Path) -> Option<PathBuf> {
        start_path
            .ancestors()
            .find(|candidate| Self::new(*candidate).legacy_config_path().is_file())
            .map(Path::to_path_buf)
    }
}
