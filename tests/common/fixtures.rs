//! Workspace fixtures backed by temporary directories

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use gitws::domain::entities::{repository::RepositoryRecord, workspace_config::WorkspaceConfig};
use gitws::infrastructure::filesystem::config_store::ConfigStore;

/// A temporary workspace root with some checkouts in it
pub struct WorkspaceFixture {
    pub temp_dir: TempDir,
    pub config: WorkspaceConfig,
}

impl WorkspaceFixture {
    /// Empty workspace that does not dispatch to its root
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = WorkspaceConfig::new(temp_dir.path()).with_include_root(false);
        Self { temp_dir, config }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Register `name` at `relative` and create a checkout there
    pub fn with_checkout(mut self, name: &str, relative: &str) -> Self {
        create_checkout(&self.root().join(relative));
        self.config = self
            .config
            .with_repository_added(RepositoryRecord::new(name, relative))
            .expect("Failed to add repository");
        self
    }

    /// Register `name` at `relative` without creating anything
    pub fn with_missing(mut self, name: &str, relative: &str) -> Self {
        self.config = self
            .config
            .with_repository_added(RepositoryRecord::new(name, relative))
            .expect("Failed to add repository");
        self
    }

    /// Make the root itself a dispatch target and a checkout
    pub fn with_root_checkout(mut self) -> Self {
        create_checkout(self.root());
        self.config = self.config.with_include_root(true);
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join(".gitws.yml")
    }

    /// Persist the configuration as `.gitws.yml`
    pub fn save(self) -> Self {
        ConfigStore::new()
            .save(&self.config_path(), &self.config)
            .expect("Failed to save config");
        self
    }
}

/// Create `path` with a `.git` marker inside
pub fn create_checkout(path: &Path) {
    fs::create_dir_all(path.join(".git")).expect("Failed to create checkout");
}
