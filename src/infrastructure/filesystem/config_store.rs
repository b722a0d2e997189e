use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use validator::Validate;

use crate::domain::entities::{
    repository::RepositoryRecord,
    workspace::LEGACY_CONFIG_FILE_NAME,
    workspace_config::WorkspaceConfig,
};

/// Configuration store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Workspace not initialized: configuration file not found at {}", .path.display())]
    ConfigMissing {
        path: PathBuf,
        /// Legacy file found next to the missing configuration, if any
        legacy_config: Option<PathBuf>,
    },

    #[error("Configuration file {} is corrupt: {message}", .path.display())]
    ConfigCorrupt { path: PathBuf, message: String },

    #[error("Configuration file read failed for {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file write failed for {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML serialization failed: {0}")]
    SerializationFailed(String),
}

impl ConfigStoreError {
    /// Missing configuration at `path`, noting a legacy file beside it
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let legacy = path.with_file_name(LEGACY_CONFIG_FILE_NAME);
        Self::ConfigMissing {
            legacy_config: legacy.is_file().then_some(legacy),
            path,
        }
    }

    /// Whether this error means "not initialized" rather than "unreadable"
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::ConfigMissing { .. })
    }
}

/// On-disk shape of a workspace configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct ConfigDocument {
    #[validate(length(min = 1))]
    root: String,

    #[serde(default)]
    repositories: Vec<RepositoryDocument>,

    #[serde(default)]
    ignore_root: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct RepositoryDocument {
    #[validate(length(min = 1))]
    name: String,

    #[validate(length(min = 1))]
    path: String,
}

impl From<&WorkspaceConfig> for ConfigDocument {
    fn from(config: &WorkspaceConfig) -> Self {
        Self {
            root: config.root.display().to_string(),
            repositories: config
                .repositories
                .iter()
                .map(|r| RepositoryDocument {
                    name: r.name.clone(),
                    path: r.path.display().to_string(),
                })
                .collect(),
            ignore_root: !config.include_root,
        }
    }
}

impl From<ConfigDocument> for WorkspaceConfig {
    fn from(document: ConfigDocument) -> Self {
        WorkspaceConfig::new(document.root)
            .with_include_root(!document.ignore_root)
            .with_repositories(
                document
                    .repositories
                    .into_iter()
                    .map(|r| RepositoryRecord::new(r.name, r.path))
                    .collect(),
            )
    }
}

/// Reads and atomically rewrites the workspace configuration file
#[derive(Debug, Clone, Default)]
pub struct ConfigStore;

impl ConfigStore {
    /// Create a new configuration store
    pub fn new() -> Self {
        Self
    }

    /// Read the configuration at `config_path`
    pub fn load(&self, config_path: &Path) -> Result<WorkspaceConfig, ConfigStoreError> {
        if !config_path.is_file() {
            return Err(ConfigStoreError::missing(config_path));
        }

        let contents =
            fs::read_to_string(config_path).map_err(|source| ConfigStoreError::ReadFailed {
                path: config_path.to_path_buf(),
                source,
            })?;

        let config = self.parse(&contents, config_path)?;
        debug!(
            path = %config_path.display(),
            repositories = config.repositories.len(),
            "loaded workspace configuration"
        );
        Ok(config)
    }

    /// Replace the configuration at `config_path` with `config`.
    ///
    /// The new content is written to a sibling temporary file which is then
    /// renamed over the target, so readers see either the old or the new file.
    pub fn save(&self, config_path: &Path, config: &WorkspaceConfig) -> Result<(), ConfigStoreError> {
        config
            .validate()
            .map_err(|e| ConfigStoreError::ConfigCorrupt {
                path: config_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let yaml_content = self.render(config)?;
        let write_failed = |source| ConfigStoreError::WriteFailed {
            path: config_path.to_path_buf(),
            source,
        };

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_failed)?;
            }
        }

        let temp_path = Self::temp_path(config_path);
        let written = Self::write_synced(&temp_path, yaml_content.as_bytes())
            .and_then(|_| fs::rename(&temp_path, config_path));
        if let Err(source) = written {
            let _ = fs::remove_file(&temp_path); // best effort
            return Err(write_failed(source));
        }

        debug!(path = %config_path.display(), "saved workspace configuration");
        Ok(())
    }

    /// Serialize `config` to its on-disk YAML form
    pub fn render(&self, config: &WorkspaceConfig) -> Result<String, ConfigStoreError> {
        serde_yaml::to_string(&ConfigDocument::from(config))
            .map_err(|e| ConfigStoreError::SerializationFailed(e.to_string()))
    }

    /// Check if configuration file exists
    pub fn config_exists(&self, config_path: &Path) -> bool {
        config_path.is_file()
    }

    fn parse(&self, contents: &str, config_path: &Path) -> Result<WorkspaceConfig, ConfigStoreError> {
        let corrupt = |message: String| ConfigStoreError::ConfigCorrupt {
            path: config_path.to_path_buf(),
            message,
        };

        let document: ConfigDocument =
            serde_yaml::from_str(contents).map_err(|e| corrupt(e.to_string()))?;

        document.validate().map_err(|e| corrupt(e.to_string()))?;
        for repository in &document.repositories {
            repository.validate().map_err(|e| corrupt(e.to_string()))?;
        }

        let config = WorkspaceConfig::from(document);
        config.validate().map_err(|e| corrupt(e.to_string()))?;
        Ok(config)
    }

    fn temp_path(config_path: &Path) -> PathBuf {
        let file_name = config_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        config_path.with_file_name(format!(".{}.tmp.{}", file_name, std::process::id()))
    }

    fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}
