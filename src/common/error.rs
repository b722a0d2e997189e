use std::path::PathBuf;
use thiserror::Error;

use crate::application::use_cases::{
    dispatch_command::DispatchError, manage_repositories::ManageRepositoriesError,
};
use crate::domain::entities::workspace_config::WorkspaceConfigError;
use crate::domain::value_objects::command_line::CommandLineError;
use crate::infrastructure::filesystem::{
    config_store::ConfigStoreError, legacy_config::LegacyConfigError,
};

#[derive(Error, Debug)]
pub enum GitwsError {
    #[error(transparent)]
    ConfigStore(#[from] ConfigStoreError),

    #[error(transparent)]
    LegacyConfig(#[from] LegacyConfigError),

    #[error(transparent)]
    WorkspaceConfig(#[from] WorkspaceConfigError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    ManageRepositories(#[from] ManageRepositoriesError),

    #[error(transparent)]
    CommandLine(#[from] CommandLineError),

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl GitwsError {
    pub fn filesystem_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn serialization_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The configuration store error behind this one, if any
    pub fn config_store_error(&self) -> Option<&ConfigStoreError> {
        match self {
            Self::ConfigStore(e) => Some(e),
            Self::ManageRepositories(ManageRepositoriesError::ConfigStore(e)) => Some(e),
            _ => None,
        }
    }

    /// Follow-up advice for the user
    pub fn hint(&self) -> Option<String> {
        match self.config_store_error()? {
            ConfigStoreError::ConfigMissing {
                legacy_config: Some(legacy),
                ..
            } => Some(format!(
                "Found legacy configuration {}; run 'gitws convert' to migrate it",
                legacy.display()
            )),
            ConfigStoreError::ConfigMissing { .. } => {
                Some("Run 'gitws init' to create a workspace here".to_string())
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for GitwsError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<serde_yaml::Error> for GitwsError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::serialization_error_with_source("YAML serialization failed", error)
    }
}

impl From<serde_json::Error> for GitwsError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization_error_with_source("JSON serialization failed", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_errors_keep_their_message() {
        let error: GitwsError = DispatchError::RepositoryNotFound("api".to_string()).into();
        assert_eq!(error.to_string(), "Repository not found: api");

        let error: GitwsError = WorkspaceConfigError::DuplicateRepository("api".to_string()).into();
        assert_eq!(error.to_string(), "Repository 'api' already exists");
    }

    #[test]
    fn test_missing_config_hint() {
        let error: GitwsError = ConfigStoreError::ConfigMissing {
            path: PathBuf::from("/w/.gitws.yml"),
            legacy_config: None,
        }
        .into();
        assert_eq!(
            error.hint().as_deref(),
            Some("Run 'gitws init' to create a workspace here")
        );

        let error: GitwsError =
            ManageRepositoriesError::ConfigStore(ConfigStoreError::ConfigMissing {
                path: PathBuf::from("/w/.gitws.yml"),
                legacy_config: Some(PathBuf::from("/w/.gitws")),
            })
            .into();
        assert!(error.hint().unwrap().contains("gitws convert"));
    }

    #[test]
    fn test_no_hint_for_other_errors() {
        let error = GitwsError::filesystem_error("Failed to write report", None);
        assert_eq!(
            error.to_string(),
            "File system operation failed: Failed to write report"
        );
        assert!(error.hint().is_none());
    }

    #[test]
    fn test_error_conversion_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: GitwsError = io_error.into();
        assert!(matches!(error, GitwsError::FileSystemError { .. }));
    }
}
