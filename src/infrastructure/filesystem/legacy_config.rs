use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::entities::{repository::RepositoryRecord, workspace_config::WorkspaceConfig};

const KEY_PREFIX: &str = "gitws.";
const ROOT_KEY: &str = "root";
const IGNORE_ROOT_KEY: &str = "ignore_root";
const REPOSITORY_KEY_PREFIX: &str = "repo.";

/// Legacy configuration errors
#[derive(Debug, Error)]
pub enum LegacyConfigError {
    #[error("No legacy configuration found at {}", .0.display())]
    LegacyConfigMissing(PathBuf),

    #[error(
        "Legacy configuration {} is corrupt{}: {message}",
        .path.display(),
        .line.map(|line| format!(" at line {}", line)).unwrap_or_default()
    )]
    LegacyConfigCorrupt {
        path: PathBuf,
        /// Absent when the file as a whole is rejected
        line: Option<usize>,
        message: String,
    },

    #[error("Failed to read legacy configuration {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reader for the line-oriented `gitws.<key> = <value>` format of older releases
#[derive(Debug, Clone, Default)]
pub struct LegacyConfigReader;

impl LegacyConfigReader {
    pub fn new() -> Self {
        Self
    }

    /// Read and convert the legacy file at `path`.
    ///
    /// A missing `gitws.root` falls back to the directory holding the file.
    pub fn load(&self, path: &Path) -> Result<WorkspaceConfig, LegacyConfigError> {
        if !path.is_file() {
            return Err(LegacyConfigError::LegacyConfigMissing(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path).map_err(|source| LegacyConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let default_root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        self.parse(&contents, path, &default_root)
    }

    fn parse(
        &self,
        contents: &str,
        path: &Path,
        default_root: &Path,
    ) -> Result<WorkspaceConfig, LegacyConfigError> {
        let corrupt = |line: Option<usize>, message: String| LegacyConfigError::LegacyConfigCorrupt {
            path: path.to_path_buf(),
            line,
            message,
        };

        let mut root: Option<PathBuf> = None;
        let mut include_root = true;
        let mut config = WorkspaceConfig::new(default_root);

        for (index, raw_line) in contents.lines().enumerate() {
            let line_number = Some(index + 1);
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| corrupt(line_number, format!("expected 'key = value', got '{}'", line)))?;
            let (key, value) = (key.trim(), value.trim());

            let key = key
                .strip_prefix(KEY_PREFIX)
                .ok_or_else(|| corrupt(line_number, format!("unknown key '{}'", key)))?;

            if key == ROOT_KEY {
                if value.is_empty() {
                    return Err(corrupt(line_number, "empty root".to_string()));
                }
                let value = PathBuf::from(value);
                if !value.is_absolute() {
                    return Err(corrupt(
                        line_number,
                        format!("root must be an absolute path, got '{}'", value.display()),
                    ));
                }
                root = Some(value);
            } else if key == IGNORE_ROOT_KEY {
                include_root = !parse_bool(value)
                    .ok_or_else(|| corrupt(line_number, format!("expected a boolean, got '{}'", value)))?;
            } else if let Some(name) = key.strip_prefix(REPOSITORY_KEY_PREFIX) {
                if value.is_empty() {
                    return Err(corrupt(line_number, format!("empty path for '{}'", name)));
                }
                config = config
                    .with_repository_added(RepositoryRecord::new(name, value))
                    .map_err(|e| corrupt(line_number, e.to_string()))?;
            } else {
                warn!(key = %key, line = index + 1, "ignoring unknown legacy configuration key");
            }
        }

        if let Some(root) = root {
            config.root = root;
        }
        config.include_root = include_root;

        config.validate().map_err(|e| corrupt(None, e.to_string()))?;
        debug!(
            path = %path.display(),
            repositories = config.repositories.len(),
            "read legacy configuration"
        );
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
