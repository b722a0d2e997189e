use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::domain::entities::{
    repository::RepositoryRecord,
    workspace::Workspace,
    workspace_config::{WorkspaceConfig, WorkspaceConfigError},
};
use crate::domain::value_objects::vcs_kind::VcsKind;
use crate::infrastructure::filesystem::{
    config_store::{ConfigStore, ConfigStoreError},
    legacy_config::{LegacyConfigError, LegacyConfigReader},
    workspace_scanner::WorkspaceScanner,
};

/// Repository management errors
#[derive(Debug, Error)]
pub enum ManageRepositoriesError {
    #[error("Workspace already initialized: {} exists", .0.display())]
    WorkspaceAlreadyInitialized(PathBuf),

    #[error("Workspace root must be an absolute path: {}", .0.display())]
    RelativeWorkspaceRoot(PathBuf),

    #[error(transparent)]
    ConfigStore(#[from] ConfigStoreError),

    #[error(transparent)]
    Config(#[from] WorkspaceConfigError),

    #[error(transparent)]
    LegacyConfig(#[from] LegacyConfigError),
}

/// Options for `init`
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Whether the root itself is a dispatch target
    pub include_root: bool,

    /// Register every checkout found below the root
    pub scan: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            include_root: true,
            scan: false,
        }
    }
}

/// One row of `list` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryListing {
    pub name: String,
    pub path: PathBuf,
    pub resolved_path: PathBuf,
    pub reachable: bool,
}

/// Configuration edits: each one loads the file, applies a pure
/// `WorkspaceConfig -> WorkspaceConfig` step and saves the result.
#[derive(Debug, Clone)]
pub struct ManageRepositoriesUseCase {
    store: ConfigStore,
    vcs: VcsKind,
}

impl ManageRepositoriesUseCase {
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store,
            vcs: VcsKind::default(),
        }
    }

    pub fn with_vcs(mut self, vcs: VcsKind) -> Self {
        self.vcs = vcs;
        self
    }

    /// Create a configuration rooted at the workspace directory
    pub fn init(
        &self,
        workspace: &Workspace,
        options: &InitOptions,
    ) -> Result<WorkspaceConfig, ManageRepositoriesError> {
        let config_path = workspace.config_path();
        if self.store.config_exists(&config_path) {
            return Err(ManageRepositoriesError::WorkspaceAlreadyInitialized(config_path));
        }
        if !workspace.root_path.is_absolute() {
            return Err(ManageRepositoriesError::RelativeWorkspaceRoot(
                workspace.root_path.clone(),
            ));
        }

        let mut config =
            WorkspaceConfig::new(&workspace.root_path).with_include_root(options.include_root);
        if options.scan {
            let scanner = WorkspaceScanner::new(self.vcs.metadata_dir());
            for record in scanner.scan(&workspace.root_path) {
                config = config.with_repository_added(record)?;
            }
        }

        self.store.save(&config_path, &config)?;
        info!(
            root = %workspace.root_path.display(),
            repositories = config.repositories.len(),
            "initialized workspace"
        );
        Ok(config)
    }

    /// Append a record; `path` is stored relative to the root when inside it
    pub fn add(
        &self,
        workspace: &Workspace,
        name: &str,
        path: &Path,
    ) -> Result<WorkspaceConfig, ManageRepositoriesError> {
        let config_path = workspace.config_path();
        let config = self.store.load(&config_path)?;
        let stored_path = relative_to_root(&config.root, path);
        let config = config.with_repository_added(RepositoryRecord::new(name, stored_path))?;
        self.store.save(&config_path, &config)?;
        info!(repository = %name, "added repository");
        Ok(config)
    }

    /// Drop the record called `name`
    pub fn remove(
        &self,
        workspace: &Workspace,
        name: &str,
    ) -> Result<WorkspaceConfig, ManageRepositoriesError> {
        let config_path = workspace.config_path();
        let config = self.store.load(&config_path)?.with_repository_removed(name)?;
        self.store.save(&config_path, &config)?;
        info!(repository = %name, "removed repository");
        Ok(config)
    }

    /// Every dispatch target with its resolved path and reachability
    pub fn list(
        &self,
        workspace: &Workspace,
    ) -> Result<Vec<RepositoryListing>, ManageRepositoriesError> {
        let config = self.store.load(&workspace.config_path())?;
        let marker = self.vcs.metadata_dir();
        Ok(config
            .targets()
            .into_iter()
            .map(|record| {
                let resolved_path = config.resolve_path(&record);
                RepositoryListing {
                    reachable: resolved_path.is_dir() && resolved_path.join(marker).exists(),
                    name: record.name,
                    path: record.path,
                    resolved_path,
                }
            })
            .collect())
    }

    /// Rewrite the legacy file of the workspace into the current format
    pub fn convert(
        &self,
        workspace: &Workspace,
        force: bool,
    ) -> Result<WorkspaceConfig, ManageRepositoriesError> {
        let config_path = workspace.config_path();
        if !force && self.store.config_exists(&config_path) {
            return Err(ManageRepositoriesError::WorkspaceAlreadyInitialized(config_path));
        }

        let legacy_path = workspace.legacy_config_path();
        let config = LegacyConfigReader::new().load(&legacy_path)?;
        self.store.save(&config_path, &config)?;
        info!(
            from = %legacy_path.display(),
            to = %config_path.display(),
            repositories = config.repositories.len(),
            "converted legacy configuration"
        );
        Ok(config)
    }
}

/// Store `path` relative to `root` when it lies inside it
pub fn relative_to_root(root: &Path, path: &Path) -> PathBuf {
    if !path.is_absolute() {
        return path.to_path_buf();
    }

    let normalized = normalize(path);
    if normalized.starts_with(root) {
        match pathdiff::diff_paths(&normalized, root) {
            Some(relative) if relative.as_os_str().is_empty() => PathBuf::from("."),
            Some(relative) => relative,
            None => normalized,
        }
    } else {
        normalized
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Workspace, ManageRepositoriesUseCase) {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::new(temp_dir.path());
        (temp_dir, workspace, ManageRepositoriesUseCase::new(ConfigStore::new()))
    }

    fn names(config: &WorkspaceConfig) -> Vec<&str> {
        config.repositories.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_relative_to_root() {
        let root = Path::new("/w");
        assert_eq!(relative_to_root(root, Path::new("/w/a/b")), PathBuf::from("a/b"));
        assert_eq!(relative_to_root(root, Path::new("/w/x/../a")), PathBuf::from("a"));
        assert_eq!(relative_to_root(root, Path::new("/w")), PathBuf::from("."));
        assert_eq!(relative_to_root(root, Path::new("/other/a")), PathBuf::from("/other/a"));
        assert_eq!(relative_to_root(root, Path::new("rel")), PathBuf::from("rel"));
    }

    #[test]
    fn test_init_creates_empty_config() {
        let (_temp_dir, workspace, use_case) = setup();
        let config = use_case
            .init(&workspace, &InitOptions { include_root: false, scan: false })
            .unwrap();

        assert!(workspace.is_initialized());
        assert_eq!(config.root, workspace.root_path);
        assert!(config.repositories.is_empty());
        assert!(!config.include_root);
    }

    #[test]
    fn test_init_refuses_existing_config() {
        let (_temp_dir, workspace, use_case) = setup();
        use_case.init(&workspace, &InitOptions::default()).unwrap();

        let err = use_case.init(&workspace, &InitOptions::default()).unwrap_err();
        assert!(matches!(err, ManageRepositoriesError::WorkspaceAlreadyInitialized(_)));
    }

    #[test]
    fn test_init_with_scan() {
        let (temp_dir, workspace, use_case) = setup();
        fs::create_dir_all(temp_dir.path().join("b").join(".git")).unwrap();
        fs::create_dir_all(temp_dir.path().join("a").join(".git")).unwrap();

        let config = use_case
            .init(&workspace, &InitOptions { include_root: true, scan: true })
            .unwrap();
        assert_eq!(names(&config), vec!["a", "b"]);
    }

    #[test]
    fn test_add_and_remove() {
        let (temp_dir, workspace, use_case) = setup();
        use_case.init(&workspace, &InitOptions::default()).unwrap();

        use_case.add(&workspace, "api", Path::new("services/api")).unwrap();
        let config = use_case
            .add(&workspace, "web", &temp_dir.path().join("web"))
            .unwrap();
        assert_eq!(names(&config), vec!["api", "web"]);
        assert_eq!(config.repositories[1].path, PathBuf::from("web"));

        let err = use_case.add(&workspace, "api", Path::new("x")).unwrap_err();
        assert!(matches!(
            err,
            ManageRepositoriesError::Config(WorkspaceConfigError::DuplicateRepository(_))
        ));

        let config = use_case.remove(&workspace, "api").unwrap();
        assert_eq!(names(&config), vec!["web"]);

        let err = use_case.remove(&workspace, "api").unwrap_err();
        assert!(matches!(
            err,
            ManageRepositoriesError::Config(WorkspaceConfigError::RepositoryNotFound(_))
        ));

        // failed edits leave the file untouched
        let reloaded = ConfigStore::new().load(&workspace.config_path()).unwrap();
        assert_eq!(names(&reloaded), vec!["web"]);
    }

    #[test]
    fn test_edits_require_initialized_workspace() {
        let (_temp_dir, workspace, use_case) = setup();
        let err = use_case.add(&workspace, "api", Path::new("api")).unwrap_err();
        assert!(matches!(
            err,
            ManageRepositoriesError::ConfigStore(ConfigStoreError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn test_list_reports_reachability() {
        let (temp_dir, workspace, use_case) = setup();
        use_case.init(&workspace, &InitOptions::default()).unwrap();
        use_case.add(&workspace, "a", Path::new("a")).unwrap();
        use_case.add(&workspace, "b", Path::new("b")).unwrap();
        fs::create_dir_all(temp_dir.path().join("a").join(".git")).unwrap();

        let listing = use_case.list(&workspace).unwrap();
        let rows: Vec<_> = listing
            .iter()
            .map(|l| (l.name.as_str(), l.reachable))
            .collect();
        assert_eq!(rows, vec![("Root", false), ("a", true), ("b", false)]);
        assert_eq!(listing[1].resolved_path, temp_dir.path().join("a"));
    }

    #[test]
    fn test_convert_legacy_file() {
        let (temp_dir, workspace, use_case) = setup();
        fs::write(
            workspace.legacy_config_path(),
            format!(
                "gitws.root = {}\ngitws.ignore_root = true\ngitws.repo.b = b\ngitws.repo.a = a\n",
                temp_dir.path().display()
            ),
        )
        .unwrap();

        let config = use_case.convert(&workspace, false).unwrap();
        assert_eq!(names(&config), vec!["b", "a"]);
        assert!(!config.include_root);
        assert_eq!(ConfigStore::new().load(&workspace.config_path()).unwrap(), config);

        let err = use_case.convert(&workspace, false).unwrap_err();
        assert!(matches!(err, ManageRepositoriesError::WorkspaceAlreadyInitialized(_)));
        assert!(use_case.convert(&workspace, true).is_ok());
    }

    #[test]
    fn test_convert_without_legacy_file() {
        let (_temp_dir, workspace, use_case) = setup();
        let err = use_case.convert(&workspace, false).unwrap_err();
        assert!(matches!(
            err,
            ManageRepositoriesError::LegacyConfig(LegacyConfigError::LegacyConfigMissing(_))
        ));
    }
}
