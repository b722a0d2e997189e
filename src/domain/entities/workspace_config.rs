use super::repository::{RepositoryRecord, ROOT_REPOSITORY_NAME};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by workspace configuration rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceConfigError {
    #[error("Repository '{0}' already exists")]
    DuplicateRepository(String),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Invalid repository name '{0}': names must be non-empty and contain no whitespace or path separators")]
    InvalidRepositoryName(String),

    #[error("Repository name '{0}' is reserved for the workspace root")]
    ReservedRepositoryName(String),

    #[error("Workspace root must be an absolute path: {0}")]
    RelativeRoot(String),
}

/// The set of repositories making up a workspace.
///
/// `repositories` holds only the persisted records, in configuration order.
/// When `include_root` is set, [`WorkspaceConfig::targets`] materializes a
/// synthetic `Root` record in front of them; that record is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Absolute workspace root
    pub root: PathBuf,

    /// Persisted repository records, order preserved
    pub repositories: Vec<RepositoryRecord>,

    /// Whether the root itself is a dispatch target
    pub include_root: bool,
}

impl WorkspaceConfig {
    /// Create an empty configuration rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            repositories: Vec::new(),
            include_root: true,
        }
    }

    /// Replace the repository list
    pub fn with_repositories(mut self, repositories: Vec<RepositoryRecord>) -> Self {
        self.repositories = repositories;
        self
    }

    /// Set whether the root is a dispatch target
    pub fn with_include_root(mut self, include_root: bool) -> Self {
        self.include_root = include_root;
        self
    }

    /// Dispatch targets in order, with `Root` first when included
    pub fn targets(&self) -> Vec<RepositoryRecord> {
        let mut targets = Vec::with_capacity(self.repositories.len() + 1);
        if self.include_root {
            targets.push(RepositoryRecord::root(&self.root));
        }
        targets.extend(self.repositories.iter().cloned());
        targets
    }

    /// Look up a dispatch target by exact name
    pub fn find_target(&self, name: &str) -> Option<RepositoryRecord> {
        if self.include_root && name == ROOT_REPOSITORY_NAME {
            return Some(RepositoryRecord::root(&self.root));
        }
        self.find_repository(name).cloned()
    }

    /// Look up a persisted record by exact name
    pub fn find_repository(&self, name: &str) -> Option<&RepositoryRecord> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Absolute location of a record's checkout
    pub fn resolve_path(&self, record: &RepositoryRecord) -> PathBuf {
        self.resolve(&record.path)
    }

    /// Resolve a possibly-relative path against the root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Return a copy with `record` appended
    pub fn with_repository_added(
        mut self,
        record: RepositoryRecord,
    ) -> Result<Self, WorkspaceConfigError> {
        Self::check_name(&record.name)?;
        if self.find_repository(&record.name).is_some() {
            return Err(WorkspaceConfigError::DuplicateRepository(record.name));
        }
        self.repositories.push(record);
        Ok(self)
    }

    /// Return a copy without the record called `name`
    pub fn with_repository_removed(mut self, name: &str) -> Result<Self, WorkspaceConfigError> {
        let index = self
            .repositories
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| WorkspaceConfigError::RepositoryNotFound(name.to_string()))?;
        self.repositories.remove(index);
        Ok(self)
    }

    /// Check every invariant of a loaded or about-to-be-saved configuration
    pub fn validate(&self) -> Result<(), WorkspaceConfigError> {
        if !self.root.is_absolute() {
            return Err(WorkspaceConfigError::RelativeRoot(
                self.root.display().to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for record in &self.repositories {
            Self::check_name(&record.name)?;
            if !seen.insert(record.name.as_str()) {
                return Err(WorkspaceConfigError::DuplicateRepository(record.name.clone()));
            }
        }
        Ok(())
    }

    fn check_name(name: &str) -> Result<(), WorkspaceConfigError> {
        if !RepositoryRecord::is_valid_name(name) {
            return Err(WorkspaceConfigError::InvalidRepositoryName(name.to_string()));
        }
        if name == ROOT_REPOSITORY_NAME {
            return Err(WorkspaceConfigError::ReservedRepositoryName(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_config() -> WorkspaceConfig {
        WorkspaceConfig::new("/w")
            .with_include_root(false)
            .with_repositories(vec![
                RepositoryRecord::new("A", "a"),
                RepositoryRecord::new("B", "b"),
            ])
    }

    #[test]
    fn test_targets_preserve_order() {
        let config = sample_config();
        let names: Vec<_> = config.targets().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_root_materialized_first() {
        let config = sample_config().with_include_root(true);
        let targets = config.targets();

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0], RepositoryRecord::new("Root", "/w"));
        assert_eq!(targets[1].name, "A");
        // never part of the persisted list
        assert_eq!(config.repositories.len(), 2);
    }

    #[test]
    fn test_find_target() {
        let config = sample_config();
        assert_eq!(config.find_target("B").unwrap().path, PathBuf::from("b"));
        assert!(config.find_target("Root").is_none());
        assert!(config.find_target("a").is_none()); // case-sensitive

        let config = config.with_include_root(true);
        assert_eq!(config.find_target("Root").unwrap().path, PathBuf::from("/w"));
    }

    #[test]
    fn test_resolve_path() {
        let config = sample_config();
        assert_eq!(
            config.resolve_path(&RepositoryRecord::new("A", "a")),
            PathBuf::from("/w/a")
        );
        assert_eq!(
            config.resolve_path(&RepositoryRecord::new("X", "/elsewhere/x")),
            PathBuf::from("/elsewhere/x")
        );
    }

    #[test]
    fn test_add_repository() {
        let config = sample_config()
            .with_repository_added(RepositoryRecord::new("C", "c"))
            .unwrap();
        let names: Vec<_> = config.repositories.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_add_rejects_duplicates_and_bad_names() {
        assert_eq!(
            sample_config()
                .with_repository_added(RepositoryRecord::new("A", "elsewhere"))
                .unwrap_err(),
            WorkspaceConfigError::DuplicateRepository("A".to_string())
        );
        assert_eq!(
            sample_config()
                .with_repository_added(RepositoryRecord::new("Root", "r"))
                .unwrap_err(),
            WorkspaceConfigError::ReservedRepositoryName("Root".to_string())
        );
        assert!(matches!(
            sample_config().with_repository_added(RepositoryRecord::new("a b", "ab")),
            Err(WorkspaceConfigError::InvalidRepositoryName(_))
        ));
    }

    #[test]
    fn test_remove_repository() {
        let config = sample_config().with_repository_removed("A").unwrap();
        assert_eq!(config.repositories, vec![RepositoryRecord::new("B", "b")]);

        assert_eq!(
            sample_config().with_repository_removed("Z").unwrap_err(),
            WorkspaceConfigError::RepositoryNotFound("Z".to_string())
        );
    }

    #[test]
    fn test_validate() {
        assert!(sample_config().validate().is_ok());

        let relative = WorkspaceConfig::new("w");
        assert!(matches!(
            relative.validate(),
            Err(WorkspaceConfigError::RelativeRoot(_))
        ));

        let duplicated = sample_config().with_repositories(vec![
            RepositoryRecord::new("A", "a"),
            RepositoryRecord::new("A", "b"),
        ]);
        assert_eq!(
            duplicated.validate().unwrap_err(),
            WorkspaceConfigError::DuplicateRepository("A".to_string())
        );
    }
}
