use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::entities::repository::{RepositoryRecord, ROOT_REPOSITORY_NAME};

// Directories never worth descending into
const SKIP_DIRECTORIES: &[&str] = &["node_modules", "target", "vendor", ".venv", "__pycache__"];

const UNNAMED_REPOSITORY: &str = "repo";

/// Finds checkouts nested below a workspace root
#[derive(Debug, Clone)]
pub struct WorkspaceScanner {
    marker: String,
}

impl WorkspaceScanner {
    /// Scanner recognising directories that contain `marker`
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Every checkout strictly below `root`, in sorted path order, with paths
    /// relative to `root`. The root itself is not reported.
    pub fn scan(&self, root: &Path) -> Vec<RepositoryRecord> {
        let marker = self.marker.as_str();
        let mut used_names: HashSet<String> = HashSet::new();
        let mut records = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.file_type().is_dir()
                    && e.file_name()
                        .to_str()
                        .map_or(true, |name| name != marker && !SKIP_DIRECTORIES.contains(&name))
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory while scanning");
                    None
                }
            });

        for entry in walker {
            if !entry.path().join(marker).is_dir() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };

            let base_name = Self::base_name(&entry.file_name().to_string_lossy());
            let mut name = base_name.clone();
            let mut suffix = 1;
            while name == ROOT_REPOSITORY_NAME || used_names.contains(&name) {
                suffix += 1;
                name = format!("{}-{}", base_name, suffix);
            }
            used_names.insert(name.clone());

            debug!(name = %name, path = %relative.display(), "found checkout");
            records.push(RepositoryRecord::new(name, relative));
        }

        records
    }

    fn base_name(file_name: &str) -> String {
        let cleaned: String = file_name
            .chars()
            .map(|c| if c.is_whitespace() || c == '\\' { '-' } else { c })
            .collect();
        if cleaned.is_empty() {
            UNNAMED_REPOSITORY.to_string()
        } else {
            cleaned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn checkout(root: &Path, relative: &str) {
        fs::create_dir_all(root.join(relative).join(".git")).unwrap();
    }

    #[test]
    fn test_scan_finds_nested_checkouts_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        checkout(root, "");
        checkout(root, "services/web");
        checkout(root, "api");
        checkout(root, "libs/api");
        checkout(root, "node_modules/dep");
        fs::create_dir_all(root.join("docs")).unwrap();

        let records = WorkspaceScanner::new(".git").scan(root);
        assert_eq!(
            records,
            vec![
                RepositoryRecord::new("api", "api"),
                RepositoryRecord::new("api-2", PathBuf::from("libs").join("api")),
                RepositoryRecord::new("web", PathBuf::from("services").join("web")),
            ]
        );
    }

    #[test]
    fn test_scan_uses_marker() {
        let temp_dir = TempDir::new().unwrap();
        checkout(temp_dir.path(), "git-one");
        fs::create_dir_all(temp_dir.path().join("hg-one").join(".hg")).unwrap();

        let records = WorkspaceScanner::new(".hg").scan(temp_dir.path());
        assert_eq!(records, vec![RepositoryRecord::new("hg-one", "hg-one")]);
    }

    #[test]
    fn test_scanned_names_are_valid() {
        let temp_dir = TempDir::new().unwrap();
        checkout(temp_dir.path(), "my repo");
        checkout(temp_dir.path(), "Root");

        let records = WorkspaceScanner::new(".git").scan(temp_dir.path());
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Root-2", "my-repo"]);
        assert!(records.iter().all(|r| RepositoryRecord::is_valid_name(&r.name)));
    }

    #[test]
    fn test_suffix_skips_taken_names() {
        let temp_dir = TempDir::new().unwrap();
        checkout(temp_dir.path(), "a/x");
        checkout(temp_dir.path(), "b/x-2");
        checkout(temp_dir.path(), "c/x");

        let records = WorkspaceScanner::new(".git").scan(temp_dir.path());
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["x", "x-2", "x-3"]);
    }

    #[test]
    fn test_scan_of_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let records = WorkspaceScanner::new(".git").scan(&temp_dir.path().join("gone"));
        assert!(records.is_empty());
    }
}
