use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Name of the synthetic record standing for the workspace root
pub const ROOT_REPOSITORY_NAME: &str = "Root";

static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn name_pattern() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| Regex::new(r"^[^\s/\\]+$").expect("repository name pattern is valid"))
}

/// A named reference to a directory expected to hold a checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    /// Unique, case-sensitive name within a workspace
    pub name: String,

    /// Checkout location, relative to the workspace root or absolute
    pub path: PathBuf,
}

impl RepositoryRecord {
    /// Create a new record
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Synthetic record pointing at the workspace root
    pub fn root(root: &Path) -> Self {
        Self::new(ROOT_REPOSITORY_NAME, root)
    }

    /// Whether `name` is usable as a repository name.
    ///
    /// Names must be non-empty and contain neither whitespace nor path separators.
    pub fn is_valid_name(name: &str) -> bool {
        name_pattern().is_match(name)
    }

    /// Whether this record is the synthetic root entry
    pub fn is_root(&self) -> bool {
        self.name == ROOT_REPOSITORY_NAME
    }
}
