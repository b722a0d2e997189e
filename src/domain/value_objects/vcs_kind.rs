use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version control system a workspace is made of
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    /// Git
    #[default]
    Git,
    /// Mercurial
    Mercurial,
    /// Subversion
    Subversion,
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsKind::Git => write!(f, "git"),
            VcsKind::Mercurial => write!(f, "hg"),
            VcsKind::Subversion => write!(f, "svn"),
        }
    }
}

impl FromStr for VcsKind {
    type Err = VcsKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "git" => Ok(VcsKind::Git),
            "hg" | "mercurial" => Ok(VcsKind::Mercurial),
            "svn" | "subversion" => Ok(VcsKind::Subversion),
            _ => Err(VcsKindError::Unsupported(s.to_string())),
        }
    }
}

impl VcsKind {
    /// Metadata directory whose presence marks a checkout
    pub fn metadata_dir(&self) -> &'static str {
        match self {
            VcsKind::Git => ".git",
            VcsKind::Mercurial => ".hg",
            VcsKind::Subversion => ".svn",
        }
    }

    /// Standard executable name
    pub fn executable_name(&self) -> &'static str {
        match self {
            VcsKind::Git => "git",
            VcsKind::Mercurial => "hg",
            VcsKind::Subversion => "svn",
        }
    }
}

/// Errors that can occur when parsing a VCS kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsKindError {
    /// The named VCS is not supported
    Unsupported(String),
}

impl fmt::Display for VcsKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsKindError::Unsupported(name) => {
                write!(f, "Unsupported VCS: '{}'. Supported kinds are: git, hg, svn", name)
            }
        }
    }
}

impl std::error::Error for VcsKindError {}
