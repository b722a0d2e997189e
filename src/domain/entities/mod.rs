pub mod execution;
pub mod repository;
pub mod workspace;
pub mod workspace_config;

pub use execution::{ExecutionResult, ExecutionStatus};
pub use repository::{RepositoryRecord, ROOT_REPOSITORY_NAME};
pub use workspace::Workspace;
pub use workspace_config::{WorkspaceConfig, WorkspaceConfigError};
