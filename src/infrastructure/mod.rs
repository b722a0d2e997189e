/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - File system operations (config files, legacy migration, history, scanning)
/// - Process execution (command runner)
pub mod filesystem;
pub mod process;

// Re-export commonly used types
pub use filesystem::{
    ConfigStore, ConfigStoreError, HistoryLog, LegacyConfigError, LegacyConfigReader,
    WorkspaceScanner,
};
pub use process::{CommandRunner, CommandRunnerError, ProcessCommandRunner, RunOutput};
