pub mod config_store;
pub mod history_log;
pub mod legacy_config;
pub mod workspace_scanner;

pub use config_store::{ConfigStore, ConfigStoreError};
pub use history_log::HistoryLog;
pub use legacy_config::{LegacyConfigError, LegacyConfigReader};
pub use workspace_scanner::WorkspaceScanner;
