use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::use_cases::{
    dispatch_command::{DispatchConfig, Dispatcher},
    manage_repositories::ManageRepositoriesUseCase,
};
use crate::common::result::GitwsResult;
use crate::domain::entities::{
    workspace::{Workspace, CONFIG_FILE_NAME},
    workspace_config::WorkspaceConfig,
};
use crate::domain::value_objects::{command_line::CommandLine, vcs_kind::VcsKind};
use crate::infrastructure::filesystem::{
    config_store::{ConfigStore, ConfigStoreError},
    history_log::HistoryLog,
};
use crate::infrastructure::process::command_runner::ProcessCommandRunner;
use crate::presentation::ui::display::DisplayHelper;

/// Settings shared by every subcommand of one invocation
pub struct CommandContext {
    pub current_dir: PathBuf,
    pub display: DisplayHelper,
    pub vcs: VcsKind,
    pub vcs_program: Option<String>,
    pub jobs: Option<usize>,
    pub timeout_seconds: Option<u64>,
    /// Raw arguments of this invocation, without the program name
    pub invocation: Vec<String>,
}

impl CommandContext {
    /// Locate the workspace enclosing the current directory
    pub fn discover_workspace(&self) -> GitwsResult<Workspace> {
        match Workspace::discover_workspace_root(&self.current_dir) {
            Some(root) => {
                debug!(root = %root.display(), "found workspace");
                Ok(Workspace::new(root))
            }
            None => {
                let legacy_config = Workspace::discover_legacy_root(&self.current_dir)
                    .map(|root| Workspace::new(root).legacy_config_path());
                Err(ConfigStoreError::ConfigMissing {
                    path: self.current_dir.join(CONFIG_FILE_NAME),
                    legacy_config,
                }
                .into())
            }
        }
    }

    /// Read the configuration of `workspace`
    pub fn load_config(&self, workspace: &Workspace) -> GitwsResult<WorkspaceConfig> {
        Ok(ConfigStore::new().load(&workspace.config_path())?)
    }

    pub fn manage_repositories(&self) -> ManageRepositoriesUseCase {
        ManageRepositoriesUseCase::new(ConfigStore::new()).with_vcs(self.vcs)
    }

    /// Program invoked in each repository
    pub fn program(&self) -> String {
        self.vcs_program
            .clone()
            .unwrap_or_else(|| self.vcs.executable_name().to_string())
    }

    /// Version-control command line for `args`
    pub fn command_line(&self, args: &[String]) -> GitwsResult<CommandLine> {
        Ok(CommandLine::new(self.program(), args.iter().cloned())?)
    }

    /// Dispatcher honouring `--jobs`, `GITWS_JOBS`, `--timeout` and the VCS kind
    pub fn dispatcher(&self) -> GitwsResult<Dispatcher> {
        let config = match self.jobs {
            Some(jobs) => DispatchConfig::new().with_pool_size(jobs)?,
            None => DispatchConfig::from_env()?,
        }
        .with_vcs(self.vcs);

        let runner = ProcessCommandRunner::new().with_timeout(self.timeout_seconds);
        Ok(Dispatcher::new(Arc::new(runner), config))
    }

    /// Append this invocation to the workspace history.
    ///
    /// A failure is logged and otherwise ignored.
    pub fn record_history(&self, workspace: &Workspace) {
        let log = HistoryLog::new(workspace.history_path());
        if let Err(e) = log.append(&self.invocation) {
            warn!(path = %log.path().display(), error = %e, "failed to append to history");
        }
    }
}
