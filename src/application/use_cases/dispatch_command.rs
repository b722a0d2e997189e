use futures::stream::{FuturesUnordered, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::application::services::result_sequencer::{ResultSequencer, SequencerError};
use crate::domain::entities::{execution::ExecutionResult, workspace_config::WorkspaceConfig};
use crate::domain::value_objects::{command_line::CommandLine, vcs_kind::VcsKind};
use crate::infrastructure::process::command_runner::{CommandRunner, CommandRunnerError, RunOutput};

/// Default number of concurrent invocations
pub const DEFAULT_POOL_SIZE: usize = 8;

/// Environment variable overriding the pool size
pub const POOL_SIZE_ENV: &str = "GITWS_JOBS";

/// Dispatch errors
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Repository '{name}' could not be found at {}", .path.display())]
    RepositoryUnreachable { name: String, path: PathBuf },

    #[error(transparent)]
    Runner(#[from] CommandRunnerError),

    #[error("Invalid pool size '{0}': expected a positive integer")]
    InvalidPoolSize(String),

    #[error("Result sequencing failed: {0}")]
    Sequencing(#[from] SequencerError),
}

/// Dispatcher settings
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Maximum number of commands in flight
    pub pool_size: usize,

    /// Entry that must exist inside a checkout for it to be reachable
    pub marker: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            marker: VcsKind::default().metadata_dir().to_string(),
        }
    }
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the pool size taken from `GITWS_JOBS` when set
    pub fn from_env() -> Result<Self, DispatchError> {
        Self::from_env_value(std::env::var(POOL_SIZE_ENV).ok().as_deref())
    }

    /// Defaults, with the pool size taken from `value` when present
    pub fn from_env_value(value: Option<&str>) -> Result<Self, DispatchError> {
        let config = Self::default();
        match value {
            Some(value) => config.with_pool_size(Self::parse_pool_size(value)?),
            None => Ok(config),
        }
    }

    /// Parse a user-supplied pool size
    pub fn parse_pool_size(value: &str) -> Result<usize, DispatchError> {
        match value.trim().parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(DispatchError::InvalidPoolSize(value.to_string())),
        }
    }

    /// Set the pool size; zero is rejected
    pub fn with_pool_size(mut self, pool_size: usize) -> Result<Self, DispatchError> {
        if pool_size == 0 {
            return Err(DispatchError::InvalidPoolSize(pool_size.to_string()));
        }
        self.pool_size = pool_size;
        Ok(self)
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Use the metadata directory of `vcs` as marker
    pub fn with_vcs(self, vcs: VcsKind) -> Self {
        self.with_marker(vcs.metadata_dir())
    }
}

/// Receives dispatch progress.
///
/// `on_completed` sees results in completion order, `on_ready` sees them in
/// configuration order as soon as every earlier result is known.
pub trait DispatchObserver: Send {
    fn on_dispatch_started(&mut self, _total: usize, _reachable: usize) {}

    fn on_completed(&mut self, _result: &ExecutionResult) {}

    fn on_ready(&mut self, _result: &ExecutionResult) {}
}

/// Observer that ignores every event
#[derive(Debug, Default)]
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}

/// Runs one command line against the repositories of a workspace
pub struct Dispatcher {
    runner: Arc<dyn CommandRunner>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(runner: Arc<dyn CommandRunner>, config: DispatchConfig) -> Self {
        Self { runner, config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Whether `path` is a directory holding the checkout marker
    pub fn is_reachable(&self, path: &Path) -> bool {
        path.is_dir() && path.join(&self.config.marker).exists()
    }

    /// Run `command` in every target, returning results in configuration order
    pub async fn dispatch_all(
        &self,
        workspace_config: &WorkspaceConfig,
        command: &CommandLine,
    ) -> Result<Vec<ExecutionResult>, DispatchError> {
        self.dispatch_all_with(workspace_config, command, &mut NoopObserver)
            .await
    }

    /// [`Dispatcher::dispatch_all`], reporting progress to `observer`
    pub async fn dispatch_all_with(
        &self,
        workspace_config: &WorkspaceConfig,
        command: &CommandLine,
        observer: &mut dyn DispatchObserver,
    ) -> Result<Vec<ExecutionResult>, DispatchError> {
        let start_time = Instant::now();
        let targets: Vec<(String, PathBuf, bool)> = workspace_config
            .targets()
            .into_iter()
            .map(|target| {
                let path = workspace_config.resolve_path(&target);
                let reachable = self.is_reachable(&path);
                (target.name, path, reachable)
            })
            .collect();

        let reachable_count = targets.iter().filter(|(_, _, reachable)| *reachable).count();
        observer.on_dispatch_started(targets.len(), reachable_count);
        info!(
            command = %command,
            targets = targets.len(),
            reachable = reachable_count,
            pool_size = self.config.pool_size,
            "dispatching to all repositories"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.pool_size));
        let mut sequencer = ResultSequencer::new(targets.len());
        let mut in_flight = FuturesUnordered::new();

        for (index, (name, path, reachable)) in targets.iter().enumerate() {
            if !reachable {
                debug!(repository = %name, path = %path.display(), "skipping unreachable repository");
                let result = ExecutionResult::skipped(name.clone(), path.clone(), command.clone());
                Self::record(&mut sequencer, index, result, observer)?;
                continue;
            }

            let runner = Arc::clone(&self.runner);
            let semaphore = Arc::clone(&semaphore);
            let command = command.clone();
            let name = name.clone();
            let path = path.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return ExecutionResult::spawn_failed(name, path, command, e.to_string()),
                };
                debug!(repository = %name, "running");
                let outcome = runner.run(&command, &path).await;
                Self::to_result(name, path, command, outcome)
            });
            in_flight.push(async move { (index, handle.await) });
        }

        while let Some((index, joined)) = in_flight.next().await {
            let result = joined.unwrap_or_else(|e| {
                let (name, path, _) = &targets[index];
                ExecutionResult::spawn_failed(
                    name.clone(),
                    path.clone(),
                    command.clone(),
                    format!("Execution task failed: {}", e),
                )
            });
            Self::record(&mut sequencer, index, result, observer)?;
        }

        debug_assert!(sequencer.is_complete());
        let results = sequencer.into_results();
        let failures = results.iter().filter(|r| r.is_failure()).count();
        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(failures, elapsed_ms, "dispatch finished");
        Ok(results)
    }

    /// Run `command` in the target called `name`.
    ///
    /// Nothing is run when the name is unknown or the checkout is unreachable.
    pub async fn dispatch_one(
        &self,
        workspace_config: &WorkspaceConfig,
        name: &str,
        command: &CommandLine,
    ) -> Result<ExecutionResult, DispatchError> {
        let target = workspace_config
            .find_target(name)
            .ok_or_else(|| DispatchError::RepositoryNotFound(name.to_string()))?;

        let path = workspace_config.resolve_path(&target);
        if !self.is_reachable(&path) {
            return Err(DispatchError::RepositoryUnreachable {
                name: target.name,
                path,
            });
        }

        debug!(repository = %target.name, command = %command, "dispatching to one repository");
        let output = self.runner.run(command, &path).await?;
        Ok(ExecutionResult::completed(
            target.name,
            path,
            command.clone(),
            output.exit_status,
            output.combined_output,
            output.execution_time_ms,
        ))
    }

    fn record(
        sequencer: &mut ResultSequencer<ExecutionResult>,
        index: usize,
        result: ExecutionResult,
        observer: &mut dyn DispatchObserver,
    ) -> Result<(), DispatchError> {
        observer.on_completed(&result);
        for ready in sequencer.push(index, result)? {
            observer.on_ready(ready);
        }
        Ok(())
    }

    fn to_result(
        name: String,
        path: PathBuf,
        command: CommandLine,
        outcome: Result<RunOutput, CommandRunnerError>,
    ) -> ExecutionResult {
        match outcome {
            Ok(output) => ExecutionResult::completed(
                name,
                path,
                command,
                output.exit_status,
                output.combined_output,
                output.execution_time_ms,
            ),
            Err(CommandRunnerError::Timeout { timeout_seconds, .. }) => {
                ExecutionResult::timed_out(name, path, command, timeout_seconds)
            }
            Err(e) => ExecutionResult::spawn_failed(name, path, command, e.to_string()),
        }
    }
}
