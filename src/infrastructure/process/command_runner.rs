use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::debug;

use crate::domain::value_objects::command_line::CommandLine;

/// Command runner errors
///
/// A non-zero exit status is not an error; it is reported through [`RunOutput`].
#[derive(Debug, Error)]
pub enum CommandRunnerError {
    #[error("Failed to launch '{command}' in {}: {source}", working_directory.display())]
    SpawnFailed {
        command: String,
        working_directory: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Working directory does not exist: {}", .0.display())]
    MissingWorkingDirectory(PathBuf),

    #[error("Command '{command}' timed out after {timeout_seconds} seconds")]
    Timeout {
        command: String,
        timeout_seconds: u64,
    },

    #[error("Failed to collect output of '{command}': {source}")]
    OutputCollectionFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl CommandRunnerError {
    /// Whether the program never started
    pub fn is_spawn_error(&self) -> bool {
        matches!(
            self,
            Self::SpawnFailed { .. } | Self::MissingWorkingDirectory(_)
        )
    }
}

/// Captured outcome of a process that ran to exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code, `-1` when the process was terminated by a signal
    pub exit_status: i32,

    /// Standard output followed by standard error
    pub combined_output: String,

    /// Wall-clock execution time in milliseconds
    pub execution_time_ms: u64,
}

impl RunOutput {
    /// Create a new run output
    pub fn new(exit_status: i32, combined_output: impl Into<String>, execution_time_ms: u64) -> Self {
        Self {
            exit_status,
            combined_output: combined_output.into(),
            execution_time_ms,
        }
    }

    /// Whether the process exited with status zero
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

/// Runs one command line in one working directory
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` inside `working_directory` and wait for it to exit
    async fn run(
        &self,
        command: &CommandLine,
        working_directory: &Path,
    ) -> Result<RunOutput, CommandRunnerError>;
}

/// [`CommandRunner`] backed by real child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessCommandRunner {
    /// Optional per-command timeout in seconds
    timeout_seconds: Option<u64>,

    /// Extra environment variables for every child
    environment_variables: HashMap<String, String>,
}

impl ProcessCommandRunner {
    /// Create a runner with no timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands running longer than `timeout_seconds`
    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Add environment variable
    pub fn with_environment_variable(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.environment_variables.insert(key.into(), value.into());
        self
    }

    /// Configured timeout
    pub fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn build_command(&self, command: &CommandLine, working_directory: &Path) -> TokioCommand {
        let mut cmd = TokioCommand::new(command.program());
        cmd.args(command.args())
            .current_dir(working_directory)
            .envs(&self.environment_variables)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run(
        &self,
        command: &CommandLine,
        working_directory: &Path,
    ) -> Result<RunOutput, CommandRunnerError> {
        if !working_directory.is_dir() {
            return Err(CommandRunnerError::MissingWorkingDirectory(
                working_directory.to_path_buf(),
            ));
        }

        let start_time = Instant::now();
        debug!(command = %command, dir = %working_directory.display(), "spawning");

        let child = self
            .build_command(command, working_directory)
            .spawn()
            .map_err(|source| CommandRunnerError::SpawnFailed {
                command: command.to_string(),
                working_directory: working_directory.to_path_buf(),
                source,
            })?;

        // wait_with_output drains both pipes concurrently, so a chatty stderr
        // cannot block the child while stdout is being read.
        let output = match self.timeout_seconds {
            Some(timeout_seconds) => {
                match timeout(Duration::from_secs(timeout_seconds), child.wait_with_output()).await {
                    Ok(output) => output,
                    Err(_) => {
                        return Err(CommandRunnerError::Timeout {
                            command: command.to_string(),
                            timeout_seconds,
                        })
                    }
                }
            }
            None => child.wait_with_output().await,
        }
        .map_err(|source| CommandRunnerError::OutputCollectionFailed {
            command: command.to_string(),
            source,
        })?;

        let mut combined_output = String::from_utf8_lossy(&output.stdout).into_owned();
        combined_output.push_str(&String::from_utf8_lossy(&output.stderr));

        let exit_status = output.status.code().unwrap_or(-1);
        let execution_time_ms = start_time.elapsed().as_millis() as u64;
        debug!(command = %command, exit_status, execution_time_ms, "finished");

        Ok(RunOutput::new(exit_status, combined_output, execution_time_ms))
    }
}
