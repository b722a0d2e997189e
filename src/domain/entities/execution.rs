use crate::domain::value_objects::command_line::CommandLine;
use std::path::PathBuf;

/// Terminal state of one repository within a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// The command ran to completion, whatever its exit status
    Completed,
    /// The checkout was unreachable; nothing was run
    Skipped,
    /// The program could not be launched
    SpawnFailed,
    /// The program exceeded the configured timeout and was killed
    TimedOut,
}

/// Outcome of running one command line in one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Name of the target repository
    pub repository_name: String,

    /// Resolved checkout directory
    pub working_directory: PathBuf,

    /// Command line that was (or would have been) run
    pub command_line: CommandLine,

    /// Terminal state
    pub status: ExecutionStatus,

    /// Exit status, only set for completed runs
    pub exit_status: Option<i32>,

    /// Standard output followed by standard error
    pub combined_output: String,

    /// Launch failure or timeout description
    pub error_message: Option<String>,

    /// Wall-clock time spent in the external process
    pub execution_time_ms: u64,
}

impl ExecutionResult {
    fn base(
        repository_name: impl Into<String>,
        working_directory: impl Into<PathBuf>,
        command_line: CommandLine,
        status: ExecutionStatus,
    ) -> Self {
        Self {
            repository_name: repository_name.into(),
            working_directory: working_directory.into(),
            command_line,
            status,
            exit_status: None,
            combined_output: String::new(),
            error_message: None,
            execution_time_ms: 0,
        }
    }

    /// A run that finished with `exit_status`
    pub fn completed(
        repository_name: impl Into<String>,
        working_directory: impl Into<PathBuf>,
        command_line: CommandLine,
        exit_status: i32,
        combined_output: impl Into<String>,
        execution_time_ms: u64,
    ) -> Self {
        let mut result = Self::base(
            repository_name,
            working_directory,
            command_line,
            ExecutionStatus::Completed,
        );
        result.exit_status = Some(exit_status);
        result.combined_output = combined_output.into();
        result.execution_time_ms = execution_time_ms;
        result
    }

    /// An unreachable target; no process was started
    pub fn skipped(
        repository_name: impl Into<String>,
        working_directory: impl Into<PathBuf>,
        command_line: CommandLine,
    ) -> Self {
        Self::base(
            repository_name,
            working_directory,
            command_line,
            ExecutionStatus::Skipped,
        )
    }

    /// The program could not be launched
    pub fn spawn_failed(
        repository_name: impl Into<String>,
        working_directory: impl Into<PathBuf>,
        command_line: CommandLine,
        message: impl Into<String>,
    ) -> Self {
        let mut result = Self::base(
            repository_name,
            working_directory,
            command_line,
            ExecutionStatus::SpawnFailed,
        );
        result.error_message = Some(message.into());
        result
    }

    /// The program was killed after `timeout_seconds`
    pub fn timed_out(
        repository_name: impl Into<String>,
        working_directory: impl Into<PathBuf>,
        command_line: CommandLine,
        timeout_seconds: u64,
    ) -> Self {
        let mut result = Self::base(
            repository_name,
            working_directory,
            command_line,
            ExecutionStatus::TimedOut,
        );
        result.error_message = Some(format!(
            "Command timed out after {} seconds",
            timeout_seconds
        ));
        result.execution_time_ms = timeout_seconds.saturating_mul(1000);
        result
    }

    /// Whether the checkout was present when dispatching
    pub fn is_reachable(&self) -> bool {
        self.status != ExecutionStatus::Skipped
    }

    /// Completed with exit status zero
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Completed && self.exit_status == Some(0)
    }

    /// Ran but did not succeed, or could not run at all
    pub fn is_failure(&self) -> bool {
        match self.status {
            ExecutionStatus::Completed => self.exit_status != Some(0),
            ExecutionStatus::SpawnFailed | ExecutionStatus::TimedOut => true,
            ExecutionStatus::Skipped => false,
        }
    }
}
