//! Command runner doubles
//!
//! These record every invocation and can delay individual repositories so
//! tests control completion order.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gitws::domain::value_objects::command_line::CommandLine;
use gitws::infrastructure::process::command_runner::{CommandRunner, CommandRunnerError, RunOutput};

/// Behaviour of the scripted runner for one working directory
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub delay: Duration,
    pub exit_status: i32,
    pub output: String,
    pub spawn_error: bool,
}

/// Runner answering from per-directory scripts
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    /// Scripts keyed by the last component of the working directory
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    /// Call history for verification
    call_history: Arc<Mutex<Vec<PathBuf>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, dir_name: &str, script: Script) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(dir_name.to_string(), script);
        self
    }

    /// Delay the answer for `dir_name`
    pub fn delay(self, dir_name: &str, delay: Duration) -> Self {
        self.script(
            dir_name,
            Script {
                delay,
                output: format!("{}\n", dir_name),
                ..Default::default()
            },
        )
    }

    /// Get call history for verification
    pub fn get_call_history(&self) -> Vec<PathBuf> {
        self.call_history.lock().unwrap().clone()
    }

    /// Largest number of concurrent invocations observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        command: &CommandLine,
        working_directory: &Path,
    ) -> Result<RunOutput, CommandRunnerError> {
        self.call_history
            .lock()
            .unwrap()
            .push(working_directory.to_path_buf());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let dir_name = working_directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(&dir_name)
            .cloned()
            .unwrap_or_default();

        tokio::time::sleep(script.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if script.spawn_error {
            return Err(CommandRunnerError::SpawnFailed {
                command: command.to_string(),
                working_directory: working_directory.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted failure"),
            });
        }
        Ok(RunOutput::new(
            script.exit_status,
            script.output,
            script.delay.as_millis() as u64,
        ))
    }
}
