use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::command_line::display_quoted;

/// Append-only record of gitws invocations, one line each
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry stamped with the current time
    pub fn append(&self, args: &[String]) -> std::io::Result<()> {
        self.append_at(Utc::now(), args)
    }

    /// Append one entry stamped with `timestamp`
    pub fn append_at(&self, timestamp: DateTime<Utc>, args: &[String]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", Self::format_entry(timestamp, args))
    }

    fn format_entry(timestamp: DateTime<Utc>, args: &[String]) -> String {
        let quoted: Vec<String> = args.iter().map(|a| display_quoted(a)).collect();
        format!(
            "{}\t{}",
            timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            quoted.join(" ")
        )
    }
}
