use std::fmt;
use thiserror::Error;

/// Command line errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandLineError {
    #[error("Command program is empty")]
    EmptyProgram,
}

/// A program plus its ordered argument vector.
///
/// Arguments are handed to the process-spawn primitive one by one and are
/// never interpreted by a shell. The [`Display`](fmt::Display) form quotes
/// arguments containing whitespace and is meant for reports and logs only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Create a command line from a program and its arguments
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Result<Self, CommandLineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let program = program.into();
        if program.trim().is_empty() {
            return Err(CommandLineError::EmptyProgram);
        }

        Ok(Self {
            program,
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    /// Program to execute
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program, in order
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full argument vector including the program
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

/// Quote `arg` for display when it is empty or holds whitespace or quotes
pub fn display_quoted(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.argv().into_iter().map(display_quoted).collect();
        write!(f, "{}", rendered.join(" "))
    }
}
