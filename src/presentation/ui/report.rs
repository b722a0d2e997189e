use colored::Colorize;
use std::io::{self, Write};

use crate::domain::entities::execution::{ExecutionResult, ExecutionStatus};

/// Width of the report separators
pub const REPORT_WIDTH: usize = 80;

/// Formats execution results as bordered report blocks
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    pub use_color: bool,
    pub width: usize,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ReportRenderer {
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            width: REPORT_WIDTH,
        }
    }

    /// One block per result, in input order
    pub fn render(&self, results: &[ExecutionResult]) -> Vec<String> {
        results.iter().map(|r| self.render_block(r)).collect()
    }

    /// Render the block for a single result
    pub fn render_block(&self, result: &ExecutionResult) -> String {
        let heavy = "=".repeat(self.width);
        let light = "-".repeat(self.width);

        let header = format!(
            "{}: {}",
            result.repository_name.to_uppercase(),
            result.command_line
        );
        let header = if self.use_color {
            header.bold().to_string()
        } else {
            header
        };

        let mut block = String::new();
        block.push_str(&heavy);
        block.push('\n');
        block.push_str(&header);
        block.push('\n');
        block.push_str(&light);
        block.push('\n');
        block.push_str(&self.body(result));

        if let (ExecutionStatus::Completed, Some(code)) = (result.status, result.exit_status) {
            if code != 0 {
                let status_line = format!("exit status {}", code);
                if self.use_color {
                    block.push_str(&status_line.red().to_string());
                } else {
                    block.push_str(&status_line);
                }
                block.push('\n');
            }
        }

        block.push_str(&heavy);
        block.push('\n');
        block
    }

    /// Write the block of every result to `out`, in order
    pub fn write_blocks<W: Write>(&self, out: &mut W, results: &[ExecutionResult]) -> io::Result<()> {
        for result in results {
            self.write_block(out, result)?;
        }
        out.flush()
    }

    /// Write one block to `out`
    pub fn write_block<W: Write>(&self, out: &mut W, result: &ExecutionResult) -> io::Result<()> {
        out.write_all(self.render_block(result).as_bytes())
    }

    fn body(&self, result: &ExecutionResult) -> String {
        let mut body = match result.status {
            ExecutionStatus::Completed => result.combined_output.clone(),
            ExecutionStatus::Skipped => format!(
                "Repository {} could not be found at {}",
                result.repository_name,
                result.working_directory.display()
            ),
            ExecutionStatus::SpawnFailed | ExecutionStatus::TimedOut => result
                .error_message
                .clone()
                .unwrap_or_else(|| "Command could not be run".to_string()),
        };
        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::command_line::CommandLine;
    use pretty_assertions::assert_eq;

    fn command() -> CommandLine {
        CommandLine::new("git", ["status", "-s"]).unwrap()
    }

    fn line(c: char) -> String {
        std::iter::repeat(c).take(80).collect()
    }

    #[test]
    fn test_completed_block_layout() {
        let renderer = ReportRenderer::new(false);
        let result = ExecutionResult::completed("api", "/w/api", command(), 0, " M src/lib.rs\n", 4);

        let expected = format!(
            "{eq}\nAPI: git status -s\n{dash}\n M src/lib.rs\n{eq}\n",
            eq = line('='),
            dash = line('-')
        );
        assert_eq!(renderer.render_block(&result), expected);
    }

    #[test]
    fn test_nonzero_exit_is_reported() {
        let renderer = ReportRenderer::new(false);
        let result = ExecutionResult::completed("api", "/w/api", command(), 128, "fatal: oops", 4);

        let block = renderer.render_block(&result);
        assert!(block.contains("fatal: oops\nexit status 128\n"));
    }

    #[test]
    fn test_skipped_block() {
        let renderer = ReportRenderer::new(false);
        let result = ExecutionResult::skipped("web", "/w/web", command());

        let block = renderer.render_block(&result);
        assert!(block.contains("WEB: git status -s\n"));
        assert!(block.contains("Repository web could not be found at /w/web\n"));
        assert!(!block.contains("exit status"));
    }

    #[test]
    fn test_spawn_failure_block() {
        let renderer = ReportRenderer::new(false);
        let result = ExecutionResult::spawn_failed("api", "/w/api", command(), "No such file or directory");
        assert!(renderer
            .render_block(&result)
            .contains("No such file or directory\n"));
    }

    #[test]
    fn test_empty_output_has_no_blank_body() {
        let renderer = ReportRenderer::new(false);
        let result = ExecutionResult::completed("api", "/w/api", command(), 0, "", 1);
        let expected = format!(
            "{eq}\nAPI: git status -s\n{dash}\n{eq}\n",
            eq = line('='),
            dash = line('-')
        );
        assert_eq!(renderer.render_block(&result), expected);
    }

    #[test]
    fn test_write_blocks_preserves_order() {
        let renderer = ReportRenderer::new(false);
        let results = vec![
            ExecutionResult::completed("b", "/w/b", command(), 0, "second-name\n", 1),
            ExecutionResult::completed("a", "/w/a", command(), 0, "first-name\n", 1),
        ];

        let mut out = Vec::new();
        renderer.write_blocks(&mut out, &results).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, renderer.render(&results).concat());
        assert!(text.find("B: git").unwrap() < text.find("A: git").unwrap());
    }
}
