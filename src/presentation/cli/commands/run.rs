use std::io::{self, Write};

use crate::common::result::{GitwsResult, ResultExt};
use crate::presentation::cli::context::CommandContext;
use crate::presentation::ui::report::ReportRenderer;

/// Run a version-control command in one repository
pub struct RunCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl RunCommand {
    pub fn new(name: String, args: Vec<String>) -> Self {
        Self { name, args }
    }

    /// Exit code is the one of the underlying command
    pub async fn execute(&self, ctx: &CommandContext) -> GitwsResult<i32> {
        let workspace = ctx.discover_workspace()?;
        ctx.record_history(&workspace);
        let config = ctx.load_config(&workspace)?;
        let command = ctx.command_line(&self.args)?;

        let result = ctx
            .dispatcher()?
            .dispatch_one(&config, &self.name, &command)
            .await?;

        let renderer = ReportRenderer::new(ctx.display.use_color);
        let mut out = io::stdout();
        renderer
            .write_block(&mut out, &result)
            .and_then(|_| out.flush())
            .with_filesystem_error("Failed to write report", None)?;

        Ok(exit_code(result.exit_status))
    }
}

/// Process exit code for a command's exit status
fn exit_code(exit_status: Option<i32>) -> i32 {
    match exit_status {
        Some(code) if (0..=255).contains(&code) => code,
        Some(_) | None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(Some(0)), 0);
        assert_eq!(exit_code(Some(128)), 128);
        assert_eq!(exit_code(Some(-1)), 1);
        assert_eq!(exit_code(None), 1);
    }
}
