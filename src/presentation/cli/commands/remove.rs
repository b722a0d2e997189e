use crate::common::result::GitwsResult;
use crate::presentation::cli::context::CommandContext;

/// Unregister a repository
pub struct RemoveCommand {
    pub name: String,
}

impl RemoveCommand {
    pub fn new(name: String) -> Self {
        Self { name }
    }

    pub fn execute(&self, ctx: &CommandContext) -> GitwsResult<i32> {
        let workspace = ctx.discover_workspace()?;
        ctx.record_history(&workspace);

        ctx.manage_repositories().remove(&workspace, &self.name)?;
        ctx.display
            .success(&format!("Removed {}", ctx.display.format_repo(&self.name)));
        Ok(0)
    }
}
