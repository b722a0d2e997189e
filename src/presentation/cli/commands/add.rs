use std::path::PathBuf;

use crate::common::result::GitwsResult;
use crate::presentation::cli::context::CommandContext;

/// Register a repository
pub struct AddCommand {
    pub name: String,
    pub path: PathBuf,
}

impl AddCommand {
    pub fn new(name: String, path: PathBuf) -> Self {
        Self { name, path }
    }

    pub fn execute(&self, ctx: &CommandContext) -> GitwsResult<i32> {
        let workspace = ctx.discover_workspace()?;
        ctx.record_history(&workspace);

        // relative arguments are relative to where the user stands
        let path = ctx.current_dir.join(&self.path);
        let config = ctx.manage_repositories().add(&workspace, &self.name, &path)?;

        if let Some(record) = config.find_repository(&self.name) {
            ctx.display.success(&format!(
                "Added {} at {}",
                ctx.display.format_repo(&record.name),
                ctx.display.format_path(&record.path.display().to_string())
            ));
        }
        Ok(0)
    }
}
