use crate::common::result::GitwsResult;
use crate::domain::entities::workspace::Workspace;
use crate::presentation::cli::context::CommandContext;

/// Migrate a legacy `.gitws` file to `.gitws.yml`
pub struct ConvertCommand {
    pub force: bool,
}

impl ConvertCommand {
    pub fn new(force: bool) -> Self {
        Self { force }
    }

    pub fn execute(&self, ctx: &CommandContext) -> GitwsResult<i32> {
        let root = Workspace::discover_legacy_root(&ctx.current_dir)
            .unwrap_or_else(|| ctx.current_dir.clone());
        let workspace = Workspace::new(root);

        let config = ctx.manage_repositories().convert(&workspace, self.force)?;
        ctx.record_history(&workspace);

        ctx.display.success(&format!(
            "Converted {} into {} ({} repositories)",
            ctx.display.format_path(&workspace.legacy_config_path().display().to_string()),
            ctx.display.format_path(&workspace.config_path().display().to_string()),
            config.repositories.len()
        ));
        Ok(0)
    }
}
