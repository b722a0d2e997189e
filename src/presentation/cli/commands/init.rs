use crate::application::use_cases::manage_repositories::InitOptions;
use crate::common::result::GitwsResult;
use crate::domain::entities::workspace::Workspace;
use crate::presentation::cli::context::CommandContext;

/// Create `.gitws.yml` in the current directory
pub struct InitCommand {
    pub ignore_root: bool,
    pub scan: bool,
}

impl InitCommand {
    pub fn new(ignore_root: bool, scan: bool) -> Self {
        Self { ignore_root, scan }
    }

    pub fn execute(&self, ctx: &CommandContext) -> GitwsResult<i32> {
        let workspace = Workspace::new(&ctx.current_dir);
        let options = InitOptions {
            include_root: !self.ignore_root,
            scan: self.scan,
        };
        let config = ctx.manage_repositories().init(&workspace, &options)?;
        ctx.record_history(&workspace);

        ctx.display.success(&format!(
            "Initialized workspace at {}",
            ctx.display.format_path(&workspace.root_path.display().to_string())
        ));
        if self.scan && config.repositories.is_empty() {
            ctx.display.warning("No checkouts found below the workspace root");
        } else if self.scan {
            ctx.display.info(&format!(
                "Registered {} repositories",
                config.repositories.len()
            ));
            for record in &config.repositories {
                println!(
                    "  {} -> {}",
                    ctx.display.format_repo(&record.name),
                    record.path.display()
                );
            }
        }
        Ok(0)
    }
}
