use crate::common::result::GitwsResult;
use crate::presentation::cli::{context::CommandContext, OutputFormat};

/// Show every dispatch target
pub struct ListCommand {
    pub output: OutputFormat,
}

impl ListCommand {
    pub fn new(output: OutputFormat) -> Self {
        Self { output }
    }

    pub fn execute(&self, ctx: &CommandContext) -> GitwsResult<i32> {
        let workspace = ctx.discover_workspace()?;
        ctx.record_history(&workspace);
        let listing = ctx.manage_repositories().list(&workspace)?;

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&listing)?),
            OutputFormat::Text => {
                if listing.is_empty() {
                    ctx.display.info("No repositories registered");
                    return Ok(0);
                }
                let rows: Vec<Vec<String>> = listing
                    .iter()
                    .map(|entry| {
                        vec![
                            entry.name.clone(),
                            entry.path.display().to_string(),
                            if entry.reachable { "ok" } else { "missing" }.to_string(),
                        ]
                    })
                    .collect();
                ctx.display.print_table(&["NAME", "PATH", "STATUS"], &rows);
            }
        }
        Ok(0)
    }
}
