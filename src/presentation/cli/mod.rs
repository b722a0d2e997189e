pub mod commands;
pub mod context;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::EnvFilter;

use crate::common::error::GitwsError;
use crate::common::result::{GitwsResult, ResultExt};
use crate::domain::value_objects::vcs_kind::VcsKind;
use crate::presentation::ui::display::DisplayHelper;
use commands::{
    AddCommand, AllCommand, ConvertCommand, InitCommand, ListCommand, RemoveCommand, RunCommand,
};
use context::CommandContext;

/// Environment variable holding the tracing filter
pub const LOG_ENV: &str = "GITWS_LOG";

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GITWS_GIT_HASH"),
    ", built ",
    env!("GITWS_BUILD_DATE"),
    " for ",
    env!("GITWS_BUILD_TARGET"),
    ")"
);

/// Output format options for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// gitws - Treat a tree of checkouts as one workspace
#[derive(Parser, Debug)]
#[command(name = "gitws")]
#[command(about = "Run version-control commands across a workspace of checkouts")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Maximum number of concurrent commands [default: $GITWS_JOBS or 8]
    #[arg(short, long, global = true, value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Kill commands running longer than this many seconds
    #[arg(long, global = true, env = "GITWS_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Version control system of the checkouts (git, hg, svn)
    #[arg(long, global = true, env = "GITWS_VCS", default_value_t = VcsKind::Git)]
    pub vcs: VcsKind,

    /// Program to run instead of the standard VCS executable
    #[arg(long, global = true, env = "GITWS_VCS_PROGRAM")]
    pub vcs_program: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a workspace in the current directory
    Init {
        /// Do not run commands in the workspace root itself
        #[arg(long)]
        ignore_root: bool,

        /// Register every checkout found below the current directory
        #[arg(long)]
        scan: bool,
    },

    /// Register a repository
    Add {
        /// Unique repository name
        name: String,

        /// Checkout location
        path: PathBuf,
    },

    /// Unregister a repository
    Remove {
        /// Repository name
        name: String,
    },

    /// List the repositories of the workspace
    List {
        /// Output format (text, json, yaml)
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Convert a legacy .gitws file into .gitws.yml
    Convert {
        /// Overwrite an existing .gitws.yml
        #[arg(short, long)]
        force: bool,
    },

    /// Run a command in one repository
    Run {
        /// Repository name
        name: String,

        /// Arguments for the VCS program
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run a command in every repository
    All {
        /// Arguments for the VCS program
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn parse_jobs(value: &str) -> Result<usize, String> {
    crate::application::use_cases::dispatch_command::DispatchConfig::parse_pool_size(value)
        .map_err(|e| e.to_string())
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
    invocation: Vec<String>,
}

impl CliApp {
    pub fn new() -> Self {
        Self::from_args(env::args())
    }

    /// Parse `args`, the first of which is the program name
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let invocation = args.iter().skip(1).cloned().collect();
        Self {
            cli: Cli::parse_from(args),
            invocation,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        Self::init_tracing(self.cli.verbose);

        let display = DisplayHelper::detect(self.cli.no_color);
        colored::control::set_override(display.use_color);

        // Handle the command
        match self.handle_command(display).await {
            Ok(0) => Ok(()),
            Ok(code) => exit(code),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                if let Some(hint) = e.downcast_ref::<GitwsError>().and_then(GitwsError::hint) {
                    eprintln!("{} {}", "Hint:".yellow().bold(), hint);
                }
                exit(1);
            }
        }
    }

    fn init_tracing(verbose: bool) {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    async fn handle_command(&self, display: DisplayHelper) -> anyhow::Result<i32> {
        let ctx = self.context(display)?;

        let code = match &self.cli.command {
            Commands::Init { ignore_root, scan } => {
                InitCommand::new(*ignore_root, *scan).execute(&ctx)?
            }
            Commands::Add { name, path } => {
                AddCommand::new(name.clone(), path.clone()).execute(&ctx)?
            }
            Commands::Remove { name } => RemoveCommand::new(name.clone()).execute(&ctx)?,
            Commands::List { output } => ListCommand::new(*output).execute(&ctx)?,
            Commands::Convert { force } => ConvertCommand::new(*force).execute(&ctx)?,
            Commands::Run { name, args } => {
                RunCommand::new(name.clone(), args.clone())
                    .execute(&ctx)
                    .await?
            }
            Commands::All { args } => AllCommand::new(args.clone()).execute(&ctx).await?,
        };
        Ok(code)
    }

    fn context(&self, display: DisplayHelper) -> GitwsResult<CommandContext> {
        // Change directory if specified
        if let Some(ref dir) = self.cli.directory {
            env::set_current_dir(dir)
                .with_filesystem_error("Failed to change directory", Some(dir.clone()))?;
        }
        let current_dir =
            env::current_dir().with_filesystem_error("Failed to read current directory", None)?;

        Ok(CommandContext {
            current_dir,
            display,
            vcs: self.cli.vcs,
            vcs_program: self.cli.vcs_program.clone(),
            jobs: self.cli.jobs,
            timeout_seconds: self.cli.timeout,
            invocation: self.invocation.clone(),
        })
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
