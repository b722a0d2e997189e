//! # gitws - multi-repository workspace tool
//!
//! `gitws` treats a directory tree of independent version-control checkouts
//! as one workspace. It keeps an ordered list of repositories in
//! `.gitws.yml`, proxies a version-control command to one or all of them and
//! prints the results in configuration order, however the concurrent
//! invocations happen to finish.
//!
//! ## Quick Start
//!
//! ```bash
//! gitws init --scan
//! gitws add tools vendor/tools
//! gitws all status --short
//! gitws run tools pull --rebase
//! ```
//!
//! ## Architecture
//!
//! The crate is organized using clean architecture principles:
//!
//! - [`domain`]: repository records, workspace configuration and execution results
//! - [`application`]: the dispatcher, result sequencing and configuration edits
//! - [`infrastructure`]: configuration files, history log and process execution
//! - [`presentation`]: CLI interface and report rendering
//! - [`common`]: Shared error handling
//!
//! ## Error Handling
//!
//! - [`common::error::GitwsError`]: aggregates the error enum of every layer
//! - [`common::result::GitwsResult`]: Type alias for `Result<T, GitwsError>`
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gitws::application::use_cases::dispatch_command::{DispatchConfig, Dispatcher};
//! use gitws::domain::value_objects::command_line::CommandLine;
//! use gitws::infrastructure::filesystem::config_store::ConfigStore;
//! use gitws::infrastructure::process::command_runner::ProcessCommandRunner;
//!
//! # async fn example() -> gitws::Result<()> {
//! let config = ConfigStore::new().load(std::path::Path::new("/work/.gitws.yml"))?;
//! let dispatcher = Dispatcher::new(
//!     Arc::new(ProcessCommandRunner::new()),
//!     DispatchConfig::from_env()?,
//! );
//!
//! let command = CommandLine::new("git", ["status", "--short"])?;
//! for result in dispatcher.dispatch_all(&config, &command).await? {
//!     println!("{}: {:?}", result.repository_name, result.exit_status);
//! }
//! # Ok(())
//! # }
//! ```

// Documentation attributes
#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::GitwsError;
pub use crate::common::result::GitwsResult as Result;
