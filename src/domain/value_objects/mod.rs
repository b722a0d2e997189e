pub mod command_line;
pub mod vcs_kind;

pub use command_line::{CommandLine, CommandLineError};
pub use vcs_kind::{VcsKind, VcsKindError};
