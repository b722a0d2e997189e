pub mod add;
pub mod all;
pub mod convert;
pub mod init;
pub mod list;
pub mod remove;
pub mod run;

pub use add::*;
pub use all::*;
pub use convert::*;
pub use init::*;
pub use list::*;
pub use remove::*;
pub use run::*;
