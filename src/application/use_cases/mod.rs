pub mod dispatch_command;
pub mod manage_repositories;

pub use dispatch_command::{
    DispatchConfig, DispatchError, DispatchObserver, Dispatcher, NoopObserver, DEFAULT_POOL_SIZE,
    POOL_SIZE_ENV,
};
pub use manage_repositories::{
    InitOptions, ManageRepositoriesError, ManageRepositoriesUseCase, RepositoryListing,
};
