use chronicle_dispatch::DispatchError;
use chronicle_layout::LayoutError;
use thiserror::Error;

/// Errors raised while building or driving a repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Schema registration failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The dispatcher could not be started.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// An operation that needs a running repository was called before
    /// `start`.
    #[error("repository has not been started")]
    NotStarted,

    /// `start` was called on a repository that is already running.
    #[error("repository is already running")]
    AlreadyRunning,

    /// The repository was stopped; it cannot be restarted.
    #[error("repository is stopped")]
    Stopped,
}

/// Alias for repository results.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
