/// Failure raised by a repository implementation.
///
/// "Nothing was written" is not an error: write methods report it through
/// their `Option`/`bool` return so callers can map it to a dependency
/// failure rather than a crash.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;
