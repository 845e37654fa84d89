/*
 * Responsibility
 * - What the repo layer tells the layers above
 * - Unique violations are given their own meaning (Conflict)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[source] sqlx::Error),
    #[error("conflict")]
    Conflict,
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.is_unique_violation()
        {
            return RepoError::Conflict;
        }
        RepoError::Db(e)
    }
}
