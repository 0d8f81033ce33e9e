use civica_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(DbError),
}

impl From<DbError> for CoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => CoreError::NotFound,
            other if other.is_unique_violation() => {
                CoreError::Conflict("a conflicting record already exists".into())
            }
            other => CoreError::Database(other),
        }
    }
}
