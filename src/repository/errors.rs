use thiserror::Error;
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("engine not found: {0}")]
    EngineNotFound(Uuid),

    #[error("engine {0} is still referenced by one or more cars")]
    EngineInUse(Uuid),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("inconsistent state: {0}")]
    Inconsistency(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classifies a failed write by its SQLSTATE.
    ///
    /// `engine_id` is the engine the statement referenced, reported when the
    /// failure is a foreign-key violation.
    pub fn from_write(err: sqlx::Error, engine_id: Uuid) -> Self {
        match sql_state(&err).as_deref() {
            Some(UNIQUE_VIOLATION) => StoreError::Conflict(database_message(&err)),
            Some(FOREIGN_KEY_VIOLATION) => StoreError::EngineNotFound(engine_id),
            _ => StoreError::Database(err),
        }
    }
}

fn sql_state(err: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code.into_owned());
    }
    None
}

fn database_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}
