use tracing::debug;

use crate::application::repos::RepoError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";
const QUERY_CANCELED: &str = "57014";

/// Classify a sqlx error by its Postgres SQLSTATE.
pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) => {
            let code = db.code().map(|code| code.into_owned()).unwrap_or_default();
            debug!(
                target = "lectern::infra::db",
                code = %code,
                constraint = db.constraint().unwrap_or(""),
                "database error"
            );

            match code.as_str() {
                UNIQUE_VIOLATION => RepoError::Duplicate {
                    constraint: db.constraint().unwrap_or("unknown").to_string(),
                },
                FOREIGN_KEY_VIOLATION | INVALID_TEXT_REPRESENTATION => RepoError::InvalidInput {
                    message: db.message().to_string(),
                },
                QUERY_CANCELED => RepoError::Timeout,
                // Remaining class 23 codes: not-null, check and exclusion violations.
                other if other.starts_with("23") => RepoError::Integrity {
                    message: db.message().to_string(),
                },
                _ => RepoError::from_persistence(db.message()),
            }
        }
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        other => RepoError::from_persistence(other),
    }
}
