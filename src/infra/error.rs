use thiserror::Error;

/// Failures while bringing the process up or tearing it down.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("network io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("missing or invalid setting `{key}`")]
    Configuration { key: &'static str },
}
