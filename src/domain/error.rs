use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("domain validation failed for `{field}`: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("timestamp `{value}` cannot be represented as a date")]
    TimestampOutOfRange { value: f64 },
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
