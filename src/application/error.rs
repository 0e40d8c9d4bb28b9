use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::{admin::AdminPostError, blog::BlogError, repos::RepoError},
    config::LoadError,
    infra::error::InfraError,
};

/// Diagnostic chain stored on a failed response for the logging middleware.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut cause = error.source();
        while let Some(inner) = cause {
            messages.push(inner.to_string());
            cause = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn new(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        let report = ErrorReport {
            source,
            status,
            messages: vec![detail.into()],
        };
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        response.extensions_mut().insert(self.report);
        response
    }
}

impl From<RepoError> for HttpError {
    fn from(error: RepoError) -> Self {
        const SOURCE: &str = "application::error::repo_error_to_http_error";
        match &error {
            RepoError::NotFound => {
                HttpError::from_error(SOURCE, StatusCode::NOT_FOUND, "Not found", &error)
            }
            RepoError::Duplicate { .. } => {
                HttpError::from_error(SOURCE, StatusCode::CONFLICT, "Conflict", &error)
            }
            RepoError::InvalidInput { .. } | RepoError::Pagination(_) => {
                HttpError::from_error(SOURCE, StatusCode::BAD_REQUEST, "Bad request", &error)
            }
            RepoError::Timeout => HttpError::from_error(
                SOURCE,
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable",
                &error,
            ),
            RepoError::Persistence(_) | RepoError::Integrity { .. } => HttpError::from_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                &error,
            ),
        }
    }
}

impl From<BlogError> for HttpError {
    fn from(error: BlogError) -> Self {
        match error {
            BlogError::UnknownPost(slug) => HttpError::new(
                "application::error::blog_error_to_http_error",
                StatusCode::NOT_FOUND,
                "Post not found",
                format!("No visible post with slug `{slug}`"),
            ),
            BlogError::UnknownTag(name) => HttpError::new(
                "application::error::blog_error_to_http_error",
                StatusCode::NOT_FOUND,
                "Tag not found",
                format!("No tag named `{name}`"),
            ),
            BlogError::UnknownAuthor(username) => HttpError::new(
                "application::error::blog_error_to_http_error",
                StatusCode::NOT_FOUND,
                "Author not found",
                format!("No author with username `{username}`"),
            ),
            BlogError::Repo(err) => err.into(),
        }
    }
}

impl From<AdminPostError> for HttpError {
    fn from(error: AdminPostError) -> Self {
        const SOURCE: &str = "application::error::admin_post_error_to_http_error";
        match error {
            AdminPostError::Validation(err) => {
                HttpError::from_error(SOURCE, StatusCode::BAD_REQUEST, "Invalid post", &err)
            }
            AdminPostError::SlugConflict { .. } => HttpError::from_error(
                SOURCE,
                StatusCode::CONFLICT,
                "A post with this URL already exists",
                &error,
            ),
            AdminPostError::UnknownPost(id) => HttpError::new(
                SOURCE,
                StatusCode::NOT_FOUND,
                "Post not found",
                format!("No post with id `{id}`"),
            ),
            AdminPostError::Slug(_) => HttpError::from_error(
                SOURCE,
                StatusCode::UNPROCESSABLE_ENTITY,
                "Could not derive a URL from the title",
                &error,
            ),
            AdminPostError::Repo(err) => err.into(),
        }
    }
}

/// Failures that stop the `lectern` binary before or while serving.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("server task failed: {0}")]
    ServerTask(#[from] tokio::task::JoinError),
}
