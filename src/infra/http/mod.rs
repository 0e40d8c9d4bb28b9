//! HTTP surface: public blog pages and the admin area.
//!
//! Authentication is left to the host. A logged-in user is signalled by a
//! [`CurrentUser`] request extension, which the host inserts before the
//! request reaches these routers.

mod admin;
mod middleware;
mod public;

pub use middleware::RequestId;

use std::sync::Arc;

use axum::{
    Router,
    extract::OriginalUri,
    http::{StatusCode, header::LOCATION},
    middleware as axum_middleware,
    response::{IntoResponse, Response},
};
use url::Url;

use crate::application::{
    admin::AdminPostService, blog::BlogService, error::HttpError, view_factory::ViewFactory,
};
use crate::domain::entities::UserRecord;

use self::middleware::{log_responses, set_request_id};

/// The logged-in user, as established by the host application.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

#[derive(Clone)]
pub struct BlogState {
    pub blog: Arc<BlogService>,
    pub admin: Arc<AdminPostService>,
    pub views: Arc<ViewFactory>,
    /// Scheme and authority the blog is reachable at.
    pub public_site_url: Url,
}

impl BlogState {
    fn blog_root(&self) -> &str {
        &self.views.site().blog_root
    }

    /// Absolute form of the request URI as the visitor sees it.
    fn request_url(&self, uri: &OriginalUri) -> Result<Url, HttpError> {
        let path_and_query = uri
            .0
            .path_and_query()
            .map(|value| value.as_str())
            .unwrap_or("/");

        self.public_site_url.join(path_and_query).map_err(|err| {
            HttpError::from_error(
                "infra::http::request_url",
                StatusCode::BAD_REQUEST,
                "Bad request",
                &err,
            )
        })
    }
}

/// Public and admin routes mounted under the configured blog path.
pub fn build_router(state: BlogState) -> Router {
    let root = state.blog_root().to_string();

    public::routes(&root)
        .merge(admin::routes(&root, state.clone()))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_id))
}

fn mount(root: &str, path: &str) -> String {
    format!("{root}{path}")
}

fn redirect(status: StatusCode, location: &str) -> Response {
    (status, [(LOCATION, location.to_string())]).into_response()
}
