use axum::{
    Extension, Router,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::application::{error::HttpError, view_factory::RequestContext};

use super::{BlogState, CurrentUser, mount, redirect};

pub(super) fn routes(root: &str) -> Router<BlogState> {
    Router::new()
        .route(&mount(root, ""), get(blog_index))
        .route(&mount(root, "posts/"), get(posts_redirect))
        .route(&mount(root, "posts/{slug}"), get(blog_post))
        .route(&mount(root, "tags/"), get(all_tags))
        .route(&mount(root, "tags/{name}"), get(tag_page))
        .route(&mount(root, "authors/"), get(all_authors))
        .route(&mount(root, "authors/{username}"), get(author_page))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    page: Option<u32>,
}

impl PageQuery {
    fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }
}

fn current_user(user: Option<Extension<CurrentUser>>) -> Option<CurrentUser> {
    user.map(|Extension(user)| user)
}

async fn blog_index(
    State(state): State<BlogState>,
    uri: OriginalUri,
    user: Option<Extension<CurrentUser>>,
    Query(query): Query<PageQuery>,
) -> Result<Response, HttpError> {
    let request = RequestContext::new(
        state.request_url(&uri)?,
        current_user(user).map(|user| user.0),
    );
    let index = state.blog.index_page(query.page()).await?;
    let html = state
        .views
        .blog_index(&request, &index.posts, &index.tags, &index.authors)?;
    Ok(html.into_response())
}

async fn posts_redirect(State(state): State<BlogState>) -> Response {
    redirect(StatusCode::MOVED_PERMANENTLY, state.blog_root())
}

async fn blog_post(
    State(state): State<BlogState>,
    uri: OriginalUri,
    user: Option<Extension<CurrentUser>>,
    Path(slug): Path<String>,
) -> Result<Response, HttpError> {
    let user = current_user(user).map(|user| user.0);
    let page = state.blog.post_by_slug(&slug, user.is_some()).await?;

    let request = RequestContext::new(state.request_url(&uri)?, user);
    let html = state.views.blog_post(&request, &page.post, &page.author)?;
    Ok(html.into_response())
}

async fn all_tags(
    State(state): State<BlogState>,
    uri: OriginalUri,
    user: Option<Extension<CurrentUser>>,
) -> Result<Response, HttpError> {
    let request = RequestContext::new(
        state.request_url(&uri)?,
        current_user(user).map(|user| user.0),
    );
    let tags = state.blog.all_tags().await?;
    Ok(state.views.all_tags(&request, &tags)?.into_response())
}

async fn tag_page(
    State(state): State<BlogState>,
    uri: OriginalUri,
    user: Option<Extension<CurrentUser>>,
    Path(name): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, HttpError> {
    let request = RequestContext::new(
        state.request_url(&uri)?,
        current_user(user).map(|user| user.0),
    );
    let page = state.blog.tag_page(&name, query.page()).await?;
    Ok(state
        .views
        .tag(&request, &page.tag, &page.posts)?
        .into_response())
}

async fn all_authors(
    State(state): State<BlogState>,
    uri: OriginalUri,
    user: Option<Extension<CurrentUser>>,
) -> Result<Response, HttpError> {
    let request = RequestContext::new(
        state.request_url(&uri)?,
        current_user(user).map(|user| user.0),
    );
    let authors = state.blog.all_authors().await?;
    Ok(state.views.all_authors(&request, &authors)?.into_response())
}

async fn author_page(
    State(state): State<BlogState>,
    uri: OriginalUri,
    user: Option<Extension<CurrentUser>>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, HttpError> {
    let user = current_user(user).map(|user| user.0);
    let page = state.blog.author_page(&username, query.page()).await?;
    let is_my_profile = user
        .as_ref()
        .is_some_and(|user| user.id == page.author.user.id);

    let request = RequestContext::new(state.request_url(&uri)?, user);
    Ok(state
        .views
        .profile(&request, &page.author, is_my_profile, &page.posts)?
        .into_response())
}
