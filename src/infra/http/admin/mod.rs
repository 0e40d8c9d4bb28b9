mod forms;
mod pages;
mod posts;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
};

use super::{BlogState, CurrentUser, mount, redirect};

pub(super) fn routes(root: &str, state: BlogState) -> Router<BlogState> {
    Router::new()
        .route(&mount(root, "admin/"), get(pages::dashboard))
        .route(
            &mount(root, "admin/createPost/"),
            get(posts::new_post).post(posts::create_post),
        )
        .route(
            &mount(root, "admin/posts/{id}/edit"),
            get(posts::edit_post).post(posts::update_post),
        )
        .route(&mount(root, "admin/createUser/"), get(pages::new_user))
        .route(&mount(root, "admin/users/{id}/edit"), get(pages::edit_user))
        .route(&mount(root, "admin/resetPassword/"), get(pages::reset_password))
        .route_layer(middleware::from_fn_with_state(state, require_user))
        .route(&mount(root, "admin/login/"), get(pages::login))
}

/// Sends visitors without a [`CurrentUser`] to the login page.
async fn require_user(
    State(state): State<BlogState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.extensions().get::<CurrentUser>().is_some() {
        return next.run(request).await;
    }

    let login = mount(state.blog_root(), "admin/login/?loginRequired");
    redirect(StatusCode::SEE_OTHER, &login)
}
