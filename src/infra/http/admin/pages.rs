//! Admin pages that only render; their form submissions belong to the host.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::application::{
    error::HttpError,
    view_factory::{LoginInput, ResetPasswordInput, UserEditorInput},
};

use super::super::BlogState;
use super::forms::LoginQuery;

pub(super) async fn dashboard(State(state): State<BlogState>) -> Result<Response, HttpError> {
    let dashboard = state.blog.admin_dashboard().await?;
    Ok(state
        .views
        .admin_dashboard(&dashboard, None)?
        .into_response())
}

pub(super) async fn login(
    State(state): State<BlogState>,
    Query(query): Query<LoginQuery>,
) -> Result<Response, HttpError> {
    let input = LoginInput {
        login_warning: query.login_required.is_some(),
        ..LoginInput::default()
    };
    Ok(state.views.login(input)?.into_response())
}

pub(super) async fn new_user(State(state): State<BlogState>) -> Result<Response, HttpError> {
    Ok(state
        .views
        .user_editor(UserEditorInput::default())?
        .into_response())
}

pub(super) async fn edit_user(
    State(state): State<BlogState>,
    Path(id): Path<i64>,
) -> Result<Response, HttpError> {
    let user = state.blog.find_author(id).await?;
    let input = UserEditorInput {
        editing: true,
        user_id: Some(user.id),
        name: Some(user.name),
        username: Some(user.username),
        reset_password_required: user.reset_password_required.then_some(true),
        profile_picture: user.profile_picture,
        twitter_handle: user.twitter_handle,
        biography: user.biography,
        tagline: user.tagline,
        ..UserEditorInput::default()
    };
    Ok(state.views.user_editor(input)?.into_response())
}

pub(super) async fn reset_password(State(state): State<BlogState>) -> Result<Response, HttpError> {
    Ok(state
        .views
        .reset_password(ResetPasswordInput::default())?
        .into_response())
}
