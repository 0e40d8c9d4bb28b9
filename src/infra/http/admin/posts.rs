use axum::{
    Extension,
    extract::{Form, OriginalUri, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::{
    admin::{CreatePostCommand, UpdatePostCommand},
    error::HttpError,
    view_factory::{PostEditorInput, RequestContext},
};

use super::super::{BlogState, CurrentUser, mount, redirect};
use super::forms::PostForm;

pub(super) async fn new_post(
    State(state): State<BlogState>,
    uri: OriginalUri,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, HttpError> {
    let request = RequestContext::new(state.request_url(&uri)?, Some(user.0));
    let html = state
        .views
        .post_editor(&request, PostEditorInput::default())?;
    Ok(html.into_response())
}

pub(super) async fn create_post(
    State(state): State<BlogState>,
    uri: OriginalUri,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<PostForm>,
) -> Result<Response, HttpError> {
    let request = RequestContext::new(state.request_url(&uri)?, Some(user.0.clone()));

    if let Some(errors) = form.errors() {
        let input = PostEditorInput {
            errors: Some(errors),
            draft: !form.published(),
            tags: Some(form.tag_names()),
            title: Some(form.title),
            contents: Some(form.contents),
            ..PostEditorInput::default()
        };
        let html = state.views.post_editor(&request, input)?;
        return Ok((StatusCode::BAD_REQUEST, html).into_response());
    }

    let command = CreatePostCommand {
        tags: form.tag_names(),
        published: form.published(),
        title: form.title,
        contents: form.contents,
    };
    let post = state.admin.create_post(&user.0, command).await?;

    let location = mount(state.blog_root(), &format!("posts/{}", post.slug));
    Ok(redirect(StatusCode::SEE_OTHER, &location))
}

pub(super) async fn edit_post(
    State(state): State<BlogState>,
    uri: OriginalUri,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Response, HttpError> {
    let post = state.admin.find_post(id).await?;
    let tags = state.admin.post_tags(id).await?;

    let request = RequestContext::new(state.request_url(&uri)?, Some(user.0));
    let input = PostEditorInput {
        editing: true,
        draft: !post.published,
        tags: Some(tags.into_iter().map(|tag| tag.name).collect()),
        post: Some(post),
        ..PostEditorInput::default()
    };

    Ok(state.views.post_editor(&request, input)?.into_response())
}

pub(super) async fn update_post(
    State(state): State<BlogState>,
    uri: OriginalUri,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<Response, HttpError> {
    if let Some(errors) = form.errors() {
        let post = state.admin.find_post(id).await?;
        let request = RequestContext::new(state.request_url(&uri)?, Some(user.0));
        let input = PostEditorInput {
            errors: Some(errors),
            editing: true,
            draft: !form.published(),
            tags: Some(form.tag_names()),
            title: Some(form.title),
            contents: Some(form.contents),
            post: Some(post),
            ..PostEditorInput::default()
        };
        let html = state.views.post_editor(&request, input)?;
        return Ok((StatusCode::BAD_REQUEST, html).into_response());
    }

    let command = UpdatePostCommand {
        id,
        tags: form.tag_names(),
        published: form.published(),
        title: form.title,
        contents: form.contents,
    };
    let post = state.admin.update_post(command).await?;

    let location = mount(state.blog_root(), &format!("posts/{}", post.slug));
    Ok(redirect(StatusCode::SEE_OTHER, &location))
}
