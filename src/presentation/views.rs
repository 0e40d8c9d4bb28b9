use askama::{Error as AskamaError, Template};
use axum::{http::StatusCode, response::Html};
use serde::Serialize;
use thiserror::Error;

use crate::application::{
    error::HttpError,
    projections::{
        PostDetailView, PostListingView, PostView, TagView, TagWithCountView, UserView,
        UserWithCountView,
    },
};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, TemplateRenderError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
    })
}

/// Values every public page receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicLayout<T> {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disqus_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_twitter_handle: Option<String>,
    #[serde(skip)]
    pub blog_root: String,
    #[serde(flatten)]
    pub content: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminLayout<T> {
    #[serde(skip)]
    pub blog_root: String,
    #[serde(flatten)]
    pub content: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedView<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogIndexContent {
    pub blog_index_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<PaginatedView<PostListingView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<UserView>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPostContent {
    pub post: PostDetailView,
    pub author: UserView,
    pub blog_post_page: bool,
    pub post_uri: String,
    pub post_uri_encoded: String,
    pub site_uri: String,
    pub post_description: String,
    pub post_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_image_alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagContent {
    pub tag: TagWithCountView,
    pub tag_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<PaginatedView<PostListingView>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllTagsContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagWithCountView>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllAuthorsContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<UserWithCountView>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileContent {
    pub author: UserWithCountView,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub my_profile: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub profile_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<PaginatedView<PostListingView>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostEditorContent {
    pub post_path_prefix: String,
    pub title_error: bool,
    pub contents_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_supplied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents_supplied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug_url_supplied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags_supplied: Option<Vec<String>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub editing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostView>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub create_blog_post_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserEditorContent {
    pub name_error: bool,
    pub username_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_supplied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_supplied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password_error: Option<bool>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reset_password_on_login_supplied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_supplied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_handle_supplied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography_supplied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline_supplied: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub editing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginContent {
    pub username_error: bool,
    pub password_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_supplied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub login_warning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminIndexContent {
    pub users: Vec<UserView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_posts: Option<Vec<PostDetailView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_posts: Option<Vec<PostDetailView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    pub blog_admin_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetPasswordContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password_error: Option<bool>,
}

/// A fully assembled page, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageView {
    BlogIndex(PublicLayout<BlogIndexContent>),
    BlogPost(PublicLayout<BlogPostContent>),
    Tag(PublicLayout<TagContent>),
    AllTags(PublicLayout<AllTagsContent>),
    AllAuthors(PublicLayout<AllAuthorsContent>),
    Profile(PublicLayout<ProfileContent>),
    PostEditor(AdminLayout<PostEditorContent>),
    UserEditor(AdminLayout<UserEditorContent>),
    Login(AdminLayout<LoginContent>),
    AdminIndex(AdminLayout<AdminIndexContent>),
    ResetPassword(AdminLayout<ResetPasswordContent>),
}

impl PageView {
    /// Stable template identifier, independent of the rendering engine.
    pub fn template_name(&self) -> &'static str {
        match self {
            PageView::BlogIndex(_) => "blog/blog",
            PageView::BlogPost(_) => "blog/blogpost",
            PageView::Tag(_) => "blog/tag",
            PageView::AllTags(_) => "blog/tags",
            PageView::AllAuthors(_) => "blog/authors",
            PageView::Profile(_) => "blog/profile",
            PageView::PostEditor(_) => "blog/admin/createPost",
            PageView::UserEditor(_) => "blog/admin/createUser",
            PageView::Login(_) => "blog/admin/login",
            PageView::AdminIndex(_) => "blog/admin/index",
            PageView::ResetPassword(_) => "blog/admin/resetPassword",
        }
    }
}

#[derive(Template)]
#[template(path = "blog/blog.html")]
pub struct BlogIndexTemplate {
    pub view: PublicLayout<BlogIndexContent>,
}

#[derive(Template)]
#[template(path = "blog/blogpost.html")]
pub struct BlogPostTemplate {
    pub view: PublicLayout<BlogPostContent>,
}

#[derive(Template)]
#[template(path = "blog/tag.html")]
pub struct TagTemplate {
    pub view: PublicLayout<TagContent>,
}

#[derive(Template)]
#[template(path = "blog/tags.html")]
pub struct AllTagsTemplate {
    pub view: PublicLayout<AllTagsContent>,
}

#[derive(Template)]
#[template(path = "blog/authors.html")]
pub struct AllAuthorsTemplate {
    pub view: PublicLayout<AllAuthorsContent>,
}

#[derive(Template)]
#[template(path = "blog/profile.html")]
pub struct ProfileTemplate {
    pub view: PublicLayout<ProfileContent>,
}

#[derive(Template)]
#[template(path = "blog/admin/createPost.html")]
pub struct PostEditorTemplate {
    pub view: AdminLayout<PostEditorContent>,
}

#[derive(Template)]
#[template(path = "blog/admin/createUser.html")]
pub struct UserEditorTemplate {
    pub view: AdminLayout<UserEditorContent>,
}

#[derive(Template)]
#[template(path = "blog/admin/login.html")]
pub struct LoginTemplate {
    pub view: AdminLayout<LoginContent>,
}

#[derive(Template)]
#[template(path = "blog/admin/index.html")]
pub struct AdminIndexTemplate {
    pub view: AdminLayout<AdminIndexContent>,
}

#[derive(Template)]
#[template(path = "blog/admin/resetPassword.html")]
pub struct ResetPasswordTemplate {
    pub view: AdminLayout<ResetPasswordContent>,
}
