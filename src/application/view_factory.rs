//! Assembles typed page contexts and hands them to the renderer.
//!
//! Every function is a pure mapping from already-fetched entities plus an
//! explicit [`RequestContext`] to a [`PageView`]; nothing here touches
//! storage.

use std::cmp::Reverse;
use std::sync::Arc;

use axum::{http::StatusCode, response::Html};
use thiserror::Error;
use url::{Position, Url, form_urlencoded};

use crate::application::{
    blog::AdminDashboard,
    error::HttpError,
    markup::{self, MarkupError},
    pagination::Paginated,
    projections::{
        PostListingView, project_post, project_post_detail, project_post_listing, project_tag,
        project_tag_with_count, project_user, project_user_with_count,
    },
};
use crate::domain::{
    entities::{HydratedPost, PostRecord, TagRecord, TagWithCount, UserRecord, UserWithCount},
    posts::short_snippet,
};
use crate::presentation::{
    renderer::ViewRenderer,
    views::{
        AdminIndexContent, AdminLayout, AllAuthorsContent, AllTagsContent, BlogIndexContent,
        BlogPostContent, LoginContent, PageView, PaginatedView, PostEditorContent, ProfileContent,
        PublicLayout, ResetPasswordContent, TagContent, TemplateRenderError, UserEditorContent,
    },
};

const SOURCE: &str = "application::view_factory";

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("required {entity} was not supplied")]
    MissingEntity { entity: &'static str },
    #[error("uri `{uri}` does not contain `{expected}`")]
    MalformedUri { uri: String, expected: &'static str },
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error(transparent)]
    Render(#[from] TemplateRenderError),
}

impl From<ViewError> for HttpError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::MissingEntity { .. } => HttpError::from_error(
                SOURCE,
                StatusCode::BAD_REQUEST,
                "Bad request",
                &err,
            ),
            ViewError::Render(render) => render.into(),
            ViewError::MalformedUri { .. } | ViewError::Markup(_) => HttpError::from_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                &err,
            ),
        }
    }
}

/// Site-wide values shared by every page.
#[derive(Debug, Clone, Default)]
pub struct SiteContext {
    pub disqus_name: Option<String>,
    pub site_twitter_handle: Option<String>,
    /// Path the blog is mounted under, always ending in `/`.
    pub blog_root: String,
}

/// The request a page is being rendered for.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub uri: Url,
    pub user: Option<UserRecord>,
}

impl RequestContext {
    pub fn new(uri: Url, user: Option<UserRecord>) -> Self {
        Self { uri, user }
    }
}

#[derive(Debug, Clone)]
pub struct PostEditorInput {
    pub errors: Option<Vec<String>>,
    pub title: Option<String>,
    pub contents: Option<String>,
    pub slug_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub editing: bool,
    pub post: Option<PostRecord>,
    pub draft: bool,
}

impl Default for PostEditorInput {
    fn default() -> Self {
        Self {
            errors: None,
            title: None,
            contents: None,
            slug_url: None,
            tags: None,
            editing: false,
            post: None,
            draft: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserEditorInput {
    pub editing: bool,
    pub errors: Option<Vec<String>>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub password_error: Option<bool>,
    pub confirm_password_error: Option<bool>,
    pub reset_password_required: Option<bool>,
    pub user_id: Option<i64>,
    pub profile_picture: Option<String>,
    pub twitter_handle: Option<String>,
    pub biography: Option<String>,
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    pub login_warning: bool,
    pub errors: Option<Vec<String>>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ResetPasswordInput {
    pub errors: Option<Vec<String>>,
    pub password_error: Option<bool>,
    pub confirm_password_error: Option<bool>,
}

#[derive(Clone)]
pub struct ViewFactory {
    renderer: Arc<dyn ViewRenderer>,
    site: SiteContext,
}

impl ViewFactory {
    pub fn new(renderer: Arc<dyn ViewRenderer>, site: SiteContext) -> Self {
        Self { renderer, site }
    }

    pub fn site(&self) -> &SiteContext {
        &self.site
    }

    pub fn post_editor(
        &self,
        request: &RequestContext,
        input: PostEditorInput,
    ) -> Result<Html<String>, ViewError> {
        let has_errors = input.errors.is_some();
        let title_error = is_blank(input.title.as_deref()) && has_errors;
        let contents_error = is_blank(input.contents.as_deref()) && has_errors;

        let uri = request.uri.as_str();
        let post_path_prefix = if input.editing {
            let index = uri.find("admin/posts").ok_or_else(|| ViewError::MalformedUri {
                uri: uri.to_string(),
                expected: "admin/posts",
            })?;
            format!("{}posts/", &uri[..index])
        } else {
            uri.replace("admin/createPost", "posts")
        };

        let post = if input.editing {
            let post = input.post.as_ref().ok_or(ViewError::MissingEntity {
                entity: "post to edit",
            })?;
            Some(project_post(post))
        } else {
            None
        };

        let content = PostEditorContent {
            post_path_prefix,
            title_error,
            contents_error,
            errors: input.errors,
            title_supplied: input.title,
            contents_supplied: input.contents,
            slug_url_supplied: input.slug_url,
            tags_supplied: input.tags.filter(|tags| !tags.is_empty()),
            draft: input.draft,
            editing: input.editing,
            post,
            create_blog_post_page: !input.editing,
        };

        self.render(PageView::PostEditor(self.admin_layout(content)))
    }

    pub fn user_editor(&self, input: UserEditorInput) -> Result<Html<String>, ViewError> {
        let has_errors = input.errors.is_some();

        let user_id = if input.editing {
            Some(input.user_id.ok_or(ViewError::MissingEntity {
                entity: "user id",
            })?)
        } else {
            None
        };

        let content = UserEditorContent {
            name_error: input.name.is_none() && has_errors,
            username_error: input.username.is_none() && has_errors,
            errors: input.errors,
            name_supplied: input.name,
            username_supplied: input.username,
            password_error: input.password_error,
            confirm_password_error: input.confirm_password_error,
            reset_password_on_login_supplied: input.reset_password_required.is_some(),
            profile_picture_supplied: input.profile_picture,
            twitter_handle_supplied: input.twitter_handle,
            biography_supplied: input.biography,
            tagline_supplied: input.tagline,
            editing: input.editing,
            user_id,
        };

        self.render(PageView::UserEditor(self.admin_layout(content)))
    }

    pub fn login(&self, input: LoginInput) -> Result<Html<String>, ViewError> {
        let has_errors = input.errors.is_some();
        let content = LoginContent {
            username_error: input.username.is_none() && has_errors,
            password_error: input.password.is_none() && has_errors,
            username_supplied: input.username,
            errors: input.errors,
            login_warning: input.login_warning,
        };

        self.render(PageView::Login(self.admin_layout(content)))
    }

    pub fn admin_dashboard(
        &self,
        dashboard: &AdminDashboard,
        errors: Option<Vec<String>>,
    ) -> Result<Html<String>, ViewError> {
        let content = AdminIndexContent {
            users: dashboard.users.iter().map(project_user).collect(),
            published_posts: non_empty(&dashboard.published_posts, project_post_detail),
            draft_posts: non_empty(&dashboard.draft_posts, project_post_detail),
            errors,
            blog_admin_page: true,
        };

        self.render(PageView::AdminIndex(self.admin_layout(content)))
    }

    pub fn reset_password(&self, input: ResetPasswordInput) -> Result<Html<String>, ViewError> {
        let content = ResetPasswordContent {
            errors: input.errors,
            password_error: input.password_error,
            confirm_password_error: input.confirm_password_error,
        };

        self.render(PageView::ResetPassword(self.admin_layout(content)))
    }

    pub fn profile(
        &self,
        request: &RequestContext,
        author: &UserWithCount,
        is_my_profile: bool,
        posts: &Paginated<HydratedPost>,
    ) -> Result<Html<String>, ViewError> {
        let content = ProfileContent {
            author: project_user_with_count(author),
            my_profile: is_my_profile,
            profile_page: !is_my_profile,
            posts: paginated_listing(&request.uri, posts),
        };

        self.render(PageView::Profile(self.public_layout(request, content, true)))
    }

    pub fn blog_index(
        &self,
        request: &RequestContext,
        posts: &Paginated<HydratedPost>,
        tags: &[TagRecord],
        authors: &[UserRecord],
    ) -> Result<Html<String>, ViewError> {
        let content = BlogIndexContent {
            blog_index_page: true,
            posts: paginated_listing(&request.uri, posts),
            tags: non_empty(tags, project_tag),
            authors: non_empty(authors, project_user),
        };

        self.render(PageView::BlogIndex(self.public_layout(request, content, true)))
    }

    pub fn blog_post(
        &self,
        request: &RequestContext,
        post: &HydratedPost,
        author: &UserRecord,
    ) -> Result<Html<String>, ViewError> {
        let post_html = markup::render_markdown(&post.post.contents)?;
        let lead_image = markup::lead_image(&post_html)?;
        let post_description = markup::plain_text(&short_snippet(&post.post.contents));

        let post_uri = request.uri.to_string();
        let post_uri_encoded = form_urlencoded::byte_serialize(post_uri.as_bytes()).collect();

        let (post_image, post_image_alt) = match lead_image {
            Some(image) => (Some(image.src), image.alt),
            None => (None, None),
        };

        let content = BlogPostContent {
            post: project_post_detail(post),
            author: project_user(author),
            blog_post_page: true,
            post_uri,
            post_uri_encoded,
            site_uri: root_uri(&request.uri),
            post_description,
            post_html,
            post_image,
            post_image_alt,
        };

        self.render(PageView::BlogPost(self.public_layout(request, content, true)))
    }

    pub fn tag(
        &self,
        request: &RequestContext,
        tag: &TagWithCount,
        posts: &Paginated<HydratedPost>,
    ) -> Result<Html<String>, ViewError> {
        let content = TagContent {
            tag: project_tag_with_count(tag),
            tag_page: true,
            posts: paginated_listing(&request.uri, posts),
        };

        self.render(PageView::Tag(self.public_layout(request, content, true)))
    }

    pub fn all_tags(
        &self,
        request: &RequestContext,
        tags: &[TagWithCount],
    ) -> Result<Html<String>, ViewError> {
        let mut sorted = tags.to_vec();
        sorted.sort_by_key(|entry| Reverse(entry.post_count));

        let content = AllTagsContent {
            tags: non_empty(&sorted, project_tag_with_count),
        };

        self.render(PageView::AllTags(self.public_layout(request, content, false)))
    }

    pub fn all_authors(
        &self,
        request: &RequestContext,
        authors: &[UserWithCount],
    ) -> Result<Html<String>, ViewError> {
        let mut sorted = authors.to_vec();
        sorted.sort_by_key(|entry| Reverse(entry.post_count));

        let content = AllAuthorsContent {
            authors: non_empty(&sorted, project_user_with_count),
        };

        self.render(PageView::AllAuthors(self.public_layout(request, content, false)))
    }

    fn render(&self, page: PageView) -> Result<Html<String>, ViewError> {
        Ok(self.renderer.render(page)?)
    }

    fn public_layout<T>(
        &self,
        request: &RequestContext,
        content: T,
        with_comments: bool,
    ) -> PublicLayout<T> {
        PublicLayout {
            uri: request.uri.to_string(),
            user: request.user.as_ref().map(project_user),
            disqus_name: if with_comments {
                self.site.disqus_name.clone()
            } else {
                None
            },
            site_twitter_handle: self.site.site_twitter_handle.clone(),
            blog_root: self.site.blog_root.clone(),
            content,
        }
    }

    fn admin_layout<T>(&self, content: T) -> AdminLayout<T> {
        AdminLayout {
            blog_root: self.site.blog_root.clone(),
            content,
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.trim().is_empty())
}

fn non_empty<T, U>(items: &[T], project: impl FnMut(&T) -> U) -> Option<Vec<U>> {
    if items.is_empty() {
        None
    } else {
        Some(items.iter().map(project).collect())
    }
}

fn paginated_listing(
    uri: &Url,
    posts: &Paginated<HydratedPost>,
) -> Option<PaginatedView<PostListingView>> {
    let total_pages = posts.total_pages();
    if total_pages == 0 {
        return None;
    }

    Some(PaginatedView {
        items: posts.items.iter().map(project_post_listing).collect(),
        current_page: posts.page,
        total_pages,
        total: posts.total,
        previous_href: posts
            .has_previous()
            .then(|| page_href(uri, posts.page - 1)),
        next_href: posts.has_next().then(|| page_href(uri, posts.page + 1)),
    })
}

/// Path and query of `uri` with the `page` parameter replaced.
pub(crate) fn page_href(uri: &Url, page: u32) -> String {
    let retained: Vec<(String, String)> = uri
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut target = uri.clone();
    target.set_fragment(None);
    {
        let mut pairs = target.query_pairs_mut();
        pairs.clear();
        pairs.extend_pairs(retained);
        pairs.append_pair("page", &page.to_string());
    }

    target[Position::BeforePath..].to_string()
}

fn root_uri(uri: &Url) -> String {
    let mut root = uri.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root.to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use time::macros::datetime;

    use super::*;
    use crate::application::pagination::PageRequest;

    #[derive(Default)]
    struct CapturingRenderer {
        pages: Mutex<Vec<PageView>>,
    }

    impl CapturingRenderer {
        fn last(&self) -> PageView {
            self.pages
                .lock()
                .expect("lock")
                .last()
                .cloned()
                .expect("a page was rendered")
        }
    }

    impl ViewRenderer for CapturingRenderer {
        fn render(&self, page: PageView) -> Result<Html<String>, TemplateRenderError> {
            let name = page.template_name();
            self.pages.lock().expect("lock").push(page);
            Ok(Html(name.to_string()))
        }
    }

    fn factory() -> (ViewFactory, Arc<CapturingRenderer>) {
        let renderer = Arc::new(CapturingRenderer::default());
        let site = SiteContext {
            disqus_name: Some("lectern-blog".to_string()),
            site_twitter_handle: Some("lectern".to_string()),
            blog_root: "/blog/".to_string(),
        };
        (ViewFactory::new(renderer.clone(), site), renderer)
    }

    fn request(uri: &str) -> RequestContext {
        RequestContext::new(Url::parse(uri).expect("uri"), None)
    }

    fn user(id: i64, username: &str) -> UserRecord {
        UserRecord {
            id,
            name: format!("User {id}"),
            username: username.to_string(),
            profile_picture: None,
            twitter_handle: None,
            biography: None,
            tagline: None,
            reset_password_required: false,
        }
    }

    fn post(id: i64, contents: &str) -> PostRecord {
        PostRecord {
            id,
            title: format!("Post {id}"),
            contents: contents.to_string(),
            author_id: 1,
            created: datetime!(2024-01-01 00:00:00 UTC),
            last_edited: None,
            slug: format!("post-{id}"),
            published: true,
        }
    }

    fn hydrated(id: i64, contents: &str) -> HydratedPost {
        HydratedPost {
            post: post(id, contents),
            author: Some(user(1, "ada")),
            tags: Vec::new(),
        }
    }

    #[test]
    fn post_editor_flags_blank_fields_only_with_errors() {
        let (factory, renderer) = factory();
        let request = request("https://example.com/blog/admin/createPost/");

        let _html = factory
            .post_editor(
                &request,
                PostEditorInput {
                    errors: Some(vec!["Title required".to_string()]),
                    title: Some("   ".to_string()),
                    contents: Some("Body".to_string()),
                    ..PostEditorInput::default()
                },
            )
            .expect("render");

        let PageView::PostEditor(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert!(view.content.title_error);
        assert!(!view.content.contents_error);
        assert!(view.content.create_blog_post_page);
        assert!(view.content.draft);
        assert_eq!(
            view.content.post_path_prefix,
            "https://example.com/blog/posts/"
        );

        let _html = factory
            .post_editor(&request, PostEditorInput::default())
            .expect("render");
        let PageView::PostEditor(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert!(!view.content.title_error);
        assert!(!view.content.contents_error);
    }

    #[test]
    fn post_editor_derives_prefix_when_editing() {
        let (factory, renderer) = factory();
        let request = request("https://example.com/blog/admin/posts/4/edit");

        let _html = factory
            .post_editor(
                &request,
                PostEditorInput {
                    editing: true,
                    post: Some(post(4, "Body")),
                    tags: Some(Vec::new()),
                    draft: false,
                    ..PostEditorInput::default()
                },
            )
            .expect("render");

        let PageView::PostEditor(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert_eq!(
            view.content.post_path_prefix,
            "https://example.com/blog/posts/"
        );
        assert!(view.content.editing);
        assert!(!view.content.create_blog_post_page);
        assert_eq!(view.content.tags_supplied, None);
        assert_eq!(view.content.post.map(|post| post.id), Some(4));
    }

    #[test]
    fn post_editor_requires_post_when_editing() {
        let (factory, _) = factory();
        let request = request("https://example.com/admin/posts/4/edit");

        let err = factory
            .post_editor(
                &request,
                PostEditorInput {
                    editing: true,
                    ..PostEditorInput::default()
                },
            )
            .expect_err("missing post");
        assert!(matches!(err, ViewError::MissingEntity { .. }));

        let http: HttpError = err.into();
        assert_eq!(http.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn post_editor_rejects_unexpected_edit_uri() {
        let (factory, _) = factory();
        let request = request("https://example.com/somewhere/else");

        let err = factory
            .post_editor(
                &request,
                PostEditorInput {
                    editing: true,
                    post: Some(post(1, "Body")),
                    ..PostEditorInput::default()
                },
            )
            .expect_err("malformed uri");
        assert!(matches!(err, ViewError::MalformedUri { .. }));

        let http: HttpError = err.into();
        assert_eq!(http.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn user_editor_requires_id_when_editing() {
        let (factory, renderer) = factory();

        let err = factory
            .user_editor(UserEditorInput {
                editing: true,
                ..UserEditorInput::default()
            })
            .expect_err("missing id");
        assert!(matches!(err, ViewError::MissingEntity { .. }));

        let _html = factory
            .user_editor(UserEditorInput {
                errors: Some(vec!["Name required".to_string()]),
                username: Some("ada".to_string()),
                reset_password_required: Some(false),
                ..UserEditorInput::default()
            })
            .expect("render");
        let PageView::UserEditor(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert!(view.content.name_error);
        assert!(!view.content.username_error);
        assert!(view.content.reset_password_on_login_supplied);
    }

    #[test]
    fn login_marks_missing_credentials() {
        let (factory, renderer) = factory();
        let _html = factory
            .login(LoginInput {
                errors: Some(vec!["Bad credentials".to_string()]),
                username: Some("ada".to_string()),
                login_warning: true,
                ..LoginInput::default()
            })
            .expect("render");

        let PageView::Login(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert!(!view.content.username_error);
        assert!(view.content.password_error);
        assert!(view.content.login_warning);
        assert_eq!(view.content.username_supplied.as_deref(), Some("ada"));
    }

    #[test]
    fn blog_post_extracts_image_and_description() {
        let (factory, renderer) = factory();
        let mut request = request("https://example.com:8443/blog/posts/post-1");
        request.user = Some(user(2, "grace"));
        let contents = "An *opening* line.\n\n![Harbour at dusk](https://cdn.example.com/harbour.jpg)";

        let _html = factory
            .blog_post(&request, &hydrated(1, contents), &user(1, "ada"))
            .expect("render");

        let PageView::BlogPost(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert_eq!(
            view.content.post_image.as_deref(),
            Some("https://cdn.example.com/harbour.jpg")
        );
        assert_eq!(view.content.post_image_alt.as_deref(), Some("Harbour at dusk"));
        assert_eq!(view.content.site_uri, "https://example.com:8443/");
        assert_eq!(
            view.content.post_uri_encoded,
            "https%3A%2F%2Fexample.com%3A8443%2Fblog%2Fposts%2Fpost-1"
        );
        assert!(view.content.post_description.starts_with("An opening line."));
        assert_eq!(view.disqus_name.as_deref(), Some("lectern-blog"));
        assert_eq!(view.user.map(|user| user.username), Some("grace".to_string()));
    }

    #[test]
    fn blog_post_without_image_has_no_image_fields() {
        let (factory, renderer) = factory();
        let request = request("https://example.com/posts/post-1");

        let _html = factory
            .blog_post(&request, &hydrated(1, "Just text"), &user(1, "ada"))
            .expect("render");

        let PageView::BlogPost(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert_eq!(view.content.post_image, None);
        assert_eq!(view.content.post_image_alt, None);
    }

    #[test]
    fn blog_index_omits_empty_collections() {
        let (factory, renderer) = factory();
        let request = request("https://example.com/blog/");
        let empty = Paginated::new(Vec::new(), PageRequest::first(10), 0);

        let _html = factory
            .blog_index(&request, &empty, &[], &[])
            .expect("render");

        let PageView::BlogIndex(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert!(view.content.blog_index_page);
        assert!(view.content.posts.is_none());
        assert!(view.content.tags.is_none());
        assert!(view.content.authors.is_none());
        assert_eq!(view.site_twitter_handle.as_deref(), Some("lectern"));
    }

    #[test]
    fn listing_links_neighbouring_pages() {
        let (factory, renderer) = factory();
        let request = request("https://example.com/blog/?page=2&utm=feed");
        let page = Paginated::new(
            vec![hydrated(3, "three")],
            PageRequest::new(2, 1).expect("page"),
            3,
        );

        let _html = factory
            .blog_index(&request, &page, &[], &[user(1, "ada")])
            .expect("render");

        let PageView::BlogIndex(view) = renderer.last() else {
            panic!("unexpected page");
        };
        let posts = view.content.posts.expect("posts");
        assert_eq!(posts.total_pages, 3);
        assert_eq!(posts.previous_href.as_deref(), Some("/blog/?utm=feed&page=1"));
        assert_eq!(posts.next_href.as_deref(), Some("/blog/?utm=feed&page=3"));
        assert_eq!(view.content.authors.map(|authors| authors.len()), Some(1));
    }

    #[test]
    fn all_tags_sorted_by_count_without_comments() {
        let (factory, renderer) = factory();
        let request = request("https://example.com/tags/");
        let tags = vec![
            TagWithCount {
                tag: TagRecord {
                    id: 1,
                    name: "rare".to_string(),
                },
                post_count: 1,
            },
            TagWithCount {
                tag: TagRecord {
                    id: 2,
                    name: "common".to_string(),
                },
                post_count: 5,
            },
        ];

        factory.all_tags(&request, &tags).expect("render");

        let PageView::AllTags(view) = renderer.last() else {
            panic!("unexpected page");
        };
        let names: Vec<String> = view
            .content
            .tags
            .expect("tags")
            .into_iter()
            .map(|tag| tag.tag.name)
            .collect();
        assert_eq!(names, vec!["common", "rare"]);
        assert_eq!(view.disqus_name, None);
    }

    #[test]
    fn all_authors_sorted_by_count() {
        let (factory, renderer) = factory();
        let request = request("https://example.com/authors/");
        let authors = vec![
            UserWithCount {
                user: user(1, "ada"),
                post_count: 0,
            },
            UserWithCount {
                user: user(2, "grace"),
                post_count: 3,
            },
        ];

        factory.all_authors(&request, &authors).expect("render");

        let PageView::AllAuthors(view) = renderer.last() else {
            panic!("unexpected page");
        };
        let usernames: Vec<String> = view
            .content
            .authors
            .expect("authors")
            .into_iter()
            .map(|author| author.user.username)
            .collect();
        assert_eq!(usernames, vec!["grace", "ada"]);
    }

    #[test]
    fn profile_distinguishes_own_profile() {
        let (factory, renderer) = factory();
        let request = request("https://example.com/authors/ada");
        let author = UserWithCount {
            user: user(1, "ada"),
            post_count: 1,
        };
        let posts = Paginated::new(vec![hydrated(1, "body")], PageRequest::first(10), 1);

        let _html = factory
            .profile(&request, &author, true, &posts)
            .expect("render");
        let PageView::Profile(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert!(view.content.my_profile);
        assert!(!view.content.profile_page);
        assert_eq!(view.content.posts.map(|posts| posts.items.len()), Some(1));

        let _html = factory
            .profile(&request, &author, false, &posts)
            .expect("render");
        let PageView::Profile(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert!(view.content.profile_page);
    }

    #[test]
    fn tag_page_carries_counted_tag() {
        let (factory, renderer) = factory();
        let request = request("https://example.com/tags/rust");
        let tag = TagWithCount {
            tag: TagRecord {
                id: 9,
                name: "rust".to_string(),
            },
            post_count: 2,
        };
        let posts = Paginated::new(
            vec![hydrated(2, "b"), hydrated(1, "a")],
            PageRequest::first(10),
            2,
        );

        factory.tag(&request, &tag, &posts).expect("render");
        let PageView::Tag(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert!(view.content.tag_page);
        assert_eq!(view.content.tag.post_count, 2);
        assert_eq!(view.uri, "https://example.com/tags/rust");
    }

    #[test]
    fn admin_dashboard_splits_published_and_drafts() {
        let (factory, renderer) = factory();
        let mut draft = hydrated(2, "draft");
        draft.post.published = false;
        let dashboard = AdminDashboard {
            users: vec![user(1, "ada")],
            published_posts: vec![hydrated(1, "live")],
            draft_posts: vec![draft],
        };

        factory.admin_dashboard(&dashboard, None).expect("render");
        let PageView::AdminIndex(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert!(view.content.blog_admin_page);
        assert_eq!(view.content.published_posts.map(|posts| posts.len()), Some(1));
        assert_eq!(view.content.draft_posts.map(|posts| posts.len()), Some(1));

        let _html = factory
            .admin_dashboard(&AdminDashboard::default(), Some(vec!["oops".to_string()]))
            .expect("render");
        let PageView::AdminIndex(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert!(view.content.published_posts.is_none());
        assert_eq!(view.content.errors, Some(vec!["oops".to_string()]));
    }

    #[test]
    fn reset_password_passes_flags_through() {
        let (factory, renderer) = factory();
        let _html = factory
            .reset_password(ResetPasswordInput {
                password_error: Some(true),
                ..ResetPasswordInput::default()
            })
            .expect("render");
        let PageView::ResetPassword(view) = renderer.last() else {
            panic!("unexpected page");
        };
        assert_eq!(view.content.password_error, Some(true));
        assert_eq!(view.content.confirm_password_error, None);
    }
}
