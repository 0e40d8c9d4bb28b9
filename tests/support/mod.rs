#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
    response::Html,
};
use http_body_util::BodyExt;
use lectern::{
    application::{
        admin::AdminPostService,
        blog::BlogService,
        pagination::{PageRequest, Paginated},
        repos::{
            CreatePostParams, PostListFilter, PostsRepo, PostsWriteRepo, RepoError, TagsRepo,
            TagsWriteRepo, UpdatePostParams, UsersRepo,
        },
        view_factory::{SiteContext, ViewFactory},
    },
    domain::entities::{PostRecord, TagRecord, TagWithCount, UserRecord, UserWithCount},
    infra::http::{BlogState, CurrentUser, build_router},
    presentation::{
        renderer::ViewRenderer,
        views::{PageView, TemplateRenderError},
    },
};
use time::{Duration, macros::datetime};
use tower::ServiceExt;
use url::Url;

pub const BLOG_ROOT: &str = "/blog/";
pub const SITE_URL: &str = "https://example.com/";

#[derive(Default)]
struct StoreState {
    posts: Vec<PostRecord>,
    users: Vec<UserRecord>,
    tags: Vec<TagRecord>,
    post_tags: Vec<(i64, i64)>,
}

/// In-memory stand-in for every repository port.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn add_user(&self, id: i64, name: &str, username: &str) -> UserRecord {
        let user = UserRecord {
            id,
            name: name.to_string(),
            username: username.to_string(),
            profile_picture: None,
            twitter_handle: None,
            biography: None,
            tagline: None,
            reset_password_required: false,
        };
        self.state.lock().expect("lock").users.push(user.clone());
        user
    }

    /// Adds a post created `age_hours` before a fixed reference time.
    pub fn add_post(
        &self,
        author: &UserRecord,
        title: &str,
        slug: &str,
        published: bool,
        age_hours: i64,
        tags: &[&str],
    ) -> PostRecord {
        let mut state = self.state.lock().expect("lock");
        let post = PostRecord {
            id: state.posts.len() as i64 + 1,
            title: title.to_string(),
            contents: format!("# {title}\n\nBody of {title}."),
            author_id: author.id,
            created: datetime!(2024-06-01 12:00 UTC) - Duration::hours(age_hours),
            last_edited: None,
            slug: slug.to_string(),
            published,
        };
        state.posts.push(post.clone());

        for name in tags {
            let tag_id = Self::tag_id_for(&mut state, name);
            state.post_tags.push((post.id, tag_id));
        }

        post
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<PostRecord> {
        let state = self.state.lock().expect("lock");
        state.posts.iter().find(|post| post.slug == slug).cloned()
    }

    pub fn tag_names_for(&self, post_id: i64) -> Vec<String> {
        let state = self.state.lock().expect("lock");
        let mut names: Vec<String> = state
            .post_tags
            .iter()
            .filter(|(post, _)| *post == post_id)
            .filter_map(|(_, tag)| state.tags.iter().find(|t| t.id == *tag))
            .map(|tag| tag.name.clone())
            .collect();
        names.sort();
        names
    }

    fn tag_id_for(state: &mut StoreState, name: &str) -> i64 {
        if let Some(tag) = state.tags.iter().find(|tag| tag.name == name) {
            return tag.id;
        }
        let tag = TagRecord {
            id: state.tags.len() as i64 + 1,
            name: name.to_string(),
        };
        let id = tag.id;
        state.tags.push(tag);
        id
    }

    fn matches(state: &StoreState, post: &PostRecord, filter: PostListFilter) -> bool {
        filter.published.is_none_or(|flag| post.published == flag)
            && filter.author_id.is_none_or(|id| post.author_id == id)
            && filter
                .tag_id
                .is_none_or(|tag| state.post_tags.contains(&(post.id, tag)))
    }

    fn filtered(&self, filter: PostListFilter) -> Vec<PostRecord> {
        let state = self.state.lock().expect("lock");
        let mut posts: Vec<PostRecord> = state
            .posts
            .iter()
            .filter(|post| Self::matches(&state, post, filter))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        posts
    }

    fn published_count(&self, predicate: impl Fn(&StoreState, &PostRecord) -> bool) -> u64 {
        let state = self.state.lock().expect("lock");
        state
            .posts
            .iter()
            .filter(|post| post.published && predicate(&state, post))
            .count() as u64
    }
}

#[async_trait]
impl PostsRepo for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.post_by_slug(slug))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        let state = self.state.lock().expect("lock");
        Ok(state.posts.iter().find(|post| post.id == id).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self.post_by_slug(slug).is_some())
    }

    async fn list_posts(
        &self,
        filter: PostListFilter,
        page: PageRequest,
    ) -> Result<Paginated<PostRecord>, RepoError> {
        let posts = self.filtered(filter);
        let total = posts.len() as u64;
        let items = posts
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(Paginated::new(items, page, total))
    }

    async fn list_all(&self, filter: PostListFilter) -> Result<Vec<PostRecord>, RepoError> {
        Ok(self.filtered(filter))
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let mut state = self.state.lock().expect("lock");
        if state.posts.iter().any(|post| post.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "posts_slug_url_key".to_string(),
            });
        }
        let post = PostRecord {
            id: state.posts.len() as i64 + 1,
            title: params.title,
            contents: params.contents,
            author_id: params.author_id,
            created: params.created,
            last_edited: None,
            slug: params.slug,
            published: params.published,
        };
        state.posts.push(post.clone());
        state
            .post_tags
            .extend(params.tag_ids.iter().map(|tag| (post.id, *tag)));
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut state = self.state.lock().expect("lock");
        let post = state
            .posts
            .iter_mut()
            .find(|post| post.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.title = params.title;
        post.contents = params.contents;
        post.published = params.published;
        post.last_edited = Some(params.last_edited);
        let post = post.clone();

        state.post_tags.retain(|(post_id, _)| *post_id != post.id);
        state
            .post_tags
            .extend(params.tag_ids.iter().map(|tag| (post.id, *tag)));
        Ok(post)
    }
}

#[async_trait]
impl UsersRepo for MemoryStore {
    async fn list_all(&self) -> Result<Vec<UserRecord>, RepoError> {
        Ok(self.state.lock().expect("lock").users.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepoError> {
        let state = self.state.lock().expect("lock");
        Ok(state.users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<UserRecord>, RepoError> {
        let state = self.state.lock().expect("lock");
        Ok(state
            .users
            .iter()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, RepoError> {
        let state = self.state.lock().expect("lock");
        Ok(state
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn list_with_counts(&self) -> Result<Vec<UserWithCount>, RepoError> {
        let users = self.state.lock().expect("lock").users.clone();
        Ok(users
            .into_iter()
            .map(|user| {
                let post_count = self.published_count(|_, post| post.author_id == user.id);
                UserWithCount { user, post_count }
            })
            .collect())
    }
}

#[async_trait]
impl TagsRepo for MemoryStore {
    async fn list_all(&self) -> Result<Vec<TagRecord>, RepoError> {
        Ok(self.state.lock().expect("lock").tags.clone())
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<TagRecord>, RepoError> {
        let mut map = self.list_for_posts(&[post_id]).await?;
        Ok(map.remove(&post_id).unwrap_or_default())
    }

    async fn list_for_posts(
        &self,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<TagRecord>>, RepoError> {
        let state = self.state.lock().expect("lock");
        let mut grouped: HashMap<i64, Vec<TagRecord>> = HashMap::new();
        for (post_id, tag_id) in &state.post_tags {
            if !post_ids.contains(post_id) {
                continue;
            }
            if let Some(tag) = state.tags.iter().find(|tag| tag.id == *tag_id) {
                grouped.entry(*post_id).or_default().push(tag.clone());
            }
        }
        Ok(grouped)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<TagRecord>, RepoError> {
        let state = self.state.lock().expect("lock");
        Ok(state.tags.iter().find(|tag| tag.name == name).cloned())
    }

    async fn list_with_counts(&self) -> Result<Vec<TagWithCount>, RepoError> {
        let tags = self.state.lock().expect("lock").tags.clone();
        Ok(tags
            .into_iter()
            .map(|tag| {
                let post_count = self
                    .published_count(|state, post| state.post_tags.contains(&(post.id, tag.id)));
                TagWithCount { tag, post_count }
            })
            .collect())
    }
}

#[async_trait]
impl TagsWriteRepo for MemoryStore {
    async fn find_or_create(&self, name: &str) -> Result<TagRecord, RepoError> {
        let mut state = self.state.lock().expect("lock");
        let id = Self::tag_id_for(&mut state, name);
        Ok(TagRecord {
            id,
            name: name.to_string(),
        })
    }
}

/// Records every page handed to it and renders the template name.
#[derive(Default)]
pub struct CapturingRenderer {
    pages: Mutex<Vec<PageView>>,
}

impl CapturingRenderer {
    pub fn last(&self) -> PageView {
        self.pages
            .lock()
            .expect("lock")
            .last()
            .cloned()
            .expect("a page was rendered")
    }

    pub fn count(&self) -> usize {
        self.pages.lock().expect("lock").len()
    }
}

impl ViewRenderer for CapturingRenderer {
    fn render(&self, page: PageView) -> Result<Html<String>, TemplateRenderError> {
        let name = page.template_name();
        self.pages.lock().expect("lock").push(page);
        Ok(Html(name.to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub renderer: Arc<CapturingRenderer>,
}

impl TestApp {
    pub fn new(per_page: u32) -> Self {
        let store = Arc::new(MemoryStore::default());
        let renderer = Arc::new(CapturingRenderer::default());

        let blog = BlogService::new(store.clone(), store.clone(), store.clone(), per_page);
        let admin =
            AdminPostService::new(store.clone(), store.clone(), store.clone(), store.clone());
        let views = ViewFactory::new(
            renderer.clone(),
            SiteContext {
                disqus_name: Some("lectern-test".to_string()),
                site_twitter_handle: Some("lecternblog".to_string()),
                blog_root: BLOG_ROOT.to_string(),
            },
        );

        let state = BlogState {
            blog: Arc::new(blog),
            admin: Arc::new(admin),
            views: Arc::new(views),
            public_site_url: Url::parse(SITE_URL).expect("site url"),
        };

        Self {
            router: build_router(state),
            store,
            renderer,
        }
    }

    pub async fn get(&self, uri: &str, user: Option<&UserRecord>) -> Response<Body> {
        let mut request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");
        if let Some(user) = user {
            request.extensions_mut().insert(CurrentUser(user.clone()));
        }
        self.send(request).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, user: Option<&UserRecord>) -> Response<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("request should build");
        if let Some(user) = user {
            request.extensions_mut().insert(CurrentUser(user.clone()));
        }
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .expect("location header")
}
