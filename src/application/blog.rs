//! Read side of the blog: fetches and hydrates what each page shows.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::application::pagination::{PageRequest, Paginated};
use crate::application::repos::{PostListFilter, PostsRepo, RepoError, TagsRepo, UsersRepo};
use crate::domain::entities::{
    HydratedPost, PostRecord, TagRecord, TagWithCount, UserRecord, UserWithCount,
};

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("no visible post with slug `{0}`")]
    UnknownPost(String),
    #[error("no tag named `{0}`")]
    UnknownTag(String),
    #[error("no author with username `{0}`")]
    UnknownAuthor(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct BlogIndex {
    pub posts: Paginated<HydratedPost>,
    pub tags: Vec<TagRecord>,
    pub authors: Vec<UserRecord>,
}

#[derive(Debug, Clone)]
pub struct PostPage {
    pub post: HydratedPost,
    pub author: UserRecord,
}

#[derive(Debug, Clone)]
pub struct TagPage {
    pub tag: TagWithCount,
    pub posts: Paginated<HydratedPost>,
}

#[derive(Debug, Clone)]
pub struct AuthorPage {
    pub author: UserWithCount,
    pub posts: Paginated<HydratedPost>,
}

#[derive(Debug, Clone, Default)]
pub struct AdminDashboard {
    pub users: Vec<UserRecord>,
    pub published_posts: Vec<HydratedPost>,
    pub draft_posts: Vec<HydratedPost>,
}

#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostsRepo>,
    users: Arc<dyn UsersRepo>,
    tags: Arc<dyn TagsRepo>,
    per_page: u32,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        users: Arc<dyn UsersRepo>,
        tags: Arc<dyn TagsRepo>,
        per_page: u32,
    ) -> Self {
        Self {
            posts,
            users,
            tags,
            per_page,
        }
    }

    #[instrument(skip(self))]
    pub async fn index_page(&self, page: u32) -> Result<BlogIndex, BlogError> {
        let request = self.page_request(page)?;
        let posts = self
            .posts
            .list_posts(PostListFilter::published(), request)
            .await?;
        let posts = self.hydrate_page(posts).await?;

        let tags = self.tags.list_all().await?;
        let authors = self.users.list_all().await?;

        Ok(BlogIndex {
            posts,
            tags,
            authors,
        })
    }

    /// Drafts are only visible when `include_drafts` is set.
    #[instrument(skip(self))]
    pub async fn post_by_slug(
        &self,
        slug: &str,
        include_drafts: bool,
    ) -> Result<PostPage, BlogError> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .filter(|post| post.published || include_drafts)
            .ok_or_else(|| BlogError::UnknownPost(slug.to_string()))?;

        let mut hydrated = self.hydrate(vec![post]).await?;
        let post = hydrated
            .pop()
            .ok_or_else(|| BlogError::UnknownPost(slug.to_string()))?;

        let author = post.author.clone().ok_or_else(|| {
            BlogError::Repo(RepoError::Integrity {
                message: format!("post `{slug}` references a missing author"),
            })
        })?;

        Ok(PostPage { post, author })
    }

    #[instrument(skip(self))]
    pub async fn tag_page(&self, name: &str, page: u32) -> Result<TagPage, BlogError> {
        let tag = self
            .tags
            .find_by_name(name)
            .await?
            .ok_or_else(|| BlogError::UnknownTag(name.to_string()))?;

        let request = self.page_request(page)?;
        let posts = self
            .posts
            .list_posts(PostListFilter::published().with_tag(tag.id), request)
            .await?;
        let post_count = posts.total;
        let posts = self.hydrate_page(posts).await?;

        Ok(TagPage {
            tag: TagWithCount { tag, post_count },
            posts,
        })
    }

    #[instrument(skip(self))]
    pub async fn author_page(&self, username: &str, page: u32) -> Result<AuthorPage, BlogError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| BlogError::UnknownAuthor(username.to_string()))?;

        let request = self.page_request(page)?;
        let posts = self
            .posts
            .list_posts(PostListFilter::published().with_author(user.id), request)
            .await?;
        let post_count = posts.total;
        let posts = self.hydrate_page(posts).await?;

        Ok(AuthorPage {
            author: UserWithCount { user, post_count },
            posts,
        })
    }

    pub async fn find_author(&self, id: i64) -> Result<UserRecord, BlogError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| BlogError::UnknownAuthor(id.to_string()))
    }

    pub async fn all_tags(&self) -> Result<Vec<TagWithCount>, BlogError> {
        Ok(self.tags.list_with_counts().await?)
    }

    pub async fn all_authors(&self) -> Result<Vec<UserWithCount>, BlogError> {
        Ok(self.users.list_with_counts().await?)
    }

    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, BlogError> {
        let published = self.posts.list_all(PostListFilter::published()).await?;
        let drafts = self.posts.list_all(PostListFilter::drafts()).await?;

        Ok(AdminDashboard {
            users: self.users.list_all().await?,
            published_posts: self.hydrate(published).await?,
            draft_posts: self.hydrate(drafts).await?,
        })
    }

    fn page_request(&self, page: u32) -> Result<PageRequest, BlogError> {
        PageRequest::new(page, self.per_page).map_err(|err| BlogError::Repo(err.into()))
    }

    async fn hydrate_page(
        &self,
        page: Paginated<PostRecord>,
    ) -> Result<Paginated<HydratedPost>, BlogError> {
        let Paginated {
            items,
            page,
            per_page,
            total,
        } = page;
        let items = self.hydrate(items).await?;
        Ok(Paginated {
            items,
            page,
            per_page,
            total,
        })
    }

    async fn hydrate(&self, posts: Vec<PostRecord>) -> Result<Vec<HydratedPost>, BlogError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let author_ids: Vec<i64> = posts
            .iter()
            .map(|post| post.author_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let post_ids: Vec<i64> = posts.iter().map(|post| post.id).collect();

        let authors: HashMap<i64, UserRecord> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();
        let mut tags = self.tags.list_for_posts(&post_ids).await?;

        debug!(
            target = "lectern::application::blog",
            posts = posts.len(),
            authors = authors.len(),
            "hydrated posts"
        );

        Ok(posts
            .into_iter()
            .map(|post| HydratedPost {
                author: authors.get(&post.author_id).cloned(),
                tags: tags.remove(&post.id).unwrap_or_default(),
                post,
            })
            .collect())
    }
}
