//! Repository traits describing persistence adapters.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::application::pagination::{PageRequest, Paginated, PaginationError};
use crate::domain::entities::{PostRecord, TagRecord, TagWithCount, UserRecord, UserWithCount};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Narrows post listings. `None` fields do not filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostListFilter {
    pub published: Option<bool>,
    pub author_id: Option<i64>,
    pub tag_id: Option<i64>,
}

impl PostListFilter {
    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }

    pub fn drafts() -> Self {
        Self {
            published: Some(false),
            ..Self::default()
        }
    }

    pub fn with_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn with_tag(mut self, tag_id: i64) -> Self {
        self.tag_id = Some(tag_id);
        self
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub contents: String,
    pub author_id: i64,
    pub slug: String,
    pub published: bool,
    pub created: OffsetDateTime,
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: i64,
    pub title: String,
    pub contents: String,
    pub published: bool,
    pub last_edited: OffsetDateTime,
    /// Replaces every tag link of the post.
    pub tag_ids: Vec<i64>,
}

/// Read access to posts. Listings are ordered newest first.
#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;

    async fn list_posts(
        &self,
        filter: PostListFilter,
        page: PageRequest,
    ) -> Result<Paginated<PostRecord>, RepoError>;

    async fn list_all(&self, filter: PostListFilter) -> Result<Vec<PostRecord>, RepoError>;
}

/// Post writes. The post row and its tag links are stored atomically.
#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;
}

/// Read access to authors. Counts only include published posts.
#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<UserRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepoError>;

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<UserRecord>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, RepoError>;

    async fn list_with_counts(&self) -> Result<Vec<UserWithCount>, RepoError>;
}

/// Read access to tags. Counts only include published posts.
#[async_trait]
pub trait TagsRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<TagRecord>, RepoError>;

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<TagRecord>, RepoError>;

    async fn list_for_posts(
        &self,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<TagRecord>>, RepoError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<TagRecord>, RepoError>;

    async fn list_with_counts(&self) -> Result<Vec<TagWithCount>, RepoError>;
}

#[async_trait]
pub trait TagsWriteRepo: Send + Sync {
    async fn find_or_create(&self, name: &str) -> Result<TagRecord, RepoError>;
}
