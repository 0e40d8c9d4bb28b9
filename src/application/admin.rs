//! Write side of the blog: creating and editing posts.

use std::collections::HashSet;
use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::application::repos::{
    CreatePostParams, PostsRepo, PostsWriteRepo, RepoError, TagsRepo, TagsWriteRepo,
    UpdatePostParams,
};
use crate::domain::entities::{PostRecord, TagRecord, UserRecord};
use crate::domain::error::DomainError;
use crate::domain::slug::{SlugAsyncError, SlugError, derive_slug, generate_unique_slug_async};

pub const METRIC_POSTS_CREATED: &str = "lectern_posts_created_total";
pub const METRIC_SLUG_COLLISIONS: &str = "lectern_slug_collisions_total";
pub const METRIC_SLUG_LOOKUP_FAILURES: &str = "lectern_slug_lookup_failures_total";

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error("slug `{slug}` is already taken")]
    SlugConflict { slug: String },
    #[error("post `{0}` does not exist")]
    UnknownPost(i64),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub contents: String,
    pub tags: Vec<String>,
    pub published: bool,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: i64,
    pub title: String,
    pub contents: String,
    pub tags: Vec<String>,
    pub published: bool,
}

#[derive(Clone)]
pub struct AdminPostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    tags: Arc<dyn TagsRepo>,
    tags_writer: Arc<dyn TagsWriteRepo>,
}

impl AdminPostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        tags: Arc<dyn TagsRepo>,
        tags_writer: Arc<dyn TagsWriteRepo>,
    ) -> Self {
        Self {
            reader,
            writer,
            tags,
            tags_writer,
        }
    }

    pub async fn find_post(&self, id: i64) -> Result<PostRecord, AdminPostError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(AdminPostError::UnknownPost(id))
    }

    pub async fn post_tags(&self, id: i64) -> Result<Vec<TagRecord>, AdminPostError> {
        Ok(self.tags.list_for_post(id).await?)
    }

    pub async fn create_post(
        &self,
        author: &UserRecord,
        command: CreatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        validate_post(&command.title, &command.contents)?;

        let slug = self.unique_slug(&command.title).await?;
        let tag_ids = self.resolve_tags(&command.tags).await?;

        let params = CreatePostParams {
            title: command.title,
            contents: command.contents,
            author_id: author.id,
            slug: slug.clone(),
            published: command.published,
            created: OffsetDateTime::now_utc(),
            tag_ids,
        };

        let post = self.writer.create_post(params).await.map_err(|err| match err {
            RepoError::Duplicate { .. } => AdminPostError::SlugConflict { slug },
            other => AdminPostError::Repo(other),
        })?;

        counter!(METRIC_POSTS_CREATED).increment(1);
        info!(
            target = "lectern::application::admin",
            post_id = post.id,
            slug = %post.slug,
            published = post.published,
            "post created"
        );

        Ok(post)
    }

    /// Updates content and tags. The slug stays as it was at creation.
    pub async fn update_post(
        &self,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        validate_post(&command.title, &command.contents)?;

        let existing = self.find_post(command.id).await?;
        let tag_ids = self.resolve_tags(&command.tags).await?;

        let params = UpdatePostParams {
            id: existing.id,
            title: command.title,
            contents: command.contents,
            published: command.published,
            last_edited: OffsetDateTime::now_utc(),
            tag_ids,
        };

        let post = self.writer.update_post(params).await.map_err(|err| match err {
            RepoError::NotFound => AdminPostError::UnknownPost(command.id),
            other => AdminPostError::Repo(other),
        })?;

        info!(
            target = "lectern::application::admin",
            post_id = post.id,
            slug = %post.slug,
            "post updated"
        );

        Ok(post)
    }

    /// Find a free slug for `title`.
    ///
    /// A failed uniqueness lookup does not abort the write: the candidate
    /// under test is used and the database unique constraint decides. Such a
    /// write can still fail later with [`AdminPostError::SlugConflict`].
    async fn unique_slug(&self, title: &str) -> Result<String, AdminPostError> {
        let reader = self.reader.clone();
        let result = generate_unique_slug_async(title, move |candidate| {
            let reader = reader.clone();
            let candidate = candidate.to_string();
            async move { reader.slug_exists(&candidate).await.map(|exists| !exists) }
        })
        .await;

        match result {
            Ok(slug) => {
                if derive_slug(title).is_ok_and(|base| base != slug) {
                    counter!(METRIC_SLUG_COLLISIONS).increment(1);
                }
                Ok(slug)
            }
            Err(SlugAsyncError::Lookup { candidate, source }) => {
                counter!(METRIC_SLUG_LOOKUP_FAILURES).increment(1);
                warn!(
                    target = "lectern::application::admin",
                    slug = %candidate,
                    error = %source,
                    "slug uniqueness lookup failed; relying on unique constraint"
                );
                Ok(candidate)
            }
            Err(SlugAsyncError::Slug(err)) => Err(err.into()),
        }
    }

    /// Tags are resolved before the post is written, so a failure here leaves no post behind.
    async fn resolve_tags(&self, names: &[String]) -> Result<Vec<i64>, AdminPostError> {
        let mut tag_ids = Vec::with_capacity(names.len());
        for name in names {
            tag_ids.push(self.tags_writer.find_or_create(name).await?.id);
        }
        Ok(tag_ids)
    }
}

pub fn validate_post(title: &str, contents: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("title", "title must not be empty"));
    }
    if contents.trim().is_empty() {
        return Err(DomainError::validation(
            "contents",
            "contents must not be empty",
        ));
    }
    Ok(())
}

/// Split a comma separated tag field into distinct, trimmed names.
pub fn parse_tag_list(input: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}
