//! Typed display projections of posts, authors and tags.
//!
//! Each page picks the projection carrying exactly the derived fields it
//! shows: cards get the short snippet, listings the long snippet and tags,
//! the post page everything including ISO-8601 timestamps.

use std::ops::Deref;

use serde::Serialize;
use url::form_urlencoded;

use crate::domain::{
    entities::{HydratedPost, PostRecord, TagRecord, TagWithCount, UserRecord, UserWithCount},
    posts::{format_full_date, format_iso8601, long_snippet, short_snippet, to_epoch_seconds},
};

/// Stored post fields, no derived data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub contents: String,
    pub author_id: i64,
    pub created: f64,
    pub slug_url: String,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<f64>,
}

/// Author and creation date shown next to every derived projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostByline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_username: Option<String>,
    pub created_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSnippetView {
    #[serde(flatten)]
    pub post: PostView,
    #[serde(flatten)]
    pub byline: PostByline,
    pub short_snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostListingView {
    #[serde(flatten)]
    pub post: PostView,
    #[serde(flatten)]
    pub byline: PostByline,
    pub long_snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagView>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetailView {
    #[serde(flatten)]
    pub post: PostView,
    #[serde(flatten)]
    pub byline: PostByline,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagView>>,
    pub created_date_iso8601: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_edited_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_edited_date_iso8601: Option<String>,
    pub short_snippet: String,
    pub long_snippet: String,
}

macro_rules! deref_to_post {
    ($($view:ty),+) => {
        $(
            impl Deref for $view {
                type Target = PostView;

                fn deref(&self) -> &PostView {
                    &self.post
                }
            }
        )+
    };
}

deref_to_post!(PostSnippetView, PostListingView, PostDetailView);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithCountView {
    #[serde(flatten)]
    pub user: UserView,
    pub post_count: u64,
}

impl Deref for UserWithCountView {
    type Target = UserView;

    fn deref(&self) -> &UserView {
        &self.user
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagView {
    pub id: i64,
    pub name: String,
    /// Name encoded for use as a path segment.
    pub url_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagWithCountView {
    #[serde(flatten)]
    pub tag: TagView,
    pub post_count: u64,
}

impl Deref for TagWithCountView {
    type Target = TagView;

    fn deref(&self) -> &TagView {
        &self.tag
    }
}

pub fn project_post(post: &PostRecord) -> PostView {
    PostView {
        id: post.id,
        title: post.title.clone(),
        contents: post.contents.clone(),
        author_id: post.author_id,
        created: to_epoch_seconds(post.created),
        slug_url: post.slug.clone(),
        published: post.published,
        last_edited: post.last_edited.map(to_epoch_seconds),
    }
}

pub fn project_post_snippet(hydrated: &HydratedPost) -> PostSnippetView {
    PostSnippetView {
        post: project_post(&hydrated.post),
        byline: byline(hydrated),
        short_snippet: short_snippet(&hydrated.post.contents),
    }
}

pub fn project_post_listing(hydrated: &HydratedPost) -> PostListingView {
    PostListingView {
        post: project_post(&hydrated.post),
        byline: byline(hydrated),
        long_snippet: long_snippet(&hydrated.post.contents),
        tags: project_tag_list(&hydrated.tags),
    }
}

pub fn project_post_detail(hydrated: &HydratedPost) -> PostDetailView {
    let post = &hydrated.post;
    PostDetailView {
        post: project_post(post),
        byline: byline(hydrated),
        tags: project_tag_list(&hydrated.tags),
        created_date_iso8601: format_iso8601(post.created),
        last_edited_date: post.last_edited.map(format_full_date),
        last_edited_date_iso8601: post.last_edited.map(format_iso8601),
        short_snippet: short_snippet(&post.contents),
        long_snippet: long_snippet(&post.contents),
    }
}

pub fn project_user(user: &UserRecord) -> UserView {
    UserView {
        id: user.id,
        name: user.name.clone(),
        username: user.username.clone(),
        profile_picture: user.profile_picture.clone(),
        twitter_handle: user.twitter_handle.clone(),
        biography: user.biography.clone(),
        tagline: user.tagline.clone(),
    }
}

pub fn project_user_with_count(entry: &UserWithCount) -> UserWithCountView {
    UserWithCountView {
        user: project_user(&entry.user),
        post_count: entry.post_count,
    }
}

pub fn project_tag(tag: &TagRecord) -> TagView {
    TagView {
        id: tag.id,
        name: tag.name.clone(),
        url_name: encode_path_segment(&tag.name),
    }
}

pub fn project_tag_with_count(entry: &TagWithCount) -> TagWithCountView {
    TagWithCountView {
        tag: project_tag(&entry.tag),
        post_count: entry.post_count,
    }
}

fn project_tag_list(tags: &[TagRecord]) -> Option<Vec<TagView>> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.iter().map(project_tag).collect())
    }
}

fn byline(hydrated: &HydratedPost) -> PostByline {
    PostByline {
        author_name: hydrated.author.as_ref().map(|author| author.name.clone()),
        author_username: hydrated.author.as_ref().map(|author| author.username.clone()),
        created_date: format_full_date(hydrated.post.created),
    }
}

fn encode_path_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
