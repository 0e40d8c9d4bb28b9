//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub contents: String,
    pub author_id: i64,
    pub created: OffsetDateTime,
    pub last_edited: Option<OffsetDateTime>,
    pub slug: String,
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub profile_picture: Option<String>,
    pub twitter_handle: Option<String>,
    pub biography: Option<String>,
    pub tagline: Option<String>,
    pub reset_password_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagRecord {
    pub id: i64,
    pub name: String,
}

/// A post together with the rows it references.
///
/// `author` is `None` only when the author row has gone missing, which the
/// foreign key normally prevents.
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedPost {
    pub post: PostRecord,
    pub author: Option<UserRecord>,
    pub tags: Vec<TagRecord>,
}

/// Author paired with the number of published posts they wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithCount {
    pub user: UserRecord,
    pub post_count: u64,
}

/// Tag paired with the number of published posts carrying it.
#[derive(Debug, Clone, PartialEq)]
pub struct TagWithCount {
    pub tag: TagRecord,
    pub post_count: u64,
}
