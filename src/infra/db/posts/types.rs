use crate::application::repos::RepoError;
use crate::domain::entities::PostRecord;
use crate::domain::posts::from_epoch_seconds;

pub(crate) const POST_COLUMNS: &str =
    "p.id, p.title, p.contents, p.author_id, p.created, p.last_edited, p.slug_url, p.published";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) contents: String,
    pub(crate) author_id: i64,
    pub(crate) created: f64,
    pub(crate) last_edited: Option<f64>,
    pub(crate) slug_url: String,
    pub(crate) published: bool,
}

impl TryFrom<PostRow> for PostRecord {
    type Error = RepoError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let integrity = |err: crate::domain::error::DomainError| RepoError::Integrity {
            message: format!("post {}: {err}", row.id),
        };

        let created = from_epoch_seconds(row.created).map_err(integrity)?;
        let last_edited = row
            .last_edited
            .map(from_epoch_seconds)
            .transpose()
            .map_err(integrity)?;

        Ok(Self {
            id: row.id,
            title: row.title,
            contents: row.contents,
            author_id: row.author_id,
            created,
            last_edited,
            slug: row.slug_url,
            published: row.published,
        })
    }
}

pub(crate) fn into_records(rows: Vec<PostRow>) -> Result<Vec<PostRecord>, RepoError> {
    rows.into_iter().map(PostRecord::try_from).collect()
}
