use std::collections::HashMap;

use async_trait::async_trait;

use crate::application::repos::{RepoError, TagsRepo, TagsWriteRepo};
use crate::domain::entities::{TagRecord, TagWithCount};
use crate::infra::db::map_sqlx_error;

use super::PostgresRepositories;

#[derive(sqlx::FromRow)]
struct TagRow {
    id: i64,
    name: String,
}

impl From<TagRow> for TagRecord {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostTagRow {
    post_id: i64,
    id: i64,
    name: String,
}

#[derive(sqlx::FromRow)]
struct TagCountRow {
    id: i64,
    name: String,
    post_count: i64,
}

#[async_trait]
impl TagsRepo for PostgresRepositories {
    async fn list_all(&self) -> Result<Vec<TagRecord>, RepoError> {
        let rows = sqlx::query_as::<_, TagRow>("SELECT id, name FROM tags ORDER BY LOWER(name), id")
            .fetch_all(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        Ok(rows.into_iter().map(TagRecord::from).collect())
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<TagRecord>, RepoError> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT t.id, t.name
            FROM tags t
            INNER JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(self.pool())
        .await
        .map_err(RepoError::from_persistence)?;

        Ok(rows.into_iter().map(TagRecord::from).collect())
    }

    async fn list_for_posts(
        &self,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<TagRecord>>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT pt.post_id, t.id, t.name
            FROM post_tags pt
            INNER JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ANY($1)
            ORDER BY pt.post_id, t.name ASC
            "#,
        )
        .bind(post_ids)
        .fetch_all(self.pool())
        .await
        .map_err(RepoError::from_persistence)?;

        let mut grouped: HashMap<i64, Vec<TagRecord>> = HashMap::new();
        for row in rows {
            grouped.entry(row.post_id).or_default().push(TagRecord {
                id: row.id,
                name: row.name,
            });
        }

        Ok(grouped)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<TagRecord>, RepoError> {
        let row = sqlx::query_as::<_, TagRow>("SELECT id, name FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        Ok(row.map(TagRecord::from))
    }

    async fn list_with_counts(&self) -> Result<Vec<TagWithCount>, RepoError> {
        let rows = sqlx::query_as::<_, TagCountRow>(
            r#"
            SELECT t.id, t.name, COUNT(p.id) AS post_count
            FROM tags t
            LEFT JOIN post_tags pt ON pt.tag_id = t.id
            LEFT JOIN posts p ON p.id = pt.post_id AND p.published
            GROUP BY t.id, t.name
            ORDER BY LOWER(t.name), t.id
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(RepoError::from_persistence)?;

        rows.into_iter()
            .map(|row| {
                Ok(TagWithCount {
                    post_count: Self::convert_count(row.post_count)?,
                    tag: TagRecord {
                        id: row.id,
                        name: row.name,
                    },
                })
            })
            .collect()
    }
}

#[async_trait]
impl TagsWriteRepo for PostgresRepositories {
    async fn find_or_create(&self, name: &str) -> Result<TagRecord, RepoError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }
}
