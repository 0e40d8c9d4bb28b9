use async_trait::async_trait;
use sqlx::PgConnection;

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::domain::posts::to_epoch_seconds;
use crate::infra::db::map_sqlx_error;

use super::PostgresRepositories;
use super::types::PostRow;

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            title,
            contents,
            author_id,
            slug,
            published,
            created,
            tag_ids,
        } = params;

        let mut tx = self.pool().begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, contents, author_id, created, slug_url, published)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, contents, author_id, created, last_edited, slug_url, published
            "#,
        )
        .bind(title)
        .bind(contents)
        .bind(author_id)
        .bind(to_epoch_seconds(created))
        .bind(slug)
        .bind(published)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        link_tags(&mut tx, row.id, &tag_ids).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        PostRecord::try_from(row)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            id,
            title,
            contents,
            published,
            last_edited,
            tag_ids,
        } = params;

        let mut tx = self.pool().begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = $2,
                contents = $3,
                published = $4,
                last_edited = $5
            WHERE id = $1
            RETURNING id, title, contents, author_id, created, last_edited, slug_url, published
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(contents)
        .bind(published)
        .bind(to_epoch_seconds(last_edited))
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        link_tags(&mut tx, id, &tag_ids).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        PostRecord::try_from(row)
    }
}

async fn link_tags(conn: &mut PgConnection, post_id: i64, tag_ids: &[i64]) -> Result<(), RepoError> {
    if tag_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO post_tags (post_id, tag_id)
        SELECT $1, id
        FROM UNNEST($2::bigint[]) AS id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(tag_ids)
    .execute(conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}
