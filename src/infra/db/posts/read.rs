use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use crate::application::pagination::{PageRequest, Paginated};
use crate::application::repos::{PostListFilter, PostsRepo, RepoError};
use crate::domain::entities::PostRecord;

use super::PostgresRepositories;
use super::types::{POST_COLUMNS, PostRow, into_records};

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.slug_url = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        row.map(PostRecord::try_from).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        row.map(PostRecord::try_from).transpose()
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE slug_url = $1)")
            .bind(slug)
            .fetch_one(self.pool())
            .await
            .map_err(RepoError::from_persistence)
    }

    async fn list_posts(
        &self,
        filter: PostListFilter,
        page: PageRequest,
    ) -> Result<Paginated<PostRecord>, RepoError> {
        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM posts p WHERE TRUE");
        Self::apply_post_filter(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        qb.push(POST_COLUMNS);
        qb.push(" FROM posts p WHERE TRUE");
        Self::apply_post_filter(&mut qb, filter);
        qb.push(" ORDER BY p.created DESC, p.id DESC LIMIT ");
        qb.push_bind(Self::convert_page_bound(page.limit())?);
        qb.push(" OFFSET ");
        qb.push_bind(Self::convert_page_bound(page.offset())?);

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        Ok(Paginated::new(
            into_records(rows)?,
            page,
            Self::convert_count(total)?,
        ))
    }

    async fn list_all(&self, filter: PostListFilter) -> Result<Vec<PostRecord>, RepoError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        qb.push(POST_COLUMNS);
        qb.push(" FROM posts p WHERE TRUE");
        Self::apply_post_filter(&mut qb, filter);
        qb.push(" ORDER BY p.created DESC, p.id DESC");

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        into_records(rows)
    }
}
