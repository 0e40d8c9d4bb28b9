//! Postgres-backed repository implementations.

mod posts;
mod tags;
mod users;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use sqlx::{
    Postgres, QueryBuilder,
    postgres::{PgPool, PgPoolOptions},
};

use crate::application::repos::{PostListFilter, RepoError};
use crate::infra::error::InfraError;

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), InfraError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(InfraError::from)
    }

    /// Appends ` AND …` clauses for `filter`; the builder must already hold a `WHERE`.
    fn apply_post_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: PostListFilter) {
        if let Some(published) = filter.published {
            qb.push(" AND p.published = ");
            qb.push_bind(published);
        }

        if let Some(author_id) = filter.author_id {
            qb.push(" AND p.author_id = ");
            qb.push_bind(author_id);
        }

        if let Some(tag_id) = filter.tag_id {
            qb.push(" AND EXISTS (SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.tag_id = ");
            qb.push_bind(tag_id);
            qb.push(")");
        }
    }

    fn convert_count(value: i64) -> Result<u64, RepoError> {
        value
            .try_into()
            .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }

    fn convert_page_bound(value: u64) -> Result<i64, RepoError> {
        value
            .try_into()
            .map_err(|_| RepoError::from_persistence("page bound exceeds supported range"))
    }
}
