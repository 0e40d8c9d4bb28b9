use async_trait::async_trait;

use crate::application::repos::{RepoError, UsersRepo};
use crate::domain::entities::{UserRecord, UserWithCount};

use super::PostgresRepositories;

const USER_COLUMNS: &str = "u.id, u.name, u.username, u.profile_picture, u.twitter_handle, \
    u.biography, u.tagline, u.reset_password_required";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    username: String,
    profile_picture: Option<String>,
    twitter_handle: Option<String>,
    biography: Option<String>,
    tagline: Option<String>,
    reset_password_required: bool,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            username: row.username,
            profile_picture: row.profile_picture,
            twitter_handle: row.twitter_handle,
            biography: row.biography,
            tagline: row.tagline,
            reset_password_required: row.reset_password_required,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserCountRow {
    #[sqlx(flatten)]
    user: UserRow,
    post_count: i64,
}

#[async_trait]
impl UsersRepo for PostgresRepositories {
    async fn list_all(&self) -> Result<Vec<UserRecord>, RepoError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u ORDER BY u.name, u.id");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepoError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<UserRecord>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ANY($1)");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(ids)
            .fetch_all(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, RepoError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.username = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        Ok(row.map(UserRecord::from))
    }

    async fn list_with_counts(&self) -> Result<Vec<UserWithCount>, RepoError> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}, COUNT(p.id) AS post_count
            FROM users u
            LEFT JOIN posts p ON p.author_id = u.id AND p.published
            GROUP BY u.id
            ORDER BY u.name, u.id
            "#
        );
        let rows = sqlx::query_as::<_, UserCountRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        rows.into_iter()
            .map(|row| {
                Ok(UserWithCount {
                    post_count: Self::convert_count(row.post_count)?,
                    user: row.user.into(),
                })
            })
            .collect()
    }
}
