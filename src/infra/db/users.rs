use async_trait::async_trait;
use sqlx::{query_as, query_scalar};

use crate::application::repos::{RepoError, UsersRepo};
use crate::domain::entities::{PostHeadline, UserRecord};

use super::SqliteRepositories;
use super::types::{PostHeadlineRow, UserRow};
use super::util::{convert_count, map_sqlx_error};

pub(super) const USER_COLUMNS: &str = "id, name, email, avatar, role, bio, location, joined_date, \
     website, github, twitter, created_at, updated_at";

#[async_trait]
impl UsersRepo for SqliteRepositories {
    async fn count_users(&self) -> Result<u64, RepoError> {
        let count: i64 = query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        convert_count(count)
    }

    async fn find_user_at_offset(&self, offset: u64) -> Result<Option<UserRecord>, RepoError> {
        let offset = i64::try_from(offset).map_err(|_| RepoError::InvalidInput {
            message: format!("offset {offset} exceeds supported range"),
        })?;

        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT 1 OFFSET ?");
        let row = query_as::<_, UserRow>(&sql)
            .bind(offset)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(UserRecord::from))
    }

    async fn list_post_headlines(&self, author_id: i64) -> Result<Vec<PostHeadline>, RepoError> {
        let rows = query_as::<_, PostHeadlineRow>(
            "SELECT id, title, content FROM posts \
             WHERE author_id = ? \
             ORDER BY published_date DESC, id DESC",
        )
        .bind(author_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostHeadline::from).collect())
    }
}
