use async_trait::async_trait;
use sqlx::{query, query_as};
use time::OffsetDateTime;

use crate::application::repos::{
    ContentWriteRepo, CreatePostParams, CreateUserParams, RepoError,
};
use crate::domain::entities::{PostRecord, UserRecord};
use crate::domain::tags::encode_tags;

use super::SqliteRepositories;
use super::types::{PostRow, UserRow};
use super::users::USER_COLUMNS;
use super::util::map_sqlx_error;

#[async_trait]
impl ContentWriteRepo for SqliteRepositories {
    async fn clear_content(&self) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        query("DELETE FROM posts")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        query("DELETE FROM users")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        query("DELETE FROM sqlite_sequence WHERE name IN ('users', 'posts')")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let sql = format!(
            "INSERT INTO users (name, email, avatar, role, bio, location, joined_date, \
             website, github, twitter, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {USER_COLUMNS}"
        );

        let row = query_as::<_, UserRow>(&sql)
            .bind(params.name)
            .bind(params.email)
            .bind(params.avatar)
            .bind(params.role)
            .bind(params.bio)
            .bind(params.location)
            .bind(params.joined_date)
            .bind(params.website)
            .bind(params.github)
            .bind(params.twitter)
            .bind(now)
            .bind(now)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(UserRecord::from(row))
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        if params.read_time <= 0 {
            return Err(RepoError::InvalidInput {
                message: "read time must be positive".to_string(),
            });
        }

        let now = OffsetDateTime::now_utc();
        let tags = encode_tags(&params.tags)?;

        let row = query_as::<_, PostRow>(
            "INSERT INTO posts (title, excerpt, content, author_id, published_date, \
             read_time, tags, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING id, title, excerpt, content, author_id, published_date, \
             read_time, tags, created_at, updated_at",
        )
        .bind(params.title)
        .bind(params.excerpt)
        .bind(params.content)
        .bind(params.author_id)
        .bind(params.published_date)
        .bind(params.read_time)
        .bind(tags)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        PostRecord::try_from(row)
    }
}
