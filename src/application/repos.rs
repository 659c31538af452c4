//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{PostHeadline, PostRecord, PostWithAuthor, UserRecord};
use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("stored value could not be decoded: {message}")]
    Decode { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<DomainError> for RepoError {
    fn from(err: DomainError) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub joined_date: OffsetDateTime,
    pub website: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author_id: i64,
    pub published_date: OffsetDateTime,
    pub read_time: i64,
    pub tags: Vec<String>,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn count_users(&self) -> Result<u64, RepoError>;

    /// Row at `offset` in primary-key order, if the table still has that many rows.
    async fn find_user_at_offset(&self, offset: u64) -> Result<Option<UserRecord>, RepoError>;

    /// Posts by `author_id`, newest `published_date` first.
    async fn list_post_headlines(&self, author_id: i64) -> Result<Vec<PostHeadline>, RepoError>;
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_post_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError>;

    /// Every post, newest `published_date` first.
    async fn list_posts_with_author(&self) -> Result<Vec<PostWithAuthor>, RepoError>;
}

#[async_trait]
pub trait ContentWriteRepo: Send + Sync {
    /// Delete every post and user.
    async fn clear_content(&self) -> Result<(), RepoError>;

    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError>;

    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
