//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: i64,
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
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author_id: i64,
    pub published_date: OffsetDateTime,
    pub read_time: i64,
    pub tags: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Post joined with the author columns the read API denormalizes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostWithAuthor {
    pub post: PostRecord,
    pub author_name: String,
    pub author_avatar: Option<String>,
}

/// Slim post projection listed under a user profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostHeadline {
    pub id: i64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithPosts {
    pub user: UserRecord,
    pub posts: Vec<PostHeadline>,
}
