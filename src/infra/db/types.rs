use time::OffsetDateTime;

use crate::application::repos::RepoError;
use crate::domain::entities::{PostHeadline, PostRecord, PostWithAuthor, UserRecord};
use crate::domain::tags::decode_tags;

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) avatar: Option<String>,
    pub(crate) role: String,
    pub(crate) bio: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) joined_date: OffsetDateTime,
    pub(crate) website: Option<String>,
    pub(crate) github: Option<String>,
    pub(crate) twitter: Option<String>,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            avatar: row.avatar,
            role: row.role,
            bio: row.bio,
            location: row.location,
            joined_date: row.joined_date,
            website: row.website,
            github: row.github,
            twitter: row.twitter,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) excerpt: String,
    pub(crate) content: String,
    pub(crate) author_id: i64,
    pub(crate) published_date: OffsetDateTime,
    pub(crate) read_time: i64,
    pub(crate) tags: String,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl TryFrom<PostRow> for PostRecord {
    type Error = RepoError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            excerpt: row.excerpt,
            content: row.content,
            author_id: row.author_id,
            published_date: row.published_date,
            read_time: row.read_time,
            tags: decode_tags(&row.tags)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostWithAuthorRow {
    #[sqlx(flatten)]
    pub(crate) post: PostRow,
    pub(crate) author_name: String,
    pub(crate) author_avatar: Option<String>,
}

impl TryFrom<PostWithAuthorRow> for PostWithAuthor {
    type Error = RepoError;

    fn try_from(row: PostWithAuthorRow) -> Result<Self, Self::Error> {
        Ok(Self {
            post: PostRecord::try_from(row.post)?,
            author_name: row.author_name,
            author_avatar: row.author_avatar,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostHeadlineRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
}

impl From<PostHeadlineRow> for PostHeadline {
    fn from(row: PostHeadlineRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
        }
    }
}
