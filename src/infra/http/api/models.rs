//! Domain → wire conversions for the JSON API.

use folio_api_types::{PostPreview, PostResponse, UserResponse, UserWithPostsResponse};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::domain::entities::{PostWithAuthor, UserRecord, UserWithPosts};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

pub type FormatResult<T> = Result<T, time::error::Format>;

/// Calendar date in UTC, `YYYY-MM-DD`.
pub fn format_date(value: OffsetDateTime) -> FormatResult<String> {
    value.to_offset(UtcOffset::UTC).format(DATE_FORMAT)
}

/// ISO-8601 UTC timestamp with millisecond precision.
pub fn format_timestamp(value: OffsetDateTime) -> FormatResult<String> {
    value.to_offset(UtcOffset::UTC).format(TIMESTAMP_FORMAT)
}

pub fn user_response(user: UserRecord) -> FormatResult<UserResponse> {
    Ok(UserResponse {
        joined_date: format_date(user.joined_date)?,
        created_at: format_timestamp(user.created_at)?,
        updated_at: format_timestamp(user.updated_at)?,
        id: user.id,
        name: user.name,
        email: user.email,
        avatar: user.avatar,
        role: user.role,
        bio: user.bio,
        location: user.location,
        website: user.website,
        github: user.github,
        twitter: user.twitter,
    })
}

pub fn user_with_posts_response(value: UserWithPosts) -> FormatResult<UserWithPostsResponse> {
    Ok(UserWithPostsResponse {
        user: user_response(value.user)?,
        posts: value
            .posts
            .into_iter()
            .map(|post| PostPreview {
                id: post.id,
                title: post.title,
                content: post.content,
            })
            .collect(),
    })
}

pub fn post_response(value: PostWithAuthor) -> FormatResult<PostResponse> {
    let PostWithAuthor {
        post,
        author_name,
        author_avatar,
    } = value;

    Ok(PostResponse {
        published_date: format_date(post.published_date)?,
        created_at: format_timestamp(post.created_at)?,
        updated_at: format_timestamp(post.updated_at)?,
        id: post.id,
        title: post.title,
        excerpt: post.excerpt,
        content: post.content,
        author_id: post.author_id,
        read_time: post.read_time,
        tags: post.tags,
        author: author_name,
        author_avatar: author_avatar.unwrap_or_default(),
    })
}
