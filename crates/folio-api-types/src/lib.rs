//! Wire types for the Folio REST API.
//!
//! The server serializes these and the client deserializes them, so field
//! names follow the JSON contract (`camelCase`) rather than Rust conventions.

use serde::{Deserialize, Serialize};

pub const USERS_RANDOM_PATH: &str = "users/random";
pub const POSTS_PATH: &str = "posts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    /// Date portion only (`YYYY-MM-DD`).
    pub joined_date: String,
    pub website: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Post projection embedded in the random-user payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPreview {
    pub id: i64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithPostsResponse {
    pub user: UserResponse,
    pub posts: Vec<PostPreview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author_id: i64,
    /// Date portion only (`YYYY-MM-DD`).
    pub published_date: String,
    pub read_time: i64,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub author: String,
    pub author_avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of every non-2xx API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            path: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_response_uses_camel_case_fields() {
        let post = PostResponse {
            id: 7,
            title: "Mastering Rust".into(),
            excerpt: "short".into(),
            content: "long".into(),
            author_id: 2,
            published_date: "2024-05-01".into(),
            read_time: 5,
            tags: vec!["Rust".into(), "Tokio".into()],
            created_at: "2024-05-01T10:00:00.000Z".into(),
            updated_at: "2024-05-01T10:00:00.000Z".into(),
            author: "Ada Lovelace".into(),
            author_avatar: String::new(),
        };

        let value = serde_json::to_value(&post).expect("serialize post");
        assert_eq!(value["authorId"], 2);
        assert_eq!(value["publishedDate"], "2024-05-01");
        assert_eq!(value["readTime"], 5);
        assert_eq!(value["authorAvatar"], "");
        assert_eq!(value["tags"][1], "Tokio");
    }

    #[test]
    fn error_body_omits_empty_details() {
        let body = ErrorBody::new("Invalid post ID");
        let json = serde_json::to_string(&body).expect("serialize error");
        assert_eq!(json, r#"{"error":"Invalid post ID"}"#);
    }
}
