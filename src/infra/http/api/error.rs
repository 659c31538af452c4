use std::error::Error as StdError;

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use folio_api_types::ErrorBody;

use crate::application::error::ErrorReport;
use crate::application::posts::PostServiceError;
use crate::application::users::UserServiceError;

pub mod messages {
    pub const NO_USERS: &str = "No users found";
    pub const USER_NOT_FOUND: &str = "User not found";
    pub const FETCH_USER_FAILED: &str = "Failed to fetch user";
    pub const INVALID_POST_ID: &str = "Invalid post ID";
    pub const FETCH_POST_FAILED: &str = "Failed to fetch post";
    pub const FETCH_POSTS_FAILED: &str = "Failed to fetch posts";
    pub const ROUTE_NOT_FOUND: &str = "Route not found";
    pub const RATE_LIMITED: &str = "Too many requests from this IP, please try again later.";
}

/// JSON error response: `{"error": ..., "details": ...}` plus a diagnostic report.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
    report: ErrorReport,
}

impl ApiError {
    pub fn new(source: &'static str, status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let report = ErrorReport::from_message(source, status, message.clone());
        Self {
            status,
            body: ErrorBody::new(message),
            report,
        }
    }

    /// Server failure whose message is exposed to the caller as `details`.
    pub fn internal(source: &'static str, message: &'static str, error: &dyn StdError) -> Self {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        Self {
            status,
            body: ErrorBody::new(message).with_details(error.to_string()),
            report: ErrorReport::from_error(source, status, error),
        }
    }

    pub fn bad_request(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(source, StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(source, StatusCode::NOT_FOUND, message)
    }

    pub fn route_not_found(path: &str) -> Self {
        let mut error = Self::not_found("infra::http::fallback", messages::ROUTE_NOT_FOUND);
        error.body = error.body.with_path(path);
        error
    }

    pub fn rate_limited(retry_after: u64) -> Response {
        let mut response = Self::new(
            "infra::http::api::rate_limit",
            StatusCode::TOO_MANY_REQUESTS,
            messages::RATE_LIMITED,
        )
        .into_response();
        if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        self.report.attach(&mut response);
        response
    }
}

impl From<UserServiceError> for ApiError {
    fn from(error: UserServiceError) -> Self {
        const SOURCE: &str = "infra::http::api::users";
        match error {
            UserServiceError::NoUsers => ApiError::not_found(SOURCE, messages::NO_USERS),
            UserServiceError::UserNotFound { .. } => {
                ApiError::not_found(SOURCE, messages::USER_NOT_FOUND)
            }
            UserServiceError::Repo(err) => {
                ApiError::internal(SOURCE, messages::FETCH_USER_FAILED, &err)
            }
        }
    }
}

impl From<PostServiceError> for ApiError {
    fn from(error: PostServiceError) -> Self {
        const SOURCE: &str = "infra::http::api::posts";
        match error {
            not_found @ PostServiceError::NotFound { .. } => {
                ApiError::not_found(SOURCE, not_found.to_string())
            }
            PostServiceError::Repo(err) => {
                ApiError::internal(SOURCE, messages::FETCH_POST_FAILED, &err)
            }
        }
    }
}
