//! Thin JSON-over-HTTP client for the Folio API.

use folio_api_types::ErrorBody;
use reqwest::{Client, Response, StatusCode, Url, header};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Failure taxonomy surfaced to the UI.
///
/// `Clone` because one failed request is handed to every reader of the cached
/// computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {message}")]
    Network { message: String },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Validation { message: String },
    #[error("{message}")]
    Internal {
        message: String,
        details: Option<String>,
    },
    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after_secs: Option<u64>,
    },
    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Short label for error frames.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network { .. } => "network",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Validation { .. } => "validation",
            ApiError::Internal { .. } => "internal",
            ApiError::RateLimited { .. } => "rate_limited",
            ApiError::Decode { .. } => "decode",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::network(err.to_string())
    }
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base: Url,
}

impl HttpClient {
    /// `base` must end with `/` for relative paths to land beneath it.
    pub fn new(base: Url) -> Result<Self, ApiError> {
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("folio/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::network(format!("invalid request path `{path}`: {err}")))
    }

    /// `base` extended by `segments`, each escaped as exactly one path segment.
    ///
    /// `/`, `?`, `#` and `%` inside a segment are percent-encoded, so a segment
    /// can never leave the collection it names. `.`, `..` and empty segments
    /// are rejected.
    pub fn segment_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(segment) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(ApiError::Validation {
                message: format!("`{segment}` is not a valid path segment"),
            });
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::network(format!("API base `{}` cannot have a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        self.get_url(url).await
    }

    /// GET the resource named by `segments` below the base.
    pub async fn get_json_at<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.segment_url(segments)?;
        self.get_url(url).await
    }

    async fn get_url<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(target = "folio::client::http", url = %url, "GET");

        let resp = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        Self::handle(resp).await
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(error_from_status(status, &bytes, retry_after));
        }

        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode {
            message: err.to_string(),
        })
    }
}

fn error_from_status(status: StatusCode, body: &[u8], retry_after_secs: Option<u64>) -> ApiError {
    let parsed = serde_json::from_slice::<ErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .map(|body| body.error.clone())
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
    let details = parsed.and_then(|body| body.details);

    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound { message },
        StatusCode::BAD_REQUEST => ApiError::Validation { message },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited {
            message,
            retry_after_secs,
        },
        StatusCode::INTERNAL_SERVER_ERROR => ApiError::Internal { message, details },
        _ => ApiError::Network { message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_codes_to_taxonomy() {
        let body = br#"{"error":"Post with ID 9 not found"}"#;
        assert_eq!(
            error_from_status(StatusCode::NOT_FOUND, body, None),
            ApiError::NotFound {
                message: "Post with ID 9 not found".into()
            }
        );

        let body = br#"{"error":"Failed to fetch post","details":"disk I/O error"}"#;
        assert_eq!(
            error_from_status(StatusCode::INTERNAL_SERVER_ERROR, body, None),
            ApiError::Internal {
                message: "Failed to fetch post".into(),
                details: Some("disk I/O error".into()),
            }
        );
    }

    #[test]
    fn unparseable_error_body_falls_back_to_status_text() {
        let err = error_from_status(StatusCode::BAD_GATEWAY, b"<html>", None);
        assert_eq!(
            err,
            ApiError::Network {
                message: "HTTP error! status: 502".into()
            }
        );
        assert_eq!(err.kind(), "network");
    }

    fn client(base: &str) -> HttpClient {
        HttpClient::new(Url::parse(base).expect("valid base")).expect("http client")
    }

    #[test]
    fn segments_stay_inside_their_collection() {
        let http = client("http://localhost:3001/api/");

        for (id, expected) in [
            ("7", "/api/posts/7"),
            ("../users/random", "/api/posts/..%2Fusers%2Frandom"),
            ("7?x=1", "/api/posts/7%3Fx=1"),
            ("7#frag", "/api/posts/7%23frag"),
            ("7/extra", "/api/posts/7%2Fextra"),
        ] {
            let url = http.segment_url(&["posts", id]).expect("url");
            assert_eq!(url.path(), expected, "id {id:?}");
            assert_eq!(url.query(), None);
            assert_eq!(url.fragment(), None);
        }
    }

    #[test]
    fn dot_and_empty_segments_are_rejected() {
        let http = client("http://localhost:3001/api/");
        for id in ["", ".", ".."] {
            let err = http.segment_url(&["posts", id]).expect_err("rejected");
            assert_eq!(err.kind(), "validation");
        }
    }
}
