//! Endpoint wrappers used by the caches.

use std::time::Duration;

use async_trait::async_trait;
use folio_api_types::{POSTS_PATH, PostResponse, USERS_RANDOM_PATH, UserWithPostsResponse};

use crate::cache::{PostSource, UserSource};
use crate::config::{ClientSettings, LatencySettings};

use super::http::{ApiError, HttpClient};

/// Artificial delay applied before each request; zero when disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedLatency {
    delays: Option<LatencySettings>,
}

impl SimulatedLatency {
    pub fn disabled() -> Self {
        Self { delays: None }
    }

    pub fn enabled(delays: LatencySettings) -> Self {
        Self {
            delays: Some(delays),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        if settings.simulate_latency {
            Self::enabled(settings.latency)
        } else {
            Self::disabled()
        }
    }

    async fn wait(&self, pick: fn(&LatencySettings) -> Duration) {
        if let Some(delays) = self.delays.as_ref() {
            let delay = pick(delays);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserService {
    http: HttpClient,
    latency: SimulatedLatency,
}

impl UserService {
    pub fn new(http: HttpClient, latency: SimulatedLatency) -> Self {
        Self { http, latency }
    }

    /// `GET {api}/users/random`
    pub async fn random_user(&self) -> Result<UserWithPostsResponse, ApiError> {
        self.latency.wait(|delays| delays.random_user).await;
        self.http.get_json(USERS_RANDOM_PATH).await
    }
}

#[async_trait]
impl UserSource for UserService {
    async fn random_user(&self) -> Result<UserWithPostsResponse, ApiError> {
        UserService::random_user(self).await
    }
}

#[derive(Clone, Debug)]
pub struct PostService {
    http: HttpClient,
    latency: SimulatedLatency,
}

impl PostService {
    pub fn new(http: HttpClient, latency: SimulatedLatency) -> Self {
        Self { http, latency }
    }

    /// `GET {api}/posts/{id}`
    pub async fn post_by_id(&self, id: &str) -> Result<PostResponse, ApiError> {
        self.latency.wait(|delays| delays.post_by_id).await;
        self.http.get_json_at(&[POSTS_PATH, id]).await
    }

    /// `GET {api}/posts`
    pub async fn all_posts(&self) -> Result<Vec<PostResponse>, ApiError> {
        self.latency.wait(|delays| delays.all_posts).await;
        self.http.get_json(POSTS_PATH).await
    }
}

#[async_trait]
impl PostSource for PostService {
    async fn post_by_id(&self, id: &str) -> Result<PostResponse, ApiError> {
        PostService::post_by_id(self, id).await
    }

    async fn all_posts(&self) -> Result<Vec<PostResponse>, ApiError> {
        PostService::all_posts(self).await
    }
}
