//! Single-slot cache for the profile shown on the home screen.

use std::sync::Arc;

use async_trait::async_trait;
use folio_api_types::UserWithPostsResponse;

use crate::client::ApiError;

use super::fetch::{Computation, FetchCache};

pub type UserComputation = Computation<UserWithPostsResponse, ApiError>;

/// Where the "random user with recent posts" payload comes from.
#[async_trait]
pub trait UserSource: Send + Sync + 'static {
    async fn random_user(&self) -> Result<UserWithPostsResponse, ApiError>;
}

/// Holds at most one random-user request at a time.
pub struct UserSessionCache {
    source: Arc<dyn UserSource>,
    slot: FetchCache<(), UserWithPostsResponse, ApiError>,
}

impl UserSessionCache {
    pub fn new(source: Arc<dyn UserSource>) -> Self {
        Self {
            source,
            slot: FetchCache::new("user_session"),
        }
    }

    /// The current request, issuing one if the slot is empty.
    pub fn current_or_fetch(&self) -> UserComputation {
        let source = Arc::clone(&self.source);
        self.slot
            .get((), move || async move { source.random_user().await })
    }

    /// The current request, if any, without issuing one.
    pub fn current(&self) -> Option<UserComputation> {
        self.slot.peek(&())
    }

    /// Forget the current request so the next read fetches a new user.
    pub fn reset(&self) -> bool {
        self.slot.invalidate(&())
    }
}
