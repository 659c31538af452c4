//! Per-post cache backing the post detail and post list screens.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use folio_api_types::PostResponse;

use crate::client::ApiError;

use super::fetch::{Computation, FetchCache};

pub type PostComputation = Computation<PostResponse, ApiError>;
pub type PostListComputation = Computation<Vec<PostResponse>, ApiError>;

/// Post identifier exactly as the route carries it (`"7"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostKey(String);

impl PostKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[async_trait]
pub trait PostSource: Send + Sync + 'static {
    async fn post_by_id(&self, id: &str) -> Result<PostResponse, ApiError>;

    async fn all_posts(&self) -> Result<Vec<PostResponse>, ApiError>;
}

/// One entry per post id, plus a single entry for the full post list.
///
/// Entries are never evicted on their own.
pub struct PostCache {
    source: Arc<dyn PostSource>,
    posts: FetchCache<PostKey, PostResponse, ApiError>,
    list: FetchCache<(), Vec<PostResponse>, ApiError>,
}

impl PostCache {
    pub fn new(source: Arc<dyn PostSource>) -> Self {
        Self {
            source,
            posts: FetchCache::new("posts"),
            list: FetchCache::new("post_list"),
        }
    }

    pub fn for_post(&self, id: impl Into<PostKey>) -> PostComputation {
        let key = id.into();
        let source = Arc::clone(&self.source);
        let id = key.as_str().to_string();
        self.posts
            .get(key, move || async move { source.post_by_id(&id).await })
    }

    pub fn all_posts(&self) -> PostListComputation {
        let source = Arc::clone(&self.source);
        self.list
            .get((), move || async move { source.all_posts().await })
    }

    pub fn invalidate(&self, id: impl Into<PostKey>) -> bool {
        self.posts.invalidate(&id.into())
    }

    /// Forget every cached post and the post list.
    pub fn invalidate_all(&self) -> usize {
        self.posts.invalidate_all() + self.list.invalidate_all()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl From<String> for PostKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}
