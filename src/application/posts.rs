//! Post read model.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::PostWithAuthor;

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error("Post with ID {id} not found")]
    NotFound { id: i64 },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostsRepo>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostsRepo>) -> Self {
        Self { posts }
    }

    pub async fn post_by_id(&self, id: i64) -> Result<PostWithAuthor, PostServiceError> {
        self.posts
            .find_post_with_author(id)
            .await?
            .ok_or(PostServiceError::NotFound { id })
    }

    pub async fn all_posts(&self) -> Result<Vec<PostWithAuthor>, PostServiceError> {
        Ok(self.posts.list_posts_with_author().await?)
    }
}
