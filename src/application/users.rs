//! Random profile lookup.

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::application::repos::{RepoError, UsersRepo};
use crate::domain::entities::{PostHeadline, UserWithPosts};
use crate::domain::posts::preview_content;

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error("no users found")]
    NoUsers,
    #[error("user at offset {offset} not found")]
    UserNotFound { offset: u64 },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Chooses which row the random-user lookup lands on.
pub trait OffsetPicker: Send + Sync {
    /// Return an offset in `0..count`. `count` is never zero.
    fn pick(&self, count: u64) -> u64;
}

/// Uniform choice over the current row count.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformOffsetPicker;

impl OffsetPicker for UniformOffsetPicker {
    fn pick(&self, count: u64) -> u64 {
        rand::thread_rng().gen_range(0..count)
    }
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UsersRepo>,
    picker: Arc<dyn OffsetPicker>,
}

impl UserService {
    pub fn new(users: Arc<dyn UsersRepo>) -> Self {
        Self::with_picker(users, Arc::new(UniformOffsetPicker))
    }

    pub fn with_picker(users: Arc<dyn UsersRepo>, picker: Arc<dyn OffsetPicker>) -> Self {
        Self { users, picker }
    }

    /// Load a random user and their posts with previews cut to size.
    pub async fn random_user(&self) -> Result<UserWithPosts, UserServiceError> {
        let count = self.users.count_users().await?;
        if count == 0 {
            return Err(UserServiceError::NoUsers);
        }

        let offset = self.picker.pick(count);
        debug!(
            target = "folio::application::users",
            count, offset, "picked random user offset"
        );

        let user = self
            .users
            .find_user_at_offset(offset)
            .await?
            .ok_or(UserServiceError::UserNotFound { offset })?;

        let posts = self
            .users
            .list_post_headlines(user.id)
            .await?
            .into_iter()
            .map(|post| PostHeadline {
                content: preview_content(&post.content),
                ..post
            })
            .collect();

        Ok(UserWithPosts { user, posts })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::*;
    use crate::domain::entities::UserRecord;

    struct FixedPicker(u64);

    impl OffsetPicker for FixedPicker {
        fn pick(&self, _count: u64) -> u64 {
            self.0
        }
    }

    #[derive(Default)]
    struct MemoryUsers {
        users: Vec<UserRecord>,
        posts: Vec<(i64, PostHeadline)>,
        requested_offsets: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl UsersRepo for MemoryUsers {
        async fn count_users(&self) -> Result<u64, RepoError> {
            Ok(self.users.len() as u64)
        }

        async fn find_user_at_offset(&self, offset: u64) -> Result<Option<UserRecord>, RepoError> {
            self.requested_offsets
                .lock()
                .expect("offset log")
                .push(offset);
            Ok(self.users.get(offset as usize).cloned())
        }

        async fn list_post_headlines(
            &self,
            author_id: i64,
        ) -> Result<Vec<PostHeadline>, RepoError> {
            Ok(self
                .posts
                .iter()
                .filter(|(author, _)| *author == author_id)
                .map(|(_, post)| post.clone())
                .collect())
        }
    }

    fn user(id: i64) -> UserRecord {
        let now = OffsetDateTime::now_utc();
        UserRecord {
            id,
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            avatar: None,
            role: "Tech Lead".to_string(),
            bio: None,
            location: None,
            joined_date: now,
            website: None,
            github: None,
            twitter: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn empty_table_reports_no_users() {
        let service = UserService::new(Arc::new(MemoryUsers::default()));
        let err = service.random_user().await.expect_err("no users");
        assert!(matches!(err, UserServiceError::NoUsers));
    }

    #[tokio::test]
    async fn picks_offset_and_truncates_post_previews() {
        let repo = Arc::new(MemoryUsers {
            users: vec![user(1), user(2)],
            posts: vec![
                (
                    2,
                    PostHeadline {
                        id: 10,
                        title: "Mastering Docker".to_string(),
                        content: "x".repeat(300),
                    },
                ),
                (
                    1,
                    PostHeadline {
                        id: 11,
                        title: "Other".to_string(),
                        content: "ignored".to_string(),
                    },
                ),
            ],
            ..Default::default()
        });
        let service = UserService::with_picker(repo.clone(), Arc::new(FixedPicker(1)));

        let result = service.random_user().await.expect("user found");
        assert_eq!(result.user.id, 2);
        assert_eq!(result.posts.len(), 1);
        assert_eq!(result.posts[0].content.chars().count(), 203);
        assert!(result.posts[0].content.ends_with("..."));
        assert_eq!(
            *repo.requested_offsets.lock().expect("offset log"),
            vec![1]
        );
    }

    #[tokio::test]
    async fn vanished_row_is_reported_as_not_found() {
        let repo = Arc::new(MemoryUsers {
            users: vec![user(1)],
            ..Default::default()
        });
        let service = UserService::with_picker(repo, Arc::new(FixedPicker(5)));
        let err = service.random_user().await.expect_err("offset past end");
        assert!(matches!(err, UserServiceError::UserNotFound { offset: 5 }));
    }

    #[test]
    fn uniform_picker_stays_in_range() {
        let picker = UniformOffsetPicker;
        for _ in 0..200 {
            assert!(picker.pick(3) < 3);
        }
        assert_eq!(picker.pick(1), 0);
    }
}
