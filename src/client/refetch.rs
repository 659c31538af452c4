//! The "Fetch Random User" action.
//!
//! A refetch drops the session's current user request and advances a
//! generation counter. Views key their subtree on `(component, generation)`
//! so a new generation rebuilds the profile from scratch and reads a fresh
//! request from the cache. Whether a refetch is still running is read off
//! the request itself, never tracked separately.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use crate::cache::UserSessionCache;
use crate::cache::lock::mutex_lock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefetchState {
    Idle,
    Refreshing,
}

/// Monotonic refetch counter; `0` is the initial load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a rendered subtree; a changed key means tear down and rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub component: &'static str,
    pub generation: Generation,
}

pub struct RefetchCoordinator {
    session: Arc<UserSessionCache>,
    generation: Mutex<Generation>,
}

impl RefetchCoordinator {
    pub fn new(session: Arc<UserSessionCache>) -> Self {
        Self {
            session,
            generation: Mutex::new(Generation::default()),
        }
    }

    pub fn session(&self) -> &Arc<UserSessionCache> {
        &self.session
    }

    pub fn generation(&self) -> Generation {
        *self.lock()
    }

    pub fn state(&self) -> RefetchState {
        let generation = self.lock();
        self.state_for(*generation)
    }

    /// Start a refetch unless one is already running.
    ///
    /// Returns the new generation, or `None` while refreshing.
    pub fn request_refetch(&self) -> Option<Generation> {
        let mut generation = self.lock();
        if self.state_for(*generation) == RefetchState::Refreshing {
            debug!(
                target = "folio::client::refetch",
                generation = generation.get(),
                "refetch ignored while refreshing"
            );
            return None;
        }

        self.session.reset();
        *generation = generation.next();
        info!(
            target = "folio::client::refetch",
            generation = generation.get(),
            "refetch requested"
        );
        Some(*generation)
    }

    pub fn render_key(&self, component: &'static str) -> RenderKey {
        RenderKey {
            component,
            generation: self.generation(),
        }
    }

    fn state_for(&self, generation: Generation) -> RefetchState {
        if generation == Generation::default() {
            return RefetchState::Idle;
        }
        match self.session.current() {
            Some(computation) if !computation.is_pending() => RefetchState::Idle,
            _ => RefetchState::Refreshing,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Generation> {
        mutex_lock(&self.generation, "client::refetch", "generation")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use folio_api_types::{UserResponse, UserWithPostsResponse};
    use tokio::sync::Notify;

    use super::*;
    use crate::cache::UserSource;
    use crate::client::ApiError;

    struct GatedUsers {
        calls: AtomicUsize,
        gate: Notify,
    }

    #[async_trait]
    impl UserSource for GatedUsers {
        async fn random_user(&self) -> Result<UserWithPostsResponse, ApiError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as i64 + 1;
            self.gate.notified().await;
            Ok(user(n))
        }
    }

    fn user(id: i64) -> UserWithPostsResponse {
        UserWithPostsResponse {
            user: UserResponse {
                id,
                name: format!("User {id}"),
                email: format!("user{id}@example.com"),
                avatar: None,
                role: "Engineer".into(),
                bio: None,
                location: None,
                joined_date: "2024-01-01".into(),
                website: None,
                github: None,
                twitter: None,
                created_at: "2024-01-01T00:00:00.000Z".into(),
                updated_at: "2024-01-01T00:00:00.000Z".into(),
            },
            posts: Vec::new(),
        }
    }

    #[tokio::test]
    async fn refetch_bumps_generation_and_blocks_until_settled() {
        let source = Arc::new(GatedUsers {
            calls: AtomicUsize::new(0),
            gate: Notify::new(),
        });
        let session = Arc::new(UserSessionCache::new(source.clone()));
        let coordinator = RefetchCoordinator::new(Arc::clone(&session));

        let first = session.current_or_fetch();
        source.gate.notify_one();
        assert_eq!(first.clone().await.expect("user").user.id, 1);
        assert_eq!(coordinator.state(), RefetchState::Idle);

        let generation = coordinator.request_refetch().expect("idle");
        assert_eq!(generation.get(), 1);
        assert_eq!(coordinator.state(), RefetchState::Refreshing);
        assert!(coordinator.request_refetch().is_none());

        let second = session.current_or_fetch();
        assert!(!second.ptr_eq(&first));
        assert_eq!(coordinator.state(), RefetchState::Refreshing);

        source.gate.notify_one();
        assert_eq!(second.await.expect("user").user.id, 2);
        assert_eq!(coordinator.state(), RefetchState::Idle);
        assert_eq!(
            coordinator.render_key("profile"),
            RenderKey {
                component: "profile",
                generation
            }
        );
        assert_eq!(coordinator.request_refetch().map(Generation::get), Some(2));
    }
}
