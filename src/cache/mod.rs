//! Client-side fetch caches.
//!
//! - [`FetchCache`]: generic single-flight map from key to [`Computation`].
//! - [`UserSessionCache`]: the one random profile on the home screen.
//! - [`PostCache`]: post details by id and the full post list.

pub mod fetch;
pub(crate) mod lock;
pub mod posts;
pub mod session;

pub use fetch::{Computation, FetchCache, FetchState};
pub use posts::{PostCache, PostComputation, PostKey, PostListComputation, PostSource};
pub use session::{UserComputation, UserSessionCache, UserSource};
