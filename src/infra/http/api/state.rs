use std::sync::Arc;

use crate::application::health::HealthService;
use crate::application::posts::PostService;
use crate::application::users::UserService;

use super::rate_limit::ApiRateLimiter;

#[derive(Clone)]
pub struct ApiState {
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub health: Arc<HealthService>,
    /// Present only when the API is rate limited (production).
    pub rate_limiter: Option<Arc<ApiRateLimiter>>,
}
