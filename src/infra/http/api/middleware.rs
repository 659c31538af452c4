use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use super::error::ApiError;
use super::rate_limit::RateDecision;
use super::state::ApiState;

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const RATE_LIMIT_LIMIT_HEADER: &str = "ratelimit-limit";
const RATE_LIMIT_REMAINING_HEADER: &str = "ratelimit-remaining";

pub async fn api_rate_limit(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.clone() else {
        return next.run(request).await;
    };

    let key = client_key(&request);
    match limiter.check(&key) {
        RateDecision::Limited { retry_after_secs } => {
            debug!(
                target = "folio::api::ratelimit",
                client = %key,
                retry_after_secs,
                "rate limit exceeded"
            );
            ApiError::rate_limited(retry_after_secs)
        }
        RateDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(RATE_LIMIT_LIMIT_HEADER, limiter.limit().into());
            headers.insert(RATE_LIMIT_REMAINING_HEADER, remaining.into());
            response
        }
    }
}

fn client_key(request: &Request<Body>) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    request
        .headers()
        .get(FORWARDED_FOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
