pub mod api;
mod middleware;

pub use api::rate_limit::ApiRateLimiter;
pub use api::{ApiState, build_api_router};
pub use middleware::RequestContext;

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, middleware as axum_middleware, routing::get};
use folio_api_types::HealthResponse;
use tower_http::cors::CorsLayer;

use crate::application::error::ErrorReport;
use crate::application::health::{DatabaseStatus, HealthReport};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::format_timestamp;
use middleware::{log_responses, set_request_context};

/// Full application router: `/api/*`, `/health`, JSON 404 fallback and CORS.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state.clone())
        .nest("/api", build_api_router(state))
        .fallback(route_not_found)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
        .layer(CorsLayer::permissive())
}

async fn health(State(state): State<ApiState>) -> Response {
    db_health_response(state.health.check().await)
}

fn db_health_response(report: HealthReport) -> Response {
    let timestamp = format_timestamp(report.checked_at).unwrap_or_default();

    match report.database {
        DatabaseStatus::Connected => Json(HealthResponse {
            status: "ok".to_string(),
            timestamp,
            database: "connected".to_string(),
            environment: Some(report.environment.to_string()),
            error: None,
        })
        .into_response(),
        DatabaseStatus::Disconnected { reason } => {
            let mut response = (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "error".to_string(),
                    timestamp,
                    database: "disconnected".to_string(),
                    environment: None,
                    error: Some(reason.clone()),
                }),
            )
                .into_response();
            ErrorReport::from_message(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                reason,
            )
            .attach(&mut response);
            response
        }
    }
}

async fn route_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    let path = uri
        .path_and_query()
        .map(|value| value.as_str())
        .unwrap_or_else(|| uri.path());
    ApiError::route_not_found(path)
}
