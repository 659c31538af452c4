use axum::Json;
use axum::extract::{Path, State};
use folio_api_types::{PostResponse, UserWithPostsResponse};

use crate::domain::posts::parse_post_id;

use super::error::{ApiError, messages};
use super::models::{post_response, user_with_posts_response};
use super::state::ApiState;

pub async fn random_user(
    State(state): State<ApiState>,
) -> Result<Json<UserWithPostsResponse>, ApiError> {
    let user = state.users.random_user().await?;
    let body = user_with_posts_response(user).map_err(|err| {
        ApiError::internal("infra::http::api::users", messages::FETCH_USER_FAILED, &err)
    })?;
    Ok(Json(body))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let id = parse_post_id(&raw_id).map_err(|_| {
        ApiError::bad_request("infra::http::api::posts", messages::INVALID_POST_ID)
    })?;

    let post = state.posts.post_by_id(id).await?;
    let body = post_response(post).map_err(|err| {
        ApiError::internal("infra::http::api::posts", messages::FETCH_POST_FAILED, &err)
    })?;
    Ok(Json(body))
}

pub async fn list_posts(
    State(state): State<ApiState>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    const SOURCE: &str = "infra::http::api::posts::list";

    let posts = state
        .posts
        .all_posts()
        .await
        .map_err(|err| ApiError::internal(SOURCE, messages::FETCH_POSTS_FAILED, &err))?;

    let body = posts
        .into_iter()
        .map(post_response)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ApiError::internal(SOURCE, messages::FETCH_POSTS_FAILED, &err))?;
    Ok(Json(body))
}
