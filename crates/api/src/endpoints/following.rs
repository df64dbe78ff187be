//! Following endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use zine_common::AppResult;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, PagedResponse},
};

use super::users::UserResponse;

/// Follow request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub username: String,
}

/// Follow result response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub following: bool,
    pub changed: bool,
}

/// Follow a user. Following yourself or an existing followee is a no-op.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowResponse>> {
    let outcome = state.follow_service.follow(&user, &req.username).await?;

    Ok(ApiResponse::ok(FollowResponse {
        following: outcome.following,
        changed: outcome.changed,
    }))
}

/// Unfollow a user. Unfollowing a non-followee is a no-op.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowResponse>> {
    let outcome = state.follow_service.unfollow(&user, &req.username).await?;

    Ok(ApiResponse::ok(FollowResponse {
        following: outcome.following,
        changed: outcome.changed,
    }))
}

/// List followers/following request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub username: String,
    pub page: Option<u64>,
}

/// Users following the given user.
async fn followers(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<PagedResponse<UserResponse>>> {
    let page = state
        .follow_service
        .followers(&req.username, req.page)
        .await?;

    Ok(ApiResponse::ok(PagedResponse::from_page(page, Into::into)))
}

/// Users the given user follows.
async fn following(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<PagedResponse<UserResponse>>> {
    let page = state
        .follow_service
        .following(&req.username, req.page)
        .await?;

    Ok(ApiResponse::ok(PagedResponse::from_page(page, Into::into)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(follow))
        .route("/delete", post(unfollow))
        .route("/followers", post(followers))
        .route("/following", post(following))
}
