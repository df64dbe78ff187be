//! User profile endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use zine_common::AppResult;
use zine_db::entities::user;

use crate::{
    extractors::MaybeAuthUser,
    middleware::AppState,
    response::{ApiResponse, PagedResponse},
};

use super::posts::PostResponse;

/// Public user profile.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub is_admin: bool,
    pub posts_count: i32,
    pub followers_count: i32,
    pub following_count: i32,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            bio: u.bio,
            is_admin: u.is_admin,
            posts_count: u.posts_count,
            followers_count: u.followers_count,
            following_count: u.following_count,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Lookup request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub username: String,
}

/// Show a user's profile.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get_by_username(&req.username).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Profile page request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePostsRequest {
    pub username: String,
    pub page: Option<u64>,
}

/// Profile with one page of the owner's posts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub posts: PagedResponse<PostResponse>,
    /// Whether the requesting user follows this profile. Absent for
    /// anonymous requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<bool>,
}

/// A user's posts, newest first.
async fn posts(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ProfilePostsRequest>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let (owner, page) = state.post_service.by_user(&req.username, req.page).await?;

    let following = match viewer {
        Some(viewer) if viewer.id != owner.id => Some(
            state
                .follow_service
                .is_following(&viewer.id, &owner.id)
                .await?,
        ),
        _ => None,
    };

    Ok(ApiResponse::ok(ProfileResponse {
        user: owner.into(),
        posts: PagedResponse::from_page(page, Into::into),
        following,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/show", post(show))
        .route("/posts", post(posts))
}
