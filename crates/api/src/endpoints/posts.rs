//! Post endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use validator::Validate;
use zine_common::AppResult;
use zine_core::{CreatePostInput, UpdatePostInput};
use zine_db::entities::post;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, PagedResponse},
};

use super::users::UserResponse;

/// Post response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    pub comments_count: i32,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<post::Model> for PostResponse {
    fn from(p: post::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            group_id: p.group_id,
            text: p.text,
            image_id: p.image_id,
            comments_count: p.comments_count,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Create post request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[validate(length(min = 1, max = 10000))]
    pub text: String,
    pub group_id: Option<String>,
    pub image_id: Option<String>,
}

/// Publish a new post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> AppResult<ApiResponse<PostResponse>> {
    req.validate()?;

    let post = state
        .post_service
        .create(
            &user,
            CreatePostInput {
                text: req.text,
                group_id: req.group_id,
                image_id: req.image_id,
            },
        )
        .await?;

    Ok(ApiResponse::ok(post.into()))
}

/// Update post request. Only fields present in the body change.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub post_id: String,
    #[serde(flatten)]
    pub changes: UpdatePostInput,
}

/// Edit an existing post (author only).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state
        .post_service
        .update(&user, &req.post_id, req.changes)
        .await?;

    Ok(ApiResponse::ok(post.into()))
}

/// Single post lookup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub post_id: String,
}

/// Post with its author.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub author: UserResponse,
}

/// Show a single post with its author.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<PostDetailResponse>> {
    let detail = state.post_service.get_with_author(&req.post_id).await?;

    Ok(ApiResponse::ok(PostDetailResponse {
        post: detail.post.into(),
        author: detail.author.into(),
    }))
}

/// Page request for timelines.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRequest {
    pub page: Option<u64>,
}

/// Site-wide timeline, newest first.
async fn timeline(
    State(state): State<AppState>,
    Json(req): Json<TimelineRequest>,
) -> AppResult<ApiResponse<PagedResponse<PostResponse>>> {
    let page = state.post_service.index(req.page).await?;
    Ok(ApiResponse::ok(PagedResponse::from_page(page, Into::into)))
}

/// Personalized feed: posts from followed authors.
async fn feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<TimelineRequest>,
) -> AppResult<ApiResponse<PagedResponse<PostResponse>>> {
    let page = state.post_service.feed(&user, req.page).await?;
    Ok(ApiResponse::ok(PagedResponse::from_page(page, Into::into)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/update", post(update))
        .route("/show", post(show))
        .route("/timeline", post(timeline))
        .route("/feed", post(feed))
}
