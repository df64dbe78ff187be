//! Group endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use validator::Validate;
use zine_common::{AppError, AppResult};
use zine_core::CreateGroupInput;
use zine_db::entities::group;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, PagedResponse},
};

use super::posts::PostResponse;

/// Group response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub created_at: String,
}

impl From<group::Model> for GroupResponse {
    fn from(g: group::Model) -> Self {
        Self {
            id: g.id,
            title: g.title,
            slug: g.slug,
            description: g.description,
            created_at: g.created_at.to_rfc3339(),
        }
    }
}

/// Create group request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 100))]
    pub slug: String,

    #[serde(default)]
    pub description: String,
}

/// Create a new group. Admin only.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> AppResult<ApiResponse<GroupResponse>> {
    if !user.is_admin {
        return Err(AppError::Forbidden(
            "Only administrators can create groups".to_string(),
        ));
    }

    req.validate()?;

    let group = state
        .group_service
        .create(CreateGroupInput {
            title: req.title,
            slug: req.slug,
            description: req.description,
        })
        .await?;

    Ok(ApiResponse::ok(group.into()))
}

/// Group lookup by slug.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub slug: String,
}

/// Show a group.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<GroupResponse>> {
    let group = state.group_service.get_by_slug(&req.slug).await?;
    Ok(ApiResponse::ok(group.into()))
}

/// List request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub page: Option<u64>,
}

/// All groups, alphabetical.
async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<PagedResponse<GroupResponse>>> {
    let page = state.group_service.list(req.page).await?;
    Ok(ApiResponse::ok(PagedResponse::from_page(page, Into::into)))
}

/// Group posts request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPostsRequest {
    pub slug: String,
    pub page: Option<u64>,
}

/// A group with one page of its posts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPostsResponse {
    pub group: GroupResponse,
    pub posts: PagedResponse<PostResponse>,
}

/// A group's posts, newest first, twelve per page.
async fn posts(
    State(state): State<AppState>,
    Json(req): Json<GroupPostsRequest>,
) -> AppResult<ApiResponse<GroupPostsResponse>> {
    let (group, page) = state.post_service.by_group(&req.slug, req.page).await?;

    Ok(ApiResponse::ok(GroupPostsResponse {
        group: group.into(),
        posts: PagedResponse::from_page(page, Into::into),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/show", post(show))
        .route("/list", post(list))
        .route("/posts", post(posts))
}
