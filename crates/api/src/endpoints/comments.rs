//! Comment endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use validator::Validate;
use zine_common::AppResult;
use zine_core::CreateCommentInput;
use zine_db::entities::comment;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, PagedResponse},
};

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_username: Option<String>,
    pub text: String,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            post_id: c.post_id,
            user_id: c.user_id,
            author_username: None,
            text: c.text,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Create comment request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub post_id: String,

    #[validate(length(min = 1, max = 3000))]
    pub text: String,
}

/// Add a comment to a post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    req.validate()?;

    let comment = state
        .comment_service
        .create(&user, &req.post_id, CreateCommentInput { text: req.text })
        .await?;

    Ok(ApiResponse::ok(comment.into()))
}

/// List comments request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub post_id: String,
    pub page: Option<u64>,
}

/// Comments on a post, newest first.
async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<PagedResponse<CommentResponse>>> {
    let page = state
        .comment_service
        .list_for_post(&req.post_id, req.page)
        .await?;

    Ok(ApiResponse::ok(PagedResponse::from_page(page, |c| {
        let mut resp: CommentResponse = c.comment.into();
        resp.author_username = Some(c.author.username);
        resp
    })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/list", post(list))
}
