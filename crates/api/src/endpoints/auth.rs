//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use validator::Validate;
use zine_common::AppResult;
use zine_core::CreateUserInput;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

use super::users::UserResponse;

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub name: Option<String>,
}

/// Signup response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Create a new user account.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<ApiResponse<SignupResponse>> {
    req.validate()?;

    let user = state
        .user_service
        .create(CreateUserInput {
            username: req.username,
            password: req.password,
            name: req.name,
        })
        .await?;

    Ok(ApiResponse::ok(SignupResponse {
        id: user.id,
        username: user.username,
        token: user.token,
    }))
}

/// Signin request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Signin response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Sign in to an existing account.
async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> AppResult<ApiResponse<SigninResponse>> {
    let user = state
        .user_service
        .authenticate(&req.username, &req.password)
        .await?;

    Ok(ApiResponse::ok(SigninResponse {
        id: user.id,
        username: user.username,
        token: user.token,
    }))
}

/// Regenerate token response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateTokenResponse {
    pub token: String,
}

/// Regenerate the authentication token, invalidating the current one.
async fn regenerate_token(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<RegenerateTokenResponse>> {
    let new_token = state.user_service.regenerate_token(&user.id).await?;

    Ok(ApiResponse::ok(RegenerateTokenResponse { token: new_token }))
}

/// The authenticated user's own profile.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/i", post(me))
        .route("/i/regenerate-token", post(regenerate_token))
}
