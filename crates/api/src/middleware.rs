//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use zine_core::{
    CommentService, FollowService, GroupService, MediaService, PostService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub group_service: GroupService,
    pub follow_service: FollowService,
    pub media_service: MediaService,
}

/// Authentication middleware.
///
/// Resolves a bearer token to a user and stashes the model in request
/// extensions; handlers decide whether authentication is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
