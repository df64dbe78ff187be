//! API endpoints.

mod auth;
mod comments;
mod following;
mod groups;
mod media;
mod posts;
mod users;

use axum::Router;

use crate::middleware::AppState;

pub use users::UserResponse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/posts", posts::router())
        .nest("/posts/comments", comments::router())
        .nest("/users", users::router())
        .nest("/groups", groups::router())
        .nest("/following", following::router())
        .nest("/media", media::router())
}
