//! HTTP API layer for zine.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: accounts, posts, comments, groups, following, media
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: request authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
