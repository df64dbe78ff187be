//! Zine server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zine_api::{middleware::AppState, router as api_router};
use zine_common::{
    Config,
    storage::LocalStorage,
};
use zine_core::{
    CommentService, FollowService, GroupService, MediaService, PostService, UserService,
};
use zine_db::repositories::{
    CommentRepository, FollowRepository, GroupRepository, MediaFileRepository, PostRepository,
    UserRepository,
};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zine=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting zine server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = zine_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    zine_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let media_repo = MediaFileRepository::new(Arc::clone(&db));

    // Initialize local media storage
    let storage = Arc::new(LocalStorage::new(
        std::path::PathBuf::from(&config.media.directory),
        config.media.base_url.clone(),
    ));

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let post_service = PostService::new(
        post_repo.clone(),
        user_repo.clone(),
        group_repo.clone(),
        media_repo.clone(),
        follow_repo.clone(),
    );
    let comment_service = CommentService::new(comment_repo, post_repo, user_repo.clone());
    let group_service = GroupService::new(group_repo);
    let follow_service = FollowService::new(follow_repo, user_repo);
    let media_service = MediaService::new(media_repo, storage, config.media.max_upload_bytes);

    // Create app state
    let state = AppState {
        user_service,
        post_service,
        comment_service,
        group_service,
        follow_service,
        media_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .nest_service(
            config.media.base_url.as_str(),
            ServeDir::new(&config.media.directory),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            zine_api::middleware::auth_middleware,
        ))
        .layer(RequestBodyLimitLayer::new(
            usize::try_from(config.media.max_upload_bytes)? + 64 * 1024,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
