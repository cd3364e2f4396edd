//! Courseboard server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use courseboard_api::{AppState, router as api_router};
use courseboard_common::Config;
use courseboard_core::{NotificationService, TracingEventPublisher};
use courseboard_db::repositories::{
    EnrolmentRepository, NotificationRepository, UserPreferenceRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courseboard=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting courseboard server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = courseboard_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    courseboard_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories and the registry service
    let db = Arc::new(db);
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let enrolment_repo = EnrolmentRepository::new(Arc::clone(&db));
    let preference_repo = UserPreferenceRepository::new(Arc::clone(&db));

    let notification_service = NotificationService::new(
        notification_repo,
        enrolment_repo,
        preference_repo,
        Arc::new(TracingEventPublisher),
        config.server.lms_url.clone(),
        config.session.secret.clone(),
    );

    let state = AppState::new(notification_service);

    let app = Router::new()
        .nest("/api", api_router())
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
