//! Ovation server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use ovation_api::{middleware::AppState, router as api_router};
use ovation_common::Config;
use ovation_core::{
    EntryService, ParticipantResolver, RankingService, RoundService, VoteService,
};
use ovation_db::repositories::{
    CategoryRepository, EntryRepository, RoundRepository, VoteRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
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
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ovation=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting ovation server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = ovation_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    ovation_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let round_repo = RoundRepository::new(Arc::clone(&db));
    let entry_repo = EntryRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));

    // Initialize services
    let ranking = RankingService::new(round_repo.clone(), entry_repo.clone(), vote_repo.clone());
    let resolver = ParticipantResolver::new(entry_repo.clone(), round_repo.clone());
    let vote_service = VoteService::new(
        round_repo.clone(),
        entry_repo.clone(),
        vote_repo,
        ranking.clone(),
    );
    let round_service = RoundService::new(round_repo, resolver, ranking);
    let entry_service = EntryService::new(entry_repo, category_repo);

    if config.voting.editor_token.is_empty() {
        warn!("voting.editor_token is empty; editor endpoints will reject every request");
    }

    // Create app state
    let state = AppState {
        vote_service,
        round_service,
        entry_service,
        editor_token: config.voting.editor_token.clone(),
    };

    // Build router
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
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
