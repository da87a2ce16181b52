//! Wordclash API server entry point.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use wordclash_api::broadcast::ChannelBroadcaster;
use wordclash_api::config::ApiConfig;
use wordclash_api::error::AppError;
use wordclash_api::state::AppState;
use wordclash_core::clock::SystemClock;
use wordclash_core::rng::SystemRng;
use wordclash_dictionary::http_validator::HttpDictionaryValidator;
use wordclash_session::domain::aggregates::Session;
use wordclash_store::memory_session_repository::InMemorySessionRepository;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Wordclash API server");

    let config = ApiConfig::from_env()?;
    tracing::info!(
        variant = ?config.settings.variant(),
        players = ?config.settings.allowed_names(),
        dictionary = %config.dictionary_url,
        "configuration loaded"
    );

    let validator = HttpDictionaryValidator::new(
        config.dictionary_url.clone(),
        config.dictionary_timeout,
    )?;

    // Build application state.
    let app_state = AppState::new(
        config.settings.clone(),
        Arc::new(SystemClock),
        Arc::new(Mutex::new(SystemRng::from_os_entropy())),
        Arc::new(InMemorySessionRepository::<Session>::new()),
        Arc::new(validator),
        ChannelBroadcaster::default(),
    );

    // TODO: Replace CorsLayer::permissive() with the deployed client origin.
    let app = wordclash_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
