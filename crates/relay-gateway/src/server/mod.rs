//! Gateway server setup
//!
//! Router, store selection, and the serve loop.

mod handler;
mod state;

pub use handler::ws_handler;
pub use state::GatewayState;

use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use relay_common::{AppConfig, AppError, CorsConfig, StoreBackend, StoreConfig};
use relay_core::{MessageStore, SnowflakeGenerator};
use relay_db::{create_pool, ensure_schema, InMemoryMessageStore, PgMessageStore, PoolConfig};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState, cors: &CorsConfig) -> Router {
    create_router()
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// An empty allow-list permits any origin
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Construct the configured message store
pub async fn build_store(config: &StoreConfig) -> Result<Arc<dyn MessageStore>, AppError> {
    let ids = Arc::new(SnowflakeGenerator::new(config.worker_id));

    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory message store");
            Ok(Arc::new(InMemoryMessageStore::new(ids)))
        }
        StoreBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .ok_or_else(|| AppError::Config("DATABASE_URL is required for the postgres store".to_string()))?;

            tracing::info!("Connecting to PostgreSQL...");
            let pool = create_pool(&PoolConfig::from(database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            ensure_schema(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            tracing::info!("PostgreSQL connection established");

            Ok(Arc::new(PgMessageStore::new(pool, ids)))
        }
    }
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: &AppConfig) -> Result<GatewayState, AppError> {
    let store = build_store(&config.store).await?;
    Ok(GatewayState::new(store, config.chat.clone()))
}

/// Serve `app` on `listener` until Ctrl-C or SIGTERM
pub async fn run_server(listener: TcpListener, app: Router) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Gateway listening on ws://{}/ws", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    tracing::info!("Gateway stopped");
    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.gateway.address();

    let state = create_gateway_state(&config).await?;
    let app = create_app(state, &config.cors);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })?;

    run_server(listener, app).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
