pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::executor::RemoteExecutor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<RemoteExecutor>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            executor: Arc::new(RemoteExecutor::new(
                config.executor_url.clone(),
                config.executor_timeout,
            )),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/lessons/parse", post(routes::lessons::parse))
        .route("/api/lessons/grade", post(routes::lessons::grade))
        .route("/api/grade", post(routes::grading::grade))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let state = AppState::new(&config);
    if !state.executor.is_configured() {
        tracing::warn!("EXECUTOR_URL not set, code submissions will fail to run");
    }

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
