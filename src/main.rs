//! Lead Tracker Backend
//!
//! REST backend for a small sales team: lead records on a key-value store and
//! time-windowed performance statistics.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod stats;
mod store;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::LeadRepository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<LeadRepository>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lead Tracker Backend");
    tracing::info!("Store backend: {:?}", config.store_backend);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize store and repository
    let store = db::open_store(&config).await?;
    let repo = Arc::new(LeadRepository::new(store));

    let leads = repo.list_all().await?;
    tracing::info!("Store holds {} leads", leads.len());

    let state = AppState { repo };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Leads
        .route("/leads", get(api::list_leads).post(api::create_lead))
        .route(
            "/leads/{id}",
            get(api::get_lead)
                .put(api::update_lead)
                .delete(api::delete_lead),
        )
        // Statistics
        .route("/stats", get(api::get_stats))
        .route("/catalog", get(api::get_catalog));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
