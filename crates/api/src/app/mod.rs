//! HTTP API application wiring (axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: backend wiring (stores, blob store, provisioners)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::path::PathBuf;
use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Postgres connection string; unset runs the in-memory dev backend.
    pub database_url: Option<String>,
    /// Directory rendered artifacts are written to and served from.
    pub static_root: PathBuf,
    /// URL prefix under which artifacts resolve publicly.
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
            static_root: std::env::var("STATIC_ROOT")
                .unwrap_or_else(|_| "static".to_string())
                .into(),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "/static".to_string()),
        }
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(&config).await?);

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
        .nest_service("/static", ServeDir::new(&config.static_root)))
}
