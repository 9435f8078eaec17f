//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and use-case service wiring
//! - `routes/`: HTTP routes + handlers (one file per entity)
//! - `dto.rs`: request/response DTOs and the explicit mapping functions
//! - `errors.rs`: consistent error responses

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;

use crate::config::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config).await?);
    Ok(build_router(services, config.request_timeout))
}

/// Router over already wired services.
pub fn build_router(services: Arc<AppServices>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(errors::handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}
