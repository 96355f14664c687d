use axum::Router;

pub mod barcodes;
pub mod qrcodes;
pub mod system;

/// Router for all provisioning/lookup endpoints.
///
/// Paths are flat, matching the original service's contract.
pub fn router() -> Router {
    Router::new().merge(barcodes::router()).merge(qrcodes::router())
}
