//! Consistent error responses.
//!
//! The single place where provisioning/lookup failures become HTTP. User
//! error detail is echoed back; collaborator failure detail is logged here
//! and replaced with a generic message on the wire.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use labelforge_core::DomainError;
use labelforge_infra::{ProvisionError, StoreError};

pub fn provision_error_to_response(err: ProvisionError) -> axum::response::Response {
    match err {
        ProvisionError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ProvisionError::Domain(DomainError::Conflict(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "conflict", msg)
        }
        ProvisionError::Domain(DomainError::NotFound) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "not found")
        }
        ProvisionError::Render(e) => {
            tracing::error!("rendering failed: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "render_error",
                "image rendering failed",
            )
        }
        ProvisionError::Storage(e) => {
            tracing::error!("artifact upload failed: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "artifact upload failed",
            )
        }
        ProvisionError::Persistence(e) => {
            tracing::error!("record persistence failed: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Database error",
            )
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!("lookup failed: {err}");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "database_error",
        "Database error",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
