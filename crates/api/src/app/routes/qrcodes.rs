use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/generate_qrcode", post(generate_qrcode))
        .route("/get_qr", post(get_qr))
}

pub async fn generate_qrcode(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::GenerateQrRequest>,
) -> axum::response::Response {
    match services.provision_qr(body.name, body.price).await {
        Ok(qr) => (StatusCode::CREATED, Json(dto::qr_created_to_json(&qr))).into_response(),
        Err(e) => errors::provision_error_to_response(e),
    }
}

pub async fn get_qr(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::GetQrRequest>,
) -> axum::response::Response {
    let name = match body.name {
        Some(n) if !n.trim().is_empty() => n,
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "name is required",
            );
        }
    };

    match services.find_qr(&name).await {
        Ok(Some(qr)) => (StatusCode::OK, Json(dto::qr_to_json(&qr))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "QR code not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
