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
        .route("/generate_barcode", post(generate_barcode))
        .route("/scan_barcode", post(scan_barcode))
}

pub async fn generate_barcode(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::GenerateBarcodeRequest>,
) -> axum::response::Response {
    match services
        .provision_barcode(body.name, body.price, body.gtin)
        .await
    {
        Ok(product) => (
            StatusCode::CREATED,
            Json(dto::barcode_created_to_json(&product)),
        )
            .into_response(),
        Err(e) => errors::provision_error_to_response(e),
    }
}

pub async fn scan_barcode(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ScanBarcodeRequest>,
) -> axum::response::Response {
    let gtin = match body.gtin {
        Some(g) if !g.trim().is_empty() => g,
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "GTIN is required",
            );
        }
    };

    match services.find_product(&gtin).await {
        Ok(Some(product)) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "Product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
