//! Request DTOs and JSON mapping helpers.
//!
//! Every field is optional at the wire level; presence is validated by the
//! provisioners so a missing field becomes a 400 envelope rather than a
//! framework rejection. Response field names match the original service's
//! contract (`barcode_image_path`, `qr_code_image_path`).

use serde::Deserialize;

use labelforge_core::{Product, QrCode};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct GenerateBarcodeRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub gtin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScanBarcodeRequest {
    pub gtin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQrRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct GetQrRequest {
    pub name: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn barcode_created_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "message": "Barcode generated and product stored successfully",
        "gtin": product.gtin.as_str(),
        "barcode_image_path": product.barcode_image_url,
    })
}

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "name": product.name,
        "price": product.price,
        "barcode_image_path": product.barcode_image_url,
    })
}

pub fn qr_created_to_json(qr: &QrCode) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "message": "QR code generated and stored successfully",
        "name": qr.name,
        "qr_code_image_path": qr.qr_image_url,
    })
}

pub fn qr_to_json(qr: &QrCode) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "name": qr.name,
        "price": qr.price,
        "qr_code_image_path": qr.qr_image_url,
    })
}
