//! Provisioning records and their validated inputs.
//!
//! Records are append-only: created exactly once by a provisioner, never
//! updated or deleted. Price is carried as the JSON number the caller sent
//! (validated positive and finite), so lookups return exactly what was
//! stored.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::gtin::Gtin13;

/// A product provisioned with a linear barcode, keyed by its GTIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub gtin: Gtin13,
    pub barcode_image_url: String,
}

/// A product provisioned with a QR code, keyed by its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCode {
    pub name: String,
    pub price: f64,
    pub qr_image_url: String,
}

/// Validated `(name, price)` pair shared by both provisioning paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    name: String,
    price: f64,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(DomainError::validation("price must be a positive number"));
        }
        Ok(Self { name, price })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn into_parts(self) -> (String, f64) {
        (self.name, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_accepts_a_plain_name_and_positive_price() {
        let draft = ProductDraft::new("Widget", 9.99).unwrap();
        assert_eq!(draft.name(), "Widget");
        assert_eq!(draft.price(), 9.99);
    }

    #[test]
    fn draft_rejects_empty_name() {
        let err = ProductDraft::new("   ", 9.99).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn draft_rejects_non_positive_price() {
        assert!(ProductDraft::new("Widget", 0.0).is_err());
        assert!(ProductDraft::new("Widget", -1.5).is_err());
    }

    #[test]
    fn draft_rejects_non_finite_price() {
        assert!(ProductDraft::new("Widget", f64::NAN).is_err());
        assert!(ProductDraft::new("Widget", f64::INFINITY).is_err());
    }

    #[test]
    fn product_serializes_price_exactly() {
        let product = Product {
            name: "Widget".to_string(),
            price: 9.99,
            gtin: Gtin13::from_partial("400638133393").unwrap(),
            barcode_image_url: "/static/barcodes/4006381333931.png".to_string(),
        };
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], serde_json::json!(9.99));
        assert_eq!(value["gtin"], serde_json::json!("4006381333931"));
    }
}
