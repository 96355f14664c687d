//! Read path: exact-key lookups against the stores.
//!
//! No ranking, pagination, or fuzzy matching — a lookup either returns the
//! single matching record or nothing.

use std::sync::Arc;

use crate::store::{ProductStore, QrCodeStore, StoreError};
use labelforge_core::{Product, QrCode};

pub struct LookupService<P, Q> {
    products: Arc<P>,
    qr_codes: Arc<Q>,
}

impl<P, Q> LookupService<P, Q>
where
    P: ProductStore,
    Q: QrCodeStore,
{
    pub fn new(products: Arc<P>, qr_codes: Arc<Q>) -> Self {
        Self { products, qr_codes }
    }

    pub async fn find_by_gtin(&self, gtin: &str) -> Result<Option<Product>, StoreError> {
        self.products.find_by_gtin(gtin).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<QrCode>, StoreError> {
        self.qr_codes.find_by_name(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryProductStore, InMemoryQrCodeStore};
    use labelforge_core::Gtin13;

    fn service() -> LookupService<InMemoryProductStore, InMemoryQrCodeStore> {
        LookupService::new(
            Arc::new(InMemoryProductStore::new()),
            Arc::new(InMemoryQrCodeStore::new()),
        )
    }

    #[tokio::test]
    async fn unknown_keys_return_none() {
        let lookup = service();
        assert!(lookup.find_by_gtin("4006381333931").await.unwrap().is_none());
        assert!(lookup.find_by_name("Widget").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn provisioned_records_are_found_exactly() {
        let products = Arc::new(InMemoryProductStore::new());
        let qr_codes = Arc::new(InMemoryQrCodeStore::new());
        let product = Product {
            name: "Widget".to_string(),
            price: 9.99,
            gtin: Gtin13::from_partial("400638133393").unwrap(),
            barcode_image_url: "/static/barcodes/4006381333931.png".to_string(),
        };
        products.insert(&product).await.unwrap();

        let lookup = LookupService::new(products, qr_codes);
        let found = lookup.find_by_gtin("4006381333931").await.unwrap().unwrap();
        assert_eq!(found, product);

        // Exact match only: the payload without its check digit is a miss.
        assert!(lookup.find_by_gtin("400638133393").await.unwrap().is_none());
    }
}
