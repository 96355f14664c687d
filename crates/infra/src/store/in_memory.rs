//! In-memory store implementations.
//!
//! Intended for dev mode and tests. Insert-if-absent runs under the write
//! lock, so the duplicate semantics match the database's unique constraint.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use labelforge_core::{Product, QrCode};

use super::{ProductStore, QrCodeStore, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<HashMap<String, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: &Product) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        let key = product.gtin.as_str().to_string();
        if rows.contains_key(&key) {
            return Err(StoreError::Duplicate(key));
        }
        rows.insert(key, product.clone());
        Ok(())
    }

    async fn find_by_gtin(&self, gtin: &str) -> Result<Option<Product>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(rows.get(gtin).cloned())
    }

    async fn exists(&self, gtin: &str) -> Result<bool, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(rows.contains_key(gtin))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryQrCodeStore {
    rows: RwLock<HashMap<String, QrCode>>,
}

impl InMemoryQrCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QrCodeStore for InMemoryQrCodeStore {
    async fn insert(&self, qr: &QrCode) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        if rows.contains_key(&qr.name) {
            return Err(StoreError::Duplicate(qr.name.clone()));
        }
        rows.insert(qr.name.clone(), qr.clone());
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<QrCode>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(rows.get(name).cloned())
    }

    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(rows.contains_key(name))
    }
}
