//! Relational store ports for provisioning records.
//!
//! Inserts never overwrite: a duplicate natural key surfaces as
//! [`StoreError::Duplicate`], whether it is caught by the in-memory write
//! lock or by the database's unique constraint. That constraint — not the
//! provisioners' fast-path existence check — is the authoritative
//! duplicate-rejection mechanism.

mod in_memory;
mod postgres;

pub use in_memory::{InMemoryProductStore, InMemoryQrCodeStore};
pub use postgres::{PostgresProductStore, PostgresQrCodeStore};

use async_trait::async_trait;
use thiserror::Error;

use labelforge_core::{Product, QrCode};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The natural key is already present.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// The backing store failed.
    #[error("database error: {0}")]
    Backend(String),

    /// The operation did not finish within its deadline.
    #[error("database operation timed out")]
    Timeout,
}

/// Persistence port for barcode-provisioned products, keyed by GTIN.
#[async_trait]
pub trait ProductStore: Send + Sync + 'static {
    async fn insert(&self, product: &Product) -> Result<(), StoreError>;

    async fn find_by_gtin(&self, gtin: &str) -> Result<Option<Product>, StoreError>;

    async fn exists(&self, gtin: &str) -> Result<bool, StoreError>;
}

/// Persistence port for QR-provisioned records, keyed by name.
#[async_trait]
pub trait QrCodeStore: Send + Sync + 'static {
    async fn insert(&self, qr: &QrCode) -> Result<(), StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<QrCode>, StoreError>;

    async fn exists(&self, name: &str) -> Result<bool, StoreError>;
}
