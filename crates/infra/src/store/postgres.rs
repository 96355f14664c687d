//! Postgres-backed store implementations.
//!
//! All access goes through parameterized queries against the shared bounded
//! pool; each call holds at most one connection for its duration. Unique
//! violations are translated to [`StoreError::Duplicate`] so the constraint
//! is the authoritative conflict signal even when two provisioning calls
//! race past the application-level existence check.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use labelforge_core::{Gtin13, Product, QrCode};

use super::{ProductStore, QrCodeStore, StoreError};

pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn insert(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO products (name, price, gtin, barcode_image_path) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.gtin.as_str())
        .bind(&product.barcode_image_url)
        .execute(&self.pool)
        .await
        .map_err(into_store_error)?;
        Ok(())
    }

    async fn find_by_gtin(&self, gtin: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            "SELECT name, price, gtin, barcode_image_path FROM products WHERE gtin = $1",
        )
        .bind(gtin)
        .fetch_optional(&self.pool)
        .await
        .map_err(into_store_error)?;

        row.map(|r| {
            let gtin: String = r.try_get("gtin").map_err(into_store_error)?;
            Ok(Product {
                name: r.try_get("name").map_err(into_store_error)?,
                price: r.try_get("price").map_err(into_store_error)?,
                gtin: gtin
                    .parse::<Gtin13>()
                    .map_err(|e| StoreError::Backend(format!("corrupt gtin in row: {e}")))?,
                barcode_image_url: r.try_get("barcode_image_path").map_err(into_store_error)?,
            })
        })
        .transpose()
    }

    async fn exists(&self, gtin: &str) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM products WHERE gtin = $1")
            .bind(gtin)
            .fetch_optional(&self.pool)
            .await
            .map_err(into_store_error)?;
        Ok(row.is_some())
    }
}

pub struct PostgresQrCodeStore {
    pool: PgPool,
}

impl PostgresQrCodeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QrCodeStore for PostgresQrCodeStore {
    async fn insert(&self, qr: &QrCode) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO qr_codes (name, price, qr_code_image_path) VALUES ($1, $2, $3)",
        )
        .bind(&qr.name)
        .bind(qr.price)
        .bind(&qr.qr_image_url)
        .execute(&self.pool)
        .await
        .map_err(into_store_error)?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<QrCode>, StoreError> {
        let row = sqlx::query(
            "SELECT name, price, qr_code_image_path FROM qr_codes WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(into_store_error)?;

        row.map(|r| {
            Ok(QrCode {
                name: r.try_get("name").map_err(into_store_error)?,
                price: r.try_get("price").map_err(into_store_error)?,
                qr_image_url: r.try_get("qr_code_image_path").map_err(into_store_error)?,
            })
        })
        .transpose()
    }

    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM qr_codes WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(into_store_error)?;
        Ok(row.is_some())
    }
}

fn into_store_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(db.message().to_string())
        }
        _ => StoreError::Backend(e.to_string()),
    }
}
