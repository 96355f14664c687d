//! Backend wiring: stores, blob store, rasterizer, provisioners, lookup.
//!
//! Two backends exist. `Persistent` (Postgres + filesystem blobs) is
//! selected when `DATABASE_URL` is set; otherwise the service runs
//! `InMemory` (dev/test) and keeps nothing across restarts.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use labelforge_core::{Product, QrCode};
use labelforge_infra::{
    BarcodeProvisioner, FsBlobStore, InMemoryBlobStore, InMemoryProductStore, InMemoryQrCodeStore,
    LookupService, PngRasterizer, PostgresProductStore, PostgresQrCodeStore, ProvisionError,
    QrProvisioner, StoreError,
};

use super::AppConfig;

/// Maximum concurrent connections to the relational store. The pool is the
/// only shared mutable resource in the process.
const MAX_DB_CONNECTIONS: u32 = 10;

const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub enum AppServices {
    InMemory {
        barcodes: BarcodeProvisioner<PngRasterizer, InMemoryBlobStore, InMemoryProductStore>,
        qr_codes: QrProvisioner<PngRasterizer, InMemoryBlobStore, InMemoryQrCodeStore>,
        lookup: LookupService<InMemoryProductStore, InMemoryQrCodeStore>,
    },
    Persistent {
        barcodes: BarcodeProvisioner<PngRasterizer, FsBlobStore, PostgresProductStore>,
        qr_codes: QrProvisioner<PngRasterizer, FsBlobStore, PostgresQrCodeStore>,
        lookup: LookupService<PostgresProductStore, PostgresQrCodeStore>,
    },
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.database_url {
        Some(url) => build_persistent_services(config, url).await,
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores (records are not durable)");
            Ok(build_in_memory_services(config))
        }
    }
}

fn build_in_memory_services(config: &AppConfig) -> AppServices {
    let rasterizer = Arc::new(PngRasterizer::new());
    let blobs = Arc::new(InMemoryBlobStore::new(config.public_base_url.clone()));
    let products = Arc::new(InMemoryProductStore::new());
    let qr_codes = Arc::new(InMemoryQrCodeStore::new());

    AppServices::InMemory {
        barcodes: BarcodeProvisioner::new(rasterizer.clone(), blobs.clone(), products.clone()),
        qr_codes: QrProvisioner::new(rasterizer, blobs, qr_codes.clone()),
        lookup: LookupService::new(products, qr_codes),
    }
}

async fn build_persistent_services(config: &AppConfig, url: &str) -> anyhow::Result<AppServices> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_DB_CONNECTIONS)
        .acquire_timeout(DB_ACQUIRE_TIMEOUT)
        .connect(url)
        .await
        .context("failed to connect to Postgres")?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("failed to apply migrations")?;

    let rasterizer = Arc::new(PngRasterizer::new());
    let blobs = Arc::new(
        FsBlobStore::new(&config.static_root, config.public_base_url.clone())
            .context("failed to create static root")?,
    );
    let products = Arc::new(PostgresProductStore::new(pool.clone()));
    let qr_codes = Arc::new(PostgresQrCodeStore::new(pool));

    Ok(AppServices::Persistent {
        barcodes: BarcodeProvisioner::new(rasterizer.clone(), blobs.clone(), products.clone()),
        qr_codes: QrProvisioner::new(rasterizer, blobs, qr_codes.clone()),
        lookup: LookupService::new(products, qr_codes),
    })
}

impl AppServices {
    pub async fn provision_barcode(
        &self,
        name: Option<String>,
        price: Option<f64>,
        gtin: Option<String>,
    ) -> Result<Product, ProvisionError> {
        match self {
            AppServices::InMemory { barcodes, .. } => barcodes.provision(name, price, gtin).await,
            AppServices::Persistent { barcodes, .. } => barcodes.provision(name, price, gtin).await,
        }
    }

    pub async fn provision_qr(
        &self,
        name: Option<String>,
        price: Option<f64>,
    ) -> Result<QrCode, ProvisionError> {
        match self {
            AppServices::InMemory { qr_codes, .. } => qr_codes.provision(name, price).await,
            AppServices::Persistent { qr_codes, .. } => qr_codes.provision(name, price).await,
        }
    }

    pub async fn find_product(&self, gtin: &str) -> Result<Option<Product>, StoreError> {
        match self {
            AppServices::InMemory { lookup, .. } => lookup.find_by_gtin(gtin).await,
            AppServices::Persistent { lookup, .. } => lookup.find_by_gtin(gtin).await,
        }
    }

    pub async fn find_qr(&self, name: &str) -> Result<Option<QrCode>, StoreError> {
        match self {
            AppServices::InMemory { lookup, .. } => lookup.find_by_name(name).await,
            AppServices::Persistent { lookup, .. } => lookup.find_by_name(name).await,
        }
    }
}
