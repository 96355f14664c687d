//! Provisioning pipeline (application-level orchestration).
//!
//! Both provisioners run the same pipeline over their collaborator ports:
//!
//! ```text
//! validate input
//!   ↓
//! duplicate fast-path check (store)
//!   ↓
//! render artifact (rasterizer, on a blocking worker, awaited)
//!   ↓
//! upload artifact (blob store, with deadline)
//!   ↓
//! insert record (store, with deadline; unique constraint is authoritative)
//! ```
//!
//! The render step is awaited before success is reported — an earlier
//! revision detached it into an untracked background thread, which silently
//! swallowed failures and could report success for a product whose barcode
//! was never produced.
//!
//! The sequence is not atomic: a failure after upload leaves an orphaned
//! artifact with no record. That is accepted — at most one record per key on
//! success, a possibly-leaked artifact on failure. No step is retried.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::timeout;

use labelforge_core::{DomainError, Gtin13, Product, ProductDraft, QrCode};

use crate::blob::{BlobStore, StorageError};
use crate::rasterizer::{Rasterizer, RenderError, RenderedImage};
use crate::store::{ProductStore, QrCodeStore, StoreError};

/// Failure of a provisioning attempt.
///
/// `Domain` covers the user-fixable cases (validation, duplicate key); the
/// remaining variants identify which collaborator failed.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("artifact upload failed: {0}")]
    Storage(#[from] StorageError),

    #[error("record persistence failed: {0}")]
    Persistence(StoreError),
}

impl ProvisionError {
    /// Store failures during insert: a duplicate means the key lost a race
    /// against another provisioning call and is reported as a conflict.
    fn from_store(e: StoreError, what: &str) -> Self {
        match e {
            StoreError::Duplicate(key) => {
                DomainError::conflict(format!("{what} {key} already exists")).into()
            }
            other => ProvisionError::Persistence(other),
        }
    }
}

/// Deadlines for the blocking collaborator calls.
#[derive(Debug, Clone, Copy)]
pub struct Deadlines {
    pub render: Duration,
    pub upload: Duration,
    pub persist: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            render: Duration::from_secs(10),
            upload: Duration::from_secs(10),
            persist: Duration::from_secs(5),
        }
    }
}

/// Orchestrates barcode provisioning: GTIN derivation, duplicate rejection,
/// rendering, upload, and persistence.
pub struct BarcodeProvisioner<R, B, S> {
    rasterizer: Arc<R>,
    blobs: Arc<B>,
    store: Arc<S>,
    deadlines: Deadlines,
}

impl<R, B, S> BarcodeProvisioner<R, B, S>
where
    R: Rasterizer,
    B: BlobStore,
    S: ProductStore,
{
    pub fn new(rasterizer: Arc<R>, blobs: Arc<B>, store: Arc<S>) -> Self {
        Self {
            rasterizer,
            blobs,
            store,
            deadlines: Deadlines::default(),
        }
    }

    pub fn with_deadlines(mut self, deadlines: Deadlines) -> Self {
        self.deadlines = deadlines;
        self
    }

    /// Provision a product: derive its GTIN-13, render and upload the
    /// barcode, persist the record, and return it.
    ///
    /// Not idempotent by design — a second call for the same GTIN is
    /// rejected with a conflict rather than silently succeeding.
    pub async fn provision(
        &self,
        name: Option<String>,
        price: Option<f64>,
        gtin_input: Option<String>,
    ) -> Result<Product, ProvisionError> {
        let name = name.ok_or_else(|| DomainError::validation("Missing required fields"))?;
        let price = price.ok_or_else(|| DomainError::validation("Missing required fields"))?;
        let draft = ProductDraft::new(name, price)?;

        let gtin_input = gtin_input.ok_or_else(|| DomainError::validation("GTIN required"))?;
        let gtin = Gtin13::from_partial(&gtin_input)?;

        // Fast path only; the insert below is what actually rejects a racing
        // duplicate, via the store's unique constraint.
        if self
            .store
            .exists(gtin.as_str())
            .await
            .map_err(|e| ProvisionError::from_store(e, "product with GTIN"))?
        {
            return Err(DomainError::conflict(format!(
                "product with GTIN {gtin} already exists"
            ))
            .into());
        }

        let image = {
            let rasterizer = self.rasterizer.clone();
            let gtin = gtin.clone();
            render_blocking(self.deadlines.render, move || {
                rasterizer.linear_barcode(&gtin)
            })
            .await?
        };

        let key = format!("barcodes/{gtin}.png");
        let url = upload_with_deadline(
            self.blobs.as_ref(),
            self.deadlines.upload,
            &key,
            image,
        )
        .await?;

        let (name, price) = draft.into_parts();
        let product = Product {
            name,
            price,
            gtin,
            barcode_image_url: url,
        };

        match timeout(self.deadlines.persist, self.store.insert(&product)).await {
            Err(_) => return Err(ProvisionError::Persistence(StoreError::Timeout)),
            Ok(Err(e)) => return Err(ProvisionError::from_store(e, "product with GTIN")),
            Ok(Ok(())) => {}
        }

        tracing::info!(gtin = %product.gtin, "provisioned barcode");
        Ok(product)
    }
}

/// Orchestrates QR provisioning, keyed by product name.
pub struct QrProvisioner<R, B, S> {
    rasterizer: Arc<R>,
    blobs: Arc<B>,
    store: Arc<S>,
    deadlines: Deadlines,
}

impl<R, B, S> QrProvisioner<R, B, S>
where
    R: Rasterizer,
    B: BlobStore,
    S: QrCodeStore,
{
    pub fn new(rasterizer: Arc<R>, blobs: Arc<B>, store: Arc<S>) -> Self {
        Self {
            rasterizer,
            blobs,
            store,
            deadlines: Deadlines::default(),
        }
    }

    pub fn with_deadlines(mut self, deadlines: Deadlines) -> Self {
        self.deadlines = deadlines;
        self
    }

    /// Provision a QR record carrying a human-readable payload.
    ///
    /// The duplicate check keys on the name alone; two different products
    /// sharing a name are indistinguishable here. That is a product-level
    /// decision carried over from the existing dataset, not an oversight.
    pub async fn provision(
        &self,
        name: Option<String>,
        price: Option<f64>,
    ) -> Result<QrCode, ProvisionError> {
        let name = name.ok_or_else(|| DomainError::validation("Missing required fields"))?;
        let price = price.ok_or_else(|| DomainError::validation("Missing required fields"))?;
        let draft = ProductDraft::new(name, price)?;

        if self
            .store
            .exists(draft.name())
            .await
            .map_err(|e| ProvisionError::from_store(e, "QR code for"))?
        {
            return Err(DomainError::conflict(format!(
                "QR code for {} already exists",
                draft.name()
            ))
            .into());
        }

        let payload = format!("Product: {}, Price: {}", draft.name(), draft.price());
        let image = {
            let rasterizer = self.rasterizer.clone();
            render_blocking(self.deadlines.render, move || rasterizer.qr(&payload)).await?
        };

        let key = format!("qrcodes/{}.png", artifact_slug(draft.name()));
        let url = upload_with_deadline(
            self.blobs.as_ref(),
            self.deadlines.upload,
            &key,
            image,
        )
        .await?;

        let (name, price) = draft.into_parts();
        let qr = QrCode {
            name,
            price,
            qr_image_url: url,
        };

        match timeout(self.deadlines.persist, self.store.insert(&qr)).await {
            Err(_) => return Err(ProvisionError::Persistence(StoreError::Timeout)),
            Ok(Err(e)) => return Err(ProvisionError::from_store(e, "QR code for")),
            Ok(Ok(())) => {}
        }

        tracing::info!(name = %qr.name, "provisioned QR code");
        Ok(qr)
    }
}

/// Run a render closure on a blocking worker and await it under a deadline.
///
/// The worker is awaited, not detached: render failures fail the
/// provisioning call instead of vanishing into a background thread.
async fn render_blocking<F>(deadline: Duration, render: F) -> Result<RenderedImage, ProvisionError>
where
    F: FnOnce() -> Result<RenderedImage, RenderError> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(render);
    let image = match timeout(deadline, handle).await {
        Err(_) => return Err(RenderError::Timeout.into()),
        Ok(Err(join)) => {
            return Err(RenderError::Output(format!("render worker failed: {join}")).into());
        }
        Ok(Ok(Err(e))) => return Err(e.into()),
        Ok(Ok(Ok(image))) => image,
    };
    if image.bytes.is_empty() {
        return Err(RenderError::Empty.into());
    }
    Ok(image)
}

async fn upload_with_deadline<B: BlobStore + ?Sized>(
    blobs: &B,
    deadline: Duration,
    key: &str,
    image: RenderedImage,
) -> Result<String, ProvisionError> {
    match timeout(deadline, blobs.upload(key, image.bytes, image.content_type)).await {
        Err(_) => Err(StorageError::Timeout.into()),
        Ok(Err(e)) => Err(e.into()),
        Ok(Ok(url)) => Ok(url),
    }
}

/// Filesystem/URL-safe artifact key segment for a product name.
fn artifact_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut previous_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            previous_dash = false;
        } else if !previous_dash && !slug.is_empty() {
            slug.push('-');
            previous_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("unnamed");
    }
    slug
}
