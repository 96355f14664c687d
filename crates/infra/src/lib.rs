//! Infrastructure layer: collaborator ports, their adapters, and the
//! provisioning/lookup orchestration built on top of them.
//!
//! The narrow interfaces live here as traits (`Rasterizer`, `BlobStore`,
//! `ProductStore`, `QrCodeStore`) with one production adapter and one
//! in-memory adapter each; the provisioners compose them without knowing
//! which side of that line they are on.

pub mod blob;
pub mod lookup;
pub mod provision;
pub mod rasterizer;
pub mod store;

pub use blob::{BlobStore, FsBlobStore, InMemoryBlobStore, StorageError};
pub use lookup::LookupService;
pub use provision::{BarcodeProvisioner, ProvisionError, QrProvisioner};
pub use rasterizer::{PngRasterizer, Rasterizer, RenderError, RenderedImage};
pub use store::{
    InMemoryProductStore, InMemoryQrCodeStore, PostgresProductStore, PostgresQrCodeStore,
    ProductStore, QrCodeStore, StoreError,
};
