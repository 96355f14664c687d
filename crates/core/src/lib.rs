//! `labelforge-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** logic (no infrastructure concerns):
//! the GTIN-13 check-digit computation, the provisioning record types, and
//! the domain error model.

pub mod error;
pub mod gtin;
pub mod record;

pub use error::{DomainError, DomainResult};
pub use gtin::Gtin13;
pub use record::{Product, ProductDraft, QrCode};
