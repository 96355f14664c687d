//! Barcode/QR rasterization behind a narrow interface.
//!
//! The provisioners only see [`Rasterizer`]; the production adapter encodes
//! EAN-13 bars with `barcoders` and QR matrices with `qrcode`, then
//! rasterizes both to PNG through the `image` crate. Rendering is CPU-bound
//! and synchronous — callers run it on a blocking worker.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};
use qrcode::QrCode as QrMatrix;
use thiserror::Error;

use labelforge_core::Gtin13;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The payload could not be encoded into the symbology.
    #[error("encoding failed: {0}")]
    Encode(String),

    /// Image output could not be produced.
    #[error("image output failed: {0}")]
    Output(String),

    /// Rendering finished but produced no artifact.
    #[error("rendering produced no output")]
    Empty,

    /// The render worker did not finish within its deadline.
    #[error("rendering timed out")]
    Timeout,
}

/// A rendered artifact, ready for upload.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Rendering collaborator used by the provisioners.
pub trait Rasterizer: Send + Sync + 'static {
    /// Render a standard linear (EAN-13) barcode for the given GTIN.
    fn linear_barcode(&self, gtin: &Gtin13) -> Result<RenderedImage, RenderError>;

    /// Render a QR code carrying the given payload.
    fn qr(&self, payload: &str) -> Result<RenderedImage, RenderError>;
}

/// PNG rasterizer over `barcoders` + `qrcode`.
pub struct PngRasterizer {
    /// Bar height in pixels for linear barcodes.
    bar_height: u32,
    /// Width of one barcode module in pixels.
    module_width: u32,
    /// Side length of one QR module in pixels.
    qr_scale: u32,
    /// Quiet zone around either symbology, in modules.
    quiet_zone: u32,
}

impl Default for PngRasterizer {
    fn default() -> Self {
        Self {
            bar_height: 80,
            module_width: 2,
            qr_scale: 8,
            quiet_zone: 4,
        }
    }
}

impl PngRasterizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rasterizer for PngRasterizer {
    fn linear_barcode(&self, gtin: &Gtin13) -> Result<RenderedImage, RenderError> {
        // The EAN-13 encoder takes the 12 payload digits and derives the
        // check digit itself (the same GS1 computation the core performs).
        let ean = barcoders::sym::ean13::EAN13::new(gtin.payload().to_string())
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        let modules = ean.encode();
        if modules.is_empty() {
            return Err(RenderError::Empty);
        }

        let width = (modules.len() as u32 + 2 * self.quiet_zone) * self.module_width;
        let image = GrayImage::from_fn(width, self.bar_height, |x, _y| {
            let module = x / self.module_width;
            let bar = module
                .checked_sub(self.quiet_zone)
                .and_then(|m| modules.get(m as usize))
                .copied()
                .unwrap_or(0);
            if bar == 1 { Luma([0u8]) } else { Luma([255u8]) }
        });

        encode_png(&image)
    }

    fn qr(&self, payload: &str) -> Result<RenderedImage, RenderError> {
        let matrix =
            QrMatrix::new(payload.as_bytes()).map_err(|e| RenderError::Encode(e.to_string()))?;
        let side = matrix.width();
        let modules = matrix.to_colors();

        let pixels = (side as u32 + 2 * self.quiet_zone) * self.qr_scale;
        let image = GrayImage::from_fn(pixels, pixels, |x, y| {
            let col = (x / self.qr_scale).checked_sub(self.quiet_zone);
            let row = (y / self.qr_scale).checked_sub(self.quiet_zone);
            let dark = match (col, row) {
                (Some(c), Some(r)) if (c as usize) < side && (r as usize) < side => {
                    modules[(r as usize) * side + (c as usize)] == qrcode::Color::Dark
                }
                _ => false,
            };
            if dark { Luma([0u8]) } else { Luma([255u8]) }
        });

        encode_png(&image)
    }
}

fn encode_png(image: &GrayImage) -> Result<RenderedImage, RenderError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| RenderError::Output(e.to_string()))?;
    if bytes.is_empty() {
        return Err(RenderError::Empty);
    }
    Ok(RenderedImage {
        bytes,
        content_type: "image/png",
    })
}
