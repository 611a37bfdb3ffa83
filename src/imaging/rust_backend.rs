//! Pure Rust codec backend.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate |
//! | Encode lossy WebP | `webp` crate (`Encoder::from_image`) |
//!
//! The `image` crate's own WebP encoder is lossless-only, so encoding goes
//! through the `webp` crate, which exposes libwebp's lossy path with a
//! quality factor.

use super::backend::{BackendError, ImageBackend};
use super::params::EncodeParams;
use image::{DynamicImage, ImageReader};

/// Production backend using the `image` and `webp` crates.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn encode_webp(&self, params: &EncodeParams) -> Result<u64, BackendError> {
        let img = ImageReader::open(&params.source)
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "failed to decode {}: {}",
                    params.source.display(),
                    e
                ))
            })?;

        // libwebp accepts RGB8/RGBA8 input only
        let img = DynamicImage::ImageRgba8(img.to_rgba8());
        let encoder = webp::Encoder::from_image(&img).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "webp encoder rejected {}: {}",
                params.source.display(),
                e
            ))
        })?;
        let encoded = encoder.encode(params.quality.value() as f32);

        std::fs::write(&params.output, &*encoded).map_err(BackendError::Io)?;
        Ok(encoded.len() as u64)
    }
}
