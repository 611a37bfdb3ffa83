//! Codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between pipeline logic and pixel
//! work. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust and
//! statically linked. Tests use a recording mock so the pipeline can be
//! exercised without decoding a single pixel.

use super::params::EncodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for WebP transcoding backends.
///
/// `Sync` because the conversion pipeline shares one backend across its
/// worker pool.
pub trait ImageBackend: Sync {
    /// Transcode `params.source` to lossy WebP at `params.output`.
    ///
    /// Returns the encoded size in bytes.
    fn encode_webp(&self, params: &EncodeParams) -> Result<u64, BackendError>;
}
