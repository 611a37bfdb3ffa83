//! Codec adapter: the seam between pipeline logic and pixel work.
//!
//! The module is split into:
//! - **Parameters**: data structures describing an encode ([`EncodeParams`], [`Quality`])
//! - **Backend**: the [`ImageBackend`] trait
//! - **RustBackend**: production decode + lossy WebP encode

pub mod backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{EncodeParams, Quality};
pub use rust_backend::RustBackend;
