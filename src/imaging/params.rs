//! Parameter types for codec operations.
//!
//! These structs describe *what* to encode, not *how*. They are the
//! interface between the conversion pipeline (which decides which files
//! need encoding) and the [`backend`](super::backend) (which does the
//! actual pixel work). The separation allows swapping backends (e.g. for
//! testing with a mock) without changing pipeline logic.

use std::path::PathBuf;

/// Quality setting for lossy WebP encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Full specification for one transcode: source, output path, quality.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub quality: Quality,
}
