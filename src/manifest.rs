//! Output manifest.
//!
//! A conversion run can record the relative paths of every output it
//! produced to a JSON file, for consumers that want the run's results
//! without re-walking the tree (the original use case is a static site
//! build reading the converted image list). The wire format is fixed:
//!
//! ```json
//! {
//!   "imagePaths": [
//!     "travel/3f2a...ce.webp",
//!     "b81d...04.webp"
//!   ]
//! }
//! ```
//!
//! Paths are relative to the conversion root and `/`-separated on all
//! platforms. They are sorted lexicographically before serialization, so
//! a manifest is a deterministic function of what the run produced. A
//! re-run over an already-converted tree writes an empty list.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default manifest location, relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "paths.json";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The set of output paths produced by one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "imagePaths")]
    pub image_paths: Vec<String>,
}

impl Manifest {
    /// Build a manifest from run records: sorted, duplicates removed.
    pub fn new(mut paths: Vec<String>) -> Self {
        paths.sort();
        paths.dedup();
        Self { image_paths: paths }
    }

    pub fn is_empty(&self) -> bool {
        self.image_paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.image_paths.len()
    }

    /// Write pretty-printed JSON to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a manifest previously written by [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_sorts_and_dedupes() {
        let m = Manifest::new(vec![
            "b/2.webp".into(),
            "a/1.webp".into(),
            "b/2.webp".into(),
        ]);
        assert_eq!(m.image_paths, vec!["a/1.webp", "b/2.webp"]);
    }

    #[test]
    fn serializes_with_camel_case_key() {
        let m = Manifest::new(vec!["x.webp".into()]);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"imagePaths":["x.webp"]}"#);
    }

    #[test]
    fn empty_manifest_serializes_empty_array() {
        let json = serde_json::to_string(&Manifest::default()).unwrap();
        assert_eq!(json, r#"{"imagePaths":[]}"#);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("paths.json");

        let m = Manifest::new(vec!["a/1.webp".into(), "2.webp".into()]);
        m.save(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded, m);
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn load_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Manifest::load(&tmp.path().join("gone.json")),
            Err(ManifestError::Io(_))
        ));
    }

    #[test]
    fn load_corrupt_json_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("paths.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Manifest::load(&path),
            Err(ManifestError::Json(_))
        ));
    }
}
