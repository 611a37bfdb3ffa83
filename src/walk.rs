//! Source image discovery.
//!
//! Walks a photo tree and produces one [`ImageEntry`] per convertible file.
//! Discovery is separated from conversion so the converter can run over a
//! flat list with a bounded worker pool instead of fanning out per
//! directory, and so a dry run can report the plan without touching the
//! codec.
//!
//! ## Selection rules
//!
//! - Files matching the extension allow-list (`jpg`, `jpeg`, `png`,
//!   case-insensitive) become entries.
//! - Everything else is silently ignored. In particular, `.webp` files are
//!   not candidates, so previously produced outputs are never reprocessed.
//! - Entries are returned in sorted traversal order, which keeps runs
//!   deterministic.
//!
//! ## Error policy
//!
//! A missing or non-directory root is fatal. Errors on individual entries
//! (an unreadable subdirectory, a file deleted mid-walk) are collected as
//! diagnostics on the [`Discovery`] and do not abort the walk.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("root directory not found: {0}")]
    RootNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extensions eligible for conversion, compared case-insensitively.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// A single convertible source image found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// Full path to the source file.
    pub source: PathBuf,
    /// Directory containing the source. Hash-named outputs land here.
    pub dir: PathBuf,
    /// `dir` relative to the walk root. Empty for the root itself.
    pub rel_dir: PathBuf,
}

impl ImageEntry {
    /// Source path relative to the root, `/`-separated.
    pub fn rel_source(&self) -> String {
        slash_join(&self.rel_dir, &self.file_name())
    }

    /// Output path on disk for a given content hash.
    pub fn target(&self, hash: &str) -> PathBuf {
        self.dir.join(format!("{hash}.webp"))
    }

    /// Output path relative to the root, `/`-separated. This is the form
    /// recorded in the manifest.
    pub fn rel_target(&self, hash: &str) -> String {
        slash_join(&self.rel_dir, &format!("{hash}.webp"))
    }

    fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result of walking a photo tree.
#[derive(Debug)]
pub struct Discovery {
    /// Convertible images in sorted traversal order.
    pub images: Vec<ImageEntry>,
    /// Non-fatal errors encountered on individual entries.
    pub errors: Vec<walkdir::Error>,
}

/// Walk `root` and collect every convertible image beneath it.
pub fn discover(root: &Path) -> Result<Discovery, WalkError> {
    if !root.is_dir() {
        return Err(WalkError::RootNotFound(root.to_path_buf()));
    }

    let mut images = Vec::new();
    let mut errors = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_image(entry.path()) {
            continue;
        }
        let source = entry.path().to_path_buf();
        let dir = source.parent().unwrap_or(root).to_path_buf();
        let rel_dir = dir.strip_prefix(root).unwrap_or(&dir).to_path_buf();
        images.push(ImageEntry {
            source,
            dir,
            rel_dir,
        });
    }

    Ok(Discovery { images, errors })
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Join a relative directory and file name with `/` regardless of platform,
/// matching the path form consumers of the manifest expect.
fn slash_join(rel_dir: &Path, file_name: &str) -> String {
    let mut parts: Vec<String> = rel_dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.push(file_name.to_string());
    parts.join("/")
}
