//! Content hashing.
//!
//! Output filenames are the SHA-256 digest of the source file's bytes, so
//! two files with identical content resolve to the same output path. The
//! digest is content-based rather than mtime-based, which makes re-runs
//! after `git checkout` (which resets modification times) still skip
//! already-converted files.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// SHA-256 hash of a file's contents, returned as a lowercase hex string.
///
/// Streams the file through the hasher instead of reading it into memory;
/// photo files are routinely tens of megabytes.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
