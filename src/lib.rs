//! # Webpress
//!
//! Content-addressed WebP conversion for photo directory trees. Webpress
//! walks a root directory, transcodes every JPEG/PNG it finds to lossy
//! WebP, and names each output by the SHA-256 hash of the source bytes:
//!
//! ```text
//! photos/travel/cat.jpg  →  photos/travel/3f2a…ce.webp
//! ```
//!
//! Hash-based naming buys two properties for free:
//!
//! - **Deduplication**: identical source bytes resolve to identical output
//!   paths, so duplicate photos cost one encode and one file.
//! - **Idempotent re-runs**: an output that already exists is skipped, so
//!   re-running over a converted tree performs zero encodes.
//!
//! A run can also record the relative paths of everything it produced to a
//! JSON manifest (`paths.json`) for downstream consumers.
//!
//! # Pipeline
//!
//! ```text
//! 1. Discover   root/      →  Vec<ImageEntry>     (sorted, filtered by extension)
//! 2. Convert    entries    →  <hash>.webp files   (parallel; hash → gate → encode)
//! 3. Manifest   records    →  paths.json          (sorted relative paths)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`walk`] | Stage 1: recursive discovery of convertible images |
//! | [`convert`] | Stage 2: parallel hash/gate/encode driver, dry-run planning |
//! | [`manifest`] | Stage 3: `{"imagePaths": [...]}` JSON read/write |
//! | [`hash`] | Streaming SHA-256 content hashing |
//! | [`imaging`] | Codec adapter: backend trait + pure-Rust WebP encoder |
//! | [`config`] | Optional `webpress.toml` loading and validation |
//! | [`output`] | CLI output formatting (pure format functions) |
//!
//! # Design Decisions
//!
//! ## Bounded Parallelism
//!
//! Conversion is CPU-bound on the encoder, so entries run through rayon's
//! worker pool (sized to the core count, constrainable via config). The
//! walker produces a flat list first rather than spawning per directory;
//! a tree with ten thousand siblings costs a longer list, not ten
//! thousand concurrent file handles.
//!
//! ## Pure-Rust Codecs
//!
//! Decoding uses the `image` crate, lossy WebP encoding the `webp` crate.
//! No ImageMagick, no system libraries to install; the binary is fully
//! self-contained.
//!
//! ## Deterministic Manifest
//!
//! Completion order under parallelism is nondeterministic, so the
//! manifest sorts its paths before serialization. Two runs over the same
//! tree write byte-identical manifests.

pub mod config;
pub mod convert;
pub mod hash;
pub mod imaging;
pub mod manifest;
pub mod output;
pub mod walk;
