//! The conversion pipeline.
//!
//! Consumes the entry list produced by [`walk`](crate::walk) and drives
//! hash, gate, and encode for each file:
//!
//! ```text
//! entry → sha256(source) → <dir>/<hash>.webp exists?
//!           ├── yes: skip (idempotent re-run)
//!           ├── claimed by another worker this run: skip (in-run dedup)
//!           └── no:  encode via backend, record relative output path
//! ```
//!
//! ## Parallelism
//!
//! Entries are processed by rayon's worker pool (size configured at
//! startup, see [`config::effective_threads`](crate::config::effective_threads)),
//! not by unbounded per-directory fan-out. A mutex-guarded claim set
//! guarantees a given target path is encoded at most once per run even
//! when identical-content files are in flight simultaneously.
//!
//! ## Error policy
//!
//! Per-file failures (unreadable source, decode error, write error) are
//! reported as [`ConvertEvent::Failed`] and counted; they never abort
//! sibling files or the run. There are no fatal paths inside the pipeline
//! itself, so [`convert_tree`] returns a plain [`ConvertOutcome`].
//!
//! ## Progress reporting
//!
//! Each completed file emits one [`ConvertEvent`] through the optional
//! channel, drained by a printer thread in the CLI. Event order is
//! completion order; the manifest records in the returned outcome follow
//! discovery order instead and are sorted again at serialization.

use crate::hash;
use crate::imaging::{EncodeParams, ImageBackend, Quality};
use crate::walk::ImageEntry;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::Sender;

/// Progress event for one processed file.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertEvent {
    Converted {
        rel_source: String,
        rel_output: String,
        bytes: u64,
    },
    SkippedExisting {
        rel_source: String,
        rel_target: String,
    },
    SkippedDuplicate {
        rel_source: String,
        rel_target: String,
    },
    Failed {
        rel_source: String,
        message: String,
    },
}

/// Counters for a conversion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertStats {
    pub converted: u32,
    /// Target already existed on disk before this run.
    pub skipped: u32,
    /// Target claimed by another worker during this run.
    pub deduplicated: u32,
    pub failed: u32,
}

impl ConvertStats {
    pub fn total(&self) -> u32 {
        self.converted + self.skipped + self.deduplicated + self.failed
    }
}

impl fmt::Display for ConvertStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped == 0 && self.deduplicated == 0 && self.failed == 0 {
            write!(f, "{} converted", self.converted)
        } else {
            write!(f, "{} converted, {} skipped", self.converted, self.skipped)?;
            if self.deduplicated > 0 {
                write!(f, ", {} deduplicated", self.deduplicated)?;
            }
            if self.failed > 0 {
                write!(f, ", {} failed", self.failed)?;
            }
            write!(f, " ({} total)", self.total())
        }
    }
}

/// Result of a conversion run.
#[derive(Debug)]
pub struct ConvertOutcome {
    /// Relative paths of newly produced outputs, in discovery order.
    pub records: Vec<String>,
    pub stats: ConvertStats,
}

/// Convert every entry, emitting one event per file as it completes.
///
/// The sender is dropped before returning, so a printer thread draining
/// the receiver terminates once the run is done.
pub fn convert_tree(
    backend: &impl ImageBackend,
    entries: &[ImageEntry],
    quality: Quality,
    events: Option<Sender<ConvertEvent>>,
) -> ConvertOutcome {
    let claimed: Mutex<HashSet<PathBuf>> = Mutex::new(HashSet::new());

    let results: Vec<ConvertEvent> = entries
        .par_iter()
        .map(|entry| {
            let event = convert_entry(backend, entry, quality, &claimed);
            if let Some(tx) = &events {
                // A dropped receiver only loses progress lines
                let _ = tx.send(event.clone());
            }
            event
        })
        .collect();

    let mut stats = ConvertStats::default();
    let mut records = Vec::new();
    for event in results {
        match event {
            ConvertEvent::Converted { rel_output, .. } => {
                stats.converted += 1;
                records.push(rel_output);
            }
            ConvertEvent::SkippedExisting { .. } => stats.skipped += 1,
            ConvertEvent::SkippedDuplicate { .. } => stats.deduplicated += 1,
            ConvertEvent::Failed { .. } => stats.failed += 1,
        }
    }

    ConvertOutcome { records, stats }
}

fn convert_entry(
    backend: &impl ImageBackend,
    entry: &ImageEntry,
    quality: Quality,
    claimed: &Mutex<HashSet<PathBuf>>,
) -> ConvertEvent {
    let rel_source = entry.rel_source();

    let digest = match hash::hash_file(&entry.source) {
        Ok(d) => d,
        Err(e) => {
            return ConvertEvent::Failed {
                rel_source,
                message: e.to_string(),
            };
        }
    };

    let target = entry.target(&digest);
    let rel_target = entry.rel_target(&digest);

    if target.exists() {
        return ConvertEvent::SkippedExisting {
            rel_source,
            rel_target,
        };
    }

    // The existence check and the write are not atomic; the claim set
    // closes the window where two identical-content files both pass the
    // check before either writes.
    if !claimed.lock().unwrap().insert(target.clone()) {
        return ConvertEvent::SkippedDuplicate {
            rel_source,
            rel_target,
        };
    }

    match backend.encode_webp(&EncodeParams {
        source: entry.source.clone(),
        output: target,
        quality,
    }) {
        Ok(bytes) => ConvertEvent::Converted {
            rel_source,
            rel_output: rel_target,
            bytes,
        },
        Err(e) => ConvertEvent::Failed {
            rel_source,
            message: e.to_string(),
        },
    }
}

/// What a conversion run would do to one file, without encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanStatus {
    Convert { rel_target: String },
    AlreadyConverted { rel_target: String },
    DuplicateContent { rel_target: String },
    Unreadable { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanLine {
    pub rel_source: String,
    pub status: PlanStatus,
}

/// Dry run: hash and gate every entry without touching the codec.
///
/// Runs sequentially, so report order matches discovery order.
pub fn plan_tree(entries: &[ImageEntry]) -> Vec<PlanLine> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    entries
        .iter()
        .map(|entry| {
            let rel_source = entry.rel_source();
            let status = match hash::hash_file(&entry.source) {
                Err(e) => PlanStatus::Unreadable {
                    message: e.to_string(),
                },
                Ok(digest) => {
                    let target = entry.target(&digest);
                    let rel_target = entry.rel_target(&digest);
                    if target.exists() {
                        PlanStatus::AlreadyConverted { rel_target }
                    } else if !seen.insert(target) {
                        PlanStatus::DuplicateContent { rel_target }
                    } else {
                        PlanStatus::Convert { rel_target }
                    }
                }
            };
            PlanLine { rel_source, status }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::walk;
    use std::fs;
    use std::path::Path;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn entries(root: &Path) -> Vec<walk::ImageEntry> {
        walk::discover(root).unwrap().images
    }

    #[test]
    fn converts_distinct_files_and_records_paths() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"), b"content A");
        touch(&tmp.path().join("b.png"), b"content B");

        let backend = MockBackend::new();
        let outcome = convert_tree(&backend, &entries(tmp.path()), Quality::default(), None);

        assert_eq!(outcome.stats.converted, 2);
        assert_eq!(outcome.stats.skipped, 0);
        assert_eq!(outcome.stats.failed, 0);
        assert_eq!(outcome.records.len(), 2);
        for record in &outcome.records {
            // 64 hex chars + ".webp"
            assert_eq!(record.len(), 69);
            assert!(record.ends_with(".webp"));
            assert!(tmp.path().join(record).exists());
        }
    }

    #[test]
    fn identical_content_yields_one_output() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("first.jpg"), b"same bytes");
        touch(&tmp.path().join("second.jpg"), b"same bytes");

        let backend = MockBackend::new();
        let outcome = convert_tree(&backend, &entries(tmp.path()), Quality::default(), None);

        // The loser reports either skip form depending on whether the
        // winner's write had already landed when it checked
        assert_eq!(outcome.stats.converted, 1);
        assert_eq!(outcome.stats.deduplicated + outcome.stats.skipped, 1);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn identical_content_in_different_directories_converts_per_directory() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("one/cat.jpg"), b"same bytes");
        touch(&tmp.path().join("two/cat.jpg"), b"same bytes");

        let backend = MockBackend::new();
        let outcome = convert_tree(&backend, &entries(tmp.path()), Quality::default(), None);

        // Same hash, but the target lives beside its source
        assert_eq!(outcome.stats.converted, 2);
        assert_eq!(outcome.records.len(), 2);
        let stems: Vec<&str> = outcome
            .records
            .iter()
            .map(|r| r.rsplit('/').next().unwrap())
            .collect();
        assert_eq!(stems[0], stems[1]);
    }

    #[test]
    fn rerun_skips_everything_and_encodes_nothing() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"), b"content A");
        touch(&tmp.path().join("sub/b.png"), b"content B");

        let backend = MockBackend::new();
        let first = convert_tree(&backend, &entries(tmp.path()), Quality::default(), None);
        assert_eq!(first.stats.converted, 2);

        // Re-discover: produced .webp files are not candidates
        let second_entries = entries(tmp.path());
        assert_eq!(second_entries.len(), 2);

        let backend = MockBackend::new();
        let (tx, rx) = mpsc::channel();
        let second = convert_tree(&backend, &second_entries, Quality::default(), Some(tx));

        assert_eq!(second.stats.converted, 0);
        assert_eq!(second.stats.skipped, 2);
        assert!(second.records.is_empty());
        assert!(backend.get_operations().is_empty());

        let events: Vec<ConvertEvent> = rx.iter().collect();
        assert_eq!(events.len(), 2);
        assert!(
            events
                .iter()
                .all(|e| matches!(e, ConvertEvent::SkippedExisting { .. }))
        );
    }

    #[test]
    fn failed_file_does_not_block_siblings() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("good1.jpg"), b"one");
        touch(&tmp.path().join("broken.jpg"), b"two");
        touch(&tmp.path().join("sub/good2.png"), b"three");

        let backend = MockBackend::with_failures(vec![tmp.path().join("broken.jpg")]);
        let outcome = convert_tree(&backend, &entries(tmp.path()), Quality::default(), None);

        assert_eq!(outcome.stats.converted, 2);
        assert_eq!(outcome.stats.failed, 1);
        assert_eq!(outcome.records.len(), 2);
    }

    #[test]
    fn unreadable_source_reports_failure() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"), b"bytes");

        let mut list = entries(tmp.path());
        // Delete the file after discovery to force a hash failure
        fs::remove_file(tmp.path().join("a.jpg")).unwrap();
        list.truncate(1);

        let backend = MockBackend::new();
        let (tx, rx) = mpsc::channel();
        let outcome = convert_tree(&backend, &list, Quality::default(), Some(tx));

        assert_eq!(outcome.stats.failed, 1);
        let events: Vec<ConvertEvent> = rx.iter().collect();
        assert!(matches!(events[0], ConvertEvent::Failed { .. }));
    }

    #[test]
    fn events_carry_relative_paths_and_sizes() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("album/pic.jpg"), b"pixels");

        let backend = MockBackend::new();
        let (tx, rx) = mpsc::channel();
        convert_tree(&backend, &entries(tmp.path()), Quality::default(), Some(tx));

        let events: Vec<ConvertEvent> = rx.iter().collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            ConvertEvent::Converted {
                rel_source,
                rel_output,
                bytes,
            } => {
                assert_eq!(rel_source, "album/pic.jpg");
                assert!(rel_output.starts_with("album/"));
                assert!(rel_output.ends_with(".webp"));
                assert!(*bytes > 0);
            }
            other => panic!("expected Converted, got {other:?}"),
        }
    }

    #[test]
    fn quality_reaches_the_backend() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"), b"bytes");

        let backend = MockBackend::new();
        convert_tree(&backend, &entries(tmp.path()), Quality::new(42), None);

        assert_eq!(backend.get_operations()[0].quality, 42);
    }

    // =========================================================================
    // Dry-run planning
    // =========================================================================

    #[test]
    fn plan_reports_convert_and_skip() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("new.jpg"), b"new content");
        touch(&tmp.path().join("old.jpg"), b"old content");

        // Pre-convert old.jpg
        let digest = crate::hash::hash_file(&tmp.path().join("old.jpg")).unwrap();
        touch(&tmp.path().join(format!("{digest}.webp")), b"existing");

        let plan = plan_tree(&entries(tmp.path()));
        assert_eq!(plan.len(), 2);

        let new_line = plan.iter().find(|l| l.rel_source == "new.jpg").unwrap();
        assert!(matches!(new_line.status, PlanStatus::Convert { .. }));

        let old_line = plan.iter().find(|l| l.rel_source == "old.jpg").unwrap();
        assert!(matches!(old_line.status, PlanStatus::AlreadyConverted { .. }));
    }

    #[test]
    fn plan_marks_duplicate_content() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"), b"same");
        touch(&tmp.path().join("b.jpg"), b"same");

        let plan = plan_tree(&entries(tmp.path()));
        let statuses: Vec<&PlanStatus> = plan.iter().map(|l| &l.status).collect();
        assert!(matches!(statuses[0], PlanStatus::Convert { .. }));
        assert!(matches!(statuses[1], PlanStatus::DuplicateContent { .. }));
    }

    #[test]
    fn plan_marks_unreadable() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"), b"bytes");
        let list = entries(tmp.path());
        fs::remove_file(tmp.path().join("a.jpg")).unwrap();

        let plan = plan_tree(&list);
        assert!(matches!(plan[0].status, PlanStatus::Unreadable { .. }));
    }

    // =========================================================================
    // Stats display
    // =========================================================================

    #[test]
    fn stats_display_clean_run() {
        let stats = ConvertStats {
            converted: 3,
            ..Default::default()
        };
        assert_eq!(format!("{stats}"), "3 converted");
    }

    #[test]
    fn stats_display_with_skips() {
        let stats = ConvertStats {
            converted: 2,
            skipped: 5,
            ..Default::default()
        };
        assert_eq!(format!("{stats}"), "2 converted, 5 skipped (7 total)");
    }

    #[test]
    fn stats_display_with_everything() {
        let stats = ConvertStats {
            converted: 2,
            skipped: 1,
            deduplicated: 1,
            failed: 1,
        };
        assert_eq!(
            format!("{stats}"),
            "2 converted, 1 skipped, 1 deduplicated, 1 failed (5 total)"
        );
    }
}
