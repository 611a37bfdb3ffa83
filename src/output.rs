//! CLI output formatting.
//!
//! Each reporting surface has a `format_*` function (pure, returns
//! strings) and a `print_*` wrapper that writes to stdout or stderr.
//! Format functions have no I/O and no side effects, so tests assert on
//! exact lines.
//!
//! ## Convert
//!
//! One line per file, in completion order:
//!
//! ```text
//! travel/cat.jpg → travel/3f2a…ce.webp (48213 bytes)
//! skip existing: travel/9b1d…04.webp
//! skip duplicate: travel/cat-copy.jpg → travel/3f2a…ce.webp
//! failed: travel/broken.jpg: failed to decode ...
//! ```
//!
//! Failures go to stderr, everything else to stdout.
//!
//! ## Scan (dry run)
//!
//! ```text
//! travel/cat.jpg → travel/3f2a…ce.webp
//! travel/dog.jpg: already converted
//! 1 to convert, 1 already converted
//! ```

use crate::convert::{ConvertEvent, PlanLine, PlanStatus};

/// Format one conversion progress event as a display line.
pub fn format_convert_event(event: &ConvertEvent) -> String {
    match event {
        ConvertEvent::Converted {
            rel_source,
            rel_output,
            bytes,
        } => format!("{rel_source} \u{2192} {rel_output} ({bytes} bytes)"),
        ConvertEvent::SkippedExisting { rel_target, .. } => {
            format!("skip existing: {rel_target}")
        }
        ConvertEvent::SkippedDuplicate {
            rel_source,
            rel_target,
        } => format!("skip duplicate: {rel_source} \u{2192} {rel_target}"),
        ConvertEvent::Failed {
            rel_source,
            message,
        } => format!("failed: {rel_source}: {message}"),
    }
}

/// Print a conversion event: failures to stderr, the rest to stdout.
pub fn print_convert_event(event: &ConvertEvent) {
    let line = format_convert_event(event);
    match event {
        ConvertEvent::Failed { .. } => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}

/// Format a dry-run plan: one line per file plus a totals line.
pub fn format_scan_output(plan: &[PlanLine]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut to_convert = 0usize;
    let mut already = 0usize;
    let mut duplicates = 0usize;
    let mut unreadable = 0usize;

    for line in plan {
        match &line.status {
            PlanStatus::Convert { rel_target } => {
                to_convert += 1;
                lines.push(format!("{} \u{2192} {}", line.rel_source, rel_target));
            }
            PlanStatus::AlreadyConverted { .. } => {
                already += 1;
                lines.push(format!("{}: already converted", line.rel_source));
            }
            PlanStatus::DuplicateContent { rel_target } => {
                duplicates += 1;
                lines.push(format!(
                    "{}: duplicate content \u{2192} {}",
                    line.rel_source, rel_target
                ));
            }
            PlanStatus::Unreadable { message } => {
                unreadable += 1;
                lines.push(format!("{}: unreadable ({})", line.rel_source, message));
            }
        }
    }

    let mut summary = format!("{to_convert} to convert, {already} already converted");
    if duplicates > 0 {
        summary.push_str(&format!(", {duplicates} duplicates"));
    }
    if unreadable > 0 {
        summary.push_str(&format!(", {unreadable} unreadable"));
    }
    lines.push(summary);

    lines
}

/// Print dry-run output to stdout.
pub fn print_scan_output(plan: &[PlanLine]) {
    for line in format_scan_output(plan) {
        println!("{line}");
    }
}
