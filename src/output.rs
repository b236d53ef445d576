//! CLI output formatting for `generate` and `status`.
//!
//! Output is **collection-centric**: each configured collection gets one
//! header line with its name, followed by indented context. Paths and digests
//! are secondary and always indented.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! Books (books)
//!     4 items, avg 7.7/10
//! Restaurants (restaurants)
//!     Database not available
//!
//! Total: 4 items across 1 of 2 collections, avg 7.7/10
//! Generated site/index.html on 2026-10-01 12:30
//! ```
//!
//! ## Skip
//!
//! ```text
//! No changes in 2 databases since 2026-10-01 12:30; skipping generation
//! Use --force to regenerate anyway
//! ```
//!
//! ## Status
//!
//! ```text
//! Books (3f2a9c01d4e7) unchanged
//! Albums (9b01cc4e2d13) changed
//! Restaurants (missing) unchanged
//!
//! Last generated: 2026-10-01 12:30
//! Regeneration needed
//! ```
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout (stderr for
//! errors). Format functions are pure.

use crate::extract::CollectionStats;
use crate::fingerprint::Fingerprint;
use crate::generate::{Check, Report};
use chrono::{DateTime, Local};

/// Digest characters shown in status lines.
const SHORT_DIGEST: usize = 12;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

// ============================================================================
// Shared helpers
// ============================================================================

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: u64, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn rating_suffix(avg: Option<f64>) -> String {
    match avg {
        Some(avg) => format!(", avg {avg:.1}/10"),
        None => String::new(),
    }
}

fn short_fingerprint(fp: &Fingerprint) -> &str {
    match fp {
        Fingerprint::Missing => fp.as_str(),
        Fingerprint::Digest(hex) => &hex[..hex.len().min(SHORT_DIGEST)],
    }
}

fn timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Header plus context lines for one collection after extraction.
fn collection_lines(name: &str, stats: &CollectionStats) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", name, stats.kind)];
    if !stats.available {
        lines.push(format!("{}Database not available", indent(1)));
        return lines;
    }
    lines.push(format!(
        "{}{}{}",
        indent(1),
        plural(stats.total_count, "item", "items"),
        rating_suffix(stats.avg_rating)
    ));
    let counters: Vec<String> = stats
        .counters
        .iter()
        .map(|(counter, n)| format!("{} {}", counter.label(), n))
        .collect();
    if !counters.is_empty() {
        lines.push(format!("{}{}", indent(1), counters.join(", ")));
    }
    lines
}

// ============================================================================
// Generate
// ============================================================================

/// Format the result of a run that wrote the dashboard.
pub fn format_generate_output(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, stats) in &report.stats {
        lines.extend(collection_lines(name, stats));
    }
    lines.push(String::new());
    lines.push(format!(
        "Total: {} across {} of {} collections{}",
        plural(report.aggregate.total_items, "item", "items"),
        report.aggregate.collection_count,
        report.stats.len(),
        rating_suffix(report.aggregate.overall_avg_rating)
    ));
    lines.push(format!(
        "Generated {} on {}",
        report.output_path.display(),
        timestamp(&report.generated_at)
    ));
    lines
}

pub fn print_generate_output(report: &Report) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Skip
// ============================================================================

/// Format the notice for a run that found nothing to do.
pub fn format_skip_notice(check: &Check) -> Vec<String> {
    let sources = plural(check.fingerprints.len() as u64, "database", "databases");
    let first = match &check.stored {
        Some(state) => format!(
            "No changes in {} since {}; skipping generation",
            sources,
            timestamp(&state.last_generated)
        ),
        None => format!("No changes in {}; skipping generation", sources),
    };
    vec![first, "Use --force to regenerate anyway".to_string()]
}

pub fn print_skip_notice(check: &Check) {
    for line in format_skip_notice(check) {
        println!("{}", line);
    }
}

// ============================================================================
// Status
// ============================================================================

/// Format per-collection fingerprint status against the stored state.
pub fn format_status(check: &Check) -> Vec<String> {
    let changed = check.changed();
    let mut lines: Vec<String> = check
        .fingerprints
        .iter()
        .map(|(name, fp)| {
            let state = if changed.contains(&name.as_str()) {
                "changed"
            } else {
                "unchanged"
            };
            format!("{} ({}) {}", name, short_fingerprint(fp), state)
        })
        .collect();

    lines.push(String::new());
    match &check.stored {
        Some(state) => lines.push(format!(
            "Last generated: {}",
            timestamp(&state.last_generated)
        )),
        None => lines.push("Never generated".to_string()),
    }
    lines.push(
        if check.should_regenerate(false) {
            "Regeneration needed"
        } else {
            "Up to date"
        }
        .to_string(),
    );
    lines
}

pub fn print_status(check: &Check) {
    for line in format_status(check) {
        println!("{}", line);
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Format a fatal error for stderr using its `Display` message.
pub fn format_error(err: &dyn std::error::Error) -> String {
    format!("Error: {err}")
}

pub fn print_error(err: &dyn std::error::Error) {
    eprintln!("{}", format_error(err));
}

// ============================================================================
// Tests
// ============================================================================
