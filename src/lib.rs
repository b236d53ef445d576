//! # Collection Hub
//!
//! A static dashboard generator for personal collections. Each collection
//! (books, albums, Broadway shows, restaurants) lives in its own SQLite
//! database maintained by a separate app; this crate reads them all and
//! writes a single `index.html` summarizing counts, ratings and recent
//! additions, with a link to each collection's own site.
//!
//! # Architecture: Skip-or-Rebuild Pipeline
//!
//! ```text
//! CHECK    databases  →  fingerprints     (SHA-256 of every source file)
//!   ├─ same as last run → skip, write nothing
//!   └─ changed or --force
//! EXTRACT  databases  →  CollectionStats  (read-only SQL per kind)
//! RENDER   stats      →  index.html       (Maud)
//! PERSIST  fingerprints → .site_state.json (only after the page is written)
//! ```
//!
//! Regeneration is driven by content, not timestamps: a database touched
//! without changes does not trigger a rebuild, and one changed byte does.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading and validation: site settings and the ordered collection list |
//! | [`fingerprint`] | Per-source and combined fingerprints, persisted generation state, regeneration policy |
//! | [`extract`] | Per-kind statistics from a SQLite source; degrades to "unavailable" instead of failing |
//! | [`aggregate`] | Cross-collection totals and the overall average |
//! | [`render`] | The dashboard page, rendered with Maud and an embedded stylesheet |
//! | [`generate`] | The pipeline itself: check, extract, render, persist |
//! | [`output`] | CLI output formatting for `generate` and `status` |
//! | [`logging`] | `tracing` subscriber setup for stderr diagnostics |
//!
//! # Design Decisions
//!
//! ## Soft Failure Per Collection
//!
//! A missing, corrupt or wrongly shaped database never aborts a run. The
//! collection renders as "Database not available" and the rest of the
//! dashboard is built normally. Only failing to write the page or the
//! state file is an error.
//!
//! ## State Written Last
//!
//! The state file records what the current page was built from. It is
//! saved after `index.html`, via a temporary file and a rename, so a failed
//! or interrupted run leaves the previous state in place and the next run
//! retries instead of skipping.
//!
//! ## Order-Sensitive Combined Fingerprint
//!
//! The combined fingerprint hashes per-source fingerprints in configuration
//! order. Reordering collections changes the page layout, so it also
//! triggers a rebuild.

pub mod aggregate;
pub mod config;
pub mod extract;
pub mod fingerprint;
pub mod generate;
pub mod logging;
pub mod output;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;
