//! Dashboard generation pipeline.
//!
//! Sequences the other modules for one `generate` run:
//!
//! ```text
//! CHECK    fingerprint every source, compare with stored state
//!   ├─ unchanged and not forced → SKIP (nothing written)
//!   └─ otherwise
//! EXTRACT  one extraction per collection, in config order
//! RENDER   aggregate, then render the page
//! PERSIST  write index.html, then save the new state
//! ```
//!
//! The state file is written last. If the page cannot be written the run
//! fails with the previous state intact, so the next run retries in full
//! instead of skipping.
//!
//! Configuration and state are passed in explicitly; nothing here reads
//! globals or the working directory.

use crate::aggregate::{AggregateStats, aggregate};
use crate::config::SiteConfig;
use crate::extract::{self, CollectionStats};
use crate::fingerprint::{
    self, Fingerprint, GenerationState, StateError, StateStore, combined_fingerprint,
};
use crate::render::render_dashboard;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Name of the generated page within the output directory.
pub const OUTPUT_FILENAME: &str = "index.html";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("cannot save generation state: {0}")]
    State(#[from] StateError),
}

/// Result of the CHECK stage.
#[derive(Debug, Clone)]
pub struct Check {
    /// Per-collection fingerprints, in configuration order.
    pub fingerprints: Vec<(String, Fingerprint)>,
    pub combined: String,
    /// State from the last successful run, if any.
    pub stored: Option<GenerationState>,
}

impl Check {
    pub fn should_regenerate(&self, force: bool) -> bool {
        let stored = self.stored.as_ref().map(|s| s.databases_hash.as_str());
        fingerprint::should_regenerate(&self.combined, stored, force)
    }

    /// Names of collections whose source differs from the stored state.
    /// Every collection counts as changed when there is no stored state.
    pub fn changed(&self) -> Vec<&str> {
        self.fingerprints
            .iter()
            .filter(|(name, fp)| match &self.stored {
                Some(state) => match state.individual_hashes.get(name) {
                    Some(previous) => previous.as_deref() != fp.digest(),
                    None => true,
                },
                None => true,
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Fingerprint every configured source and load the stored state.
pub fn check(config: &SiteConfig, store: &StateStore) -> Check {
    let fingerprints: Vec<(String, Fingerprint)> = config
        .collections
        .iter()
        .map(|c| {
            let fp = fingerprint::fingerprint_of(&c.db_path);
            tracing::debug!(collection = %c.name, fingerprint = %fp, "Fingerprinted source");
            (c.name.clone(), fp)
        })
        .collect();
    let fps: Vec<Fingerprint> = fingerprints.iter().map(|(_, fp)| fp.clone()).collect();
    Check {
        combined: combined_fingerprint(&fps),
        fingerprints,
        stored: store.load(),
    }
}

/// What a successful run did.
#[derive(Debug)]
pub enum Outcome {
    /// Sources unchanged; nothing was written.
    Skipped(Check),
    Generated(Report),
}

/// Summary of a run that wrote the dashboard.
#[derive(Debug)]
pub struct Report {
    pub output_path: PathBuf,
    /// Stats by collection name, in configuration order.
    pub stats: IndexMap<String, CollectionStats>,
    pub aggregate: AggregateStats,
    pub generated_at: DateTime<Local>,
}

/// Run the pipeline. `force` rebuilds even when nothing changed.
pub async fn generate(
    config: &SiteConfig,
    store: &StateStore,
    force: bool,
) -> Result<Outcome, GenerateError> {
    generate_at(config, store, force, Local::now()).await
}

/// [`generate`] with an explicit generation timestamp.
pub async fn generate_at(
    config: &SiteConfig,
    store: &StateStore,
    force: bool,
    now: DateTime<Local>,
) -> Result<Outcome, GenerateError> {
    let check = check(config, store);
    if !check.should_regenerate(force) {
        tracing::info!(combined = %check.combined, "No source changes; skipping generation");
        return Ok(Outcome::Skipped(check));
    }
    tracing::info!(force, changed = ?check.changed(), "Generating dashboard");

    let mut stats = IndexMap::with_capacity(config.collections.len());
    for collection in &config.collections {
        let collection_stats = extract::extract(
            collection.kind,
            &collection.db_path,
            config.site.recent_items_count,
        )
        .await;
        stats.insert(collection.name.clone(), collection_stats);
    }

    let aggregate = aggregate(&stats);
    let pairs: Vec<_> = config
        .collections
        .iter()
        .filter_map(|c| stats.get(&c.name).map(|s| (c, s)))
        .collect();
    let page = render_dashboard(config, &pairs, &aggregate, now).into_string();

    let output_dir = &config.site.output_dir;
    fs::create_dir_all(output_dir).map_err(|source| GenerateError::OutputDir {
        path: output_dir.clone(),
        source,
    })?;
    let output_path = output_dir.join(OUTPUT_FILENAME);
    fs::write(&output_path, page).map_err(|source| GenerateError::Write {
        path: output_path.clone(),
        source,
    })?;

    let state = GenerationState::new(
        now,
        check.combined,
        check.fingerprints.iter().map(|(name, fp)| (name.as_str(), fp)),
    );
    store.save(&state)?;
    tracing::debug!(path = %store.path().display(), "Saved generation state");

    Ok(Outcome::Generated(Report {
        output_path,
        stats,
        aggregate,
        generated_at: now,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::extract::Counter;
    use crate::fingerprint::STATE_FILENAME;
    use crate::test_helpers::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// Config with all four kinds pointing into `dir`.
    fn config_in(dir: &Path) -> SiteConfig {
        let toml = r#"
[site]
title = "Test Hub"
output_dir = "site"

[[collections]]
name = "Books"
kind = "books"
db_path = "books.db"
site_path_file = "books/index.html"
site_path_http = "/books/"

[[collections]]
name = "Albums"
kind = "albums"
db_path = "albums.db"
site_path_file = "albums/index.html"
site_path_http = "/albums/"

[[collections]]
name = "Shows"
kind = "shows"
db_path = "shows.db"
site_path_file = "shows/index.html"
site_path_http = "/shows/"

[[collections]]
name = "Restaurants"
kind = "restaurants"
db_path = "restaurants.db"
site_path_file = "restaurants/index.html"
site_path_http = "/restaurants/"
"#;
        let mut config = parse_config(toml).unwrap();
        config.site.output_dir = dir.join("site");
        for c in &mut config.collections {
            c.db_path = dir.join(&c.db_path);
        }
        config
    }

    async fn populate(dir: &Path) {
        books_fixture(&dir.join("books.db")).await;
        albums_fixture(&dir.join("albums.db")).await;
        shows_fixture(&dir.join("shows.db")).await;
        // restaurants.db deliberately missing
    }

    fn store_in(dir: &Path) -> StateStore {
        StateStore::new(dir.join(STATE_FILENAME))
    }

    fn expect_report(outcome: Outcome) -> Report {
        match outcome {
            Outcome::Generated(report) => report,
            Outcome::Skipped(_) => panic!("expected generation, got skip"),
        }
    }

    // =========================================================================
    // Full runs
    // =========================================================================

    #[tokio::test]
    async fn first_run_generates_page_and_state() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path()).await;
        let config = config_in(tmp.path());
        let store = store_in(tmp.path());

        let report = expect_report(generate(&config, &store, false).await.unwrap());

        assert_eq!(report.output_path, tmp.path().join("site/index.html"));
        let html = fs::read_to_string(&report.output_path).unwrap();
        assert!(html.contains("Test Hub"));
        assert!(html.contains("Database not available"));

        let state = store.load().unwrap();
        assert_eq!(state.databases_hash, check(&config, &store).combined);
        assert_eq!(state.individual_hashes["Restaurants"], None);
        assert!(state.individual_hashes["Books"].is_some());
    }

    #[tokio::test]
    async fn stats_keyed_in_config_order() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path()).await;
        let config = config_in(tmp.path());

        let report = expect_report(
            generate(&config, &store_in(tmp.path()), false)
                .await
                .unwrap(),
        );
        let names: Vec<_> = report.stats.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Books", "Albums", "Shows", "Restaurants"]);
    }

    #[tokio::test]
    async fn one_unavailable_collection_does_not_stop_the_others() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path()).await;
        let config = config_in(tmp.path());

        let report = expect_report(
            generate(&config, &store_in(tmp.path()), false)
                .await
                .unwrap(),
        );
        assert!(report.stats["Books"].available);
        assert!(report.stats["Albums"].available);
        assert!(report.stats["Shows"].available);
        assert!(!report.stats["Restaurants"].available);
        assert_eq!(report.stats["Shows"].counter(Counter::Seen), 3);

        // 4 books + 5 albums + 5 shows + 0
        assert_eq!(report.aggregate.total_items, 14);
        assert_eq!(report.aggregate.collection_count, 3);
        // (7.7 + 7.8 + 8.0) / 3 = 7.833 -> 7.8
        assert_eq!(report.aggregate.overall_avg_rating, Some(7.8));
    }

    #[tokio::test]
    async fn second_run_without_changes_is_skipped() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path()).await;
        let config = config_in(tmp.path());
        let store = store_in(tmp.path());

        generate(&config, &store, false).await.unwrap();
        let state_before = fs::read_to_string(store.path()).unwrap();
        let page = tmp.path().join("site/index.html");
        fs::remove_file(&page).unwrap();

        let outcome = generate(&config, &store, false).await.unwrap();
        assert!(matches!(outcome, Outcome::Skipped(_)));
        // Skipping wrote nothing
        assert!(!page.exists());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), state_before);
    }

    #[tokio::test]
    async fn force_regenerates_unchanged_sources() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path()).await;
        let config = config_in(tmp.path());
        let store = store_in(tmp.path());

        generate(&config, &store, false).await.unwrap();
        let page = tmp.path().join("site/index.html");
        fs::remove_file(&page).unwrap();

        let outcome = generate(&config, &store, true).await.unwrap();
        assert!(matches!(outcome, Outcome::Generated(_)));
        assert!(page.exists());
    }

    #[tokio::test]
    async fn new_source_triggers_regeneration() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path()).await;
        let config = config_in(tmp.path());
        let store = store_in(tmp.path());

        generate(&config, &store, false).await.unwrap();
        restaurants_fixture(&tmp.path().join("restaurants.db"), 4).await;

        let check = check(&config, &store);
        assert!(check.should_regenerate(false));
        assert_eq!(check.changed(), vec!["Restaurants"]);

        let report = expect_report(generate(&config, &store, false).await.unwrap());
        assert!(report.stats["Restaurants"].available);
        assert_eq!(report.aggregate.collection_count, 4);
    }

    #[tokio::test]
    async fn output_failure_leaves_state_untouched() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path()).await;
        let mut config = config_in(tmp.path());
        let store = store_in(tmp.path());

        generate(&config, &store, false).await.unwrap();
        let state_before = fs::read_to_string(store.path()).unwrap();

        // A regular file where a directory is needed
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        config.site.output_dir = blocker.join("site");

        let err = generate(&config, &store, true).await.unwrap_err();
        assert!(matches!(err, GenerateError::OutputDir { .. }));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), state_before);
    }

    #[tokio::test]
    async fn failed_first_run_writes_no_state() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path()).await;
        let mut config = config_in(tmp.path());
        let store = store_in(tmp.path());

        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        config.site.output_dir = blocker;

        assert!(generate(&config, &store, false).await.is_err());
        assert!(store.load().is_none());
        // The next run still generates rather than skipping
        assert!(check(&config, &store).should_regenerate(false));
    }

    #[tokio::test]
    async fn generation_timestamp_is_recorded() {
        use chrono::TimeZone;

        let tmp = TempDir::new().unwrap();
        populate(tmp.path()).await;
        let config = config_in(tmp.path());
        let store = store_in(tmp.path());
        let at = Local.with_ymd_and_hms(2026, 10, 1, 12, 30, 0).unwrap();

        generate_at(&config, &store, false, at).await.unwrap();
        assert_eq!(store.load().unwrap().last_generated, at);
        let html = fs::read_to_string(tmp.path().join("site/index.html")).unwrap();
        assert!(html.contains("Generated on 2026-10-01 12:30"));
    }

    // =========================================================================
    // Check
    // =========================================================================

    #[tokio::test]
    async fn check_without_state_marks_everything_changed() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path()).await;
        let config = config_in(tmp.path());

        let check = check(&config, &store_in(tmp.path()));
        assert!(check.stored.is_none());
        assert!(check.should_regenerate(false));
        assert_eq!(check.changed().len(), 4);
        assert_eq!(check.fingerprints[3].1, Fingerprint::Missing);
    }

    #[tokio::test]
    async fn reordering_collections_changes_combined_fingerprint() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path()).await;
        let config = config_in(tmp.path());
        let store = store_in(tmp.path());

        let mut reordered = config.clone();
        reordered.collections.swap(0, 1);

        assert_ne!(
            check(&config, &store).combined,
            check(&reordered, &store).combined
        );
    }
}
