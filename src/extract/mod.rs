//! Per-collection statistics extraction.
//!
//! Each collection kind lives in its own SQLite database with its own schema.
//! This module reduces all of them to one shape, [`CollectionStats`], so the
//! aggregator and renderer never look at a schema.
//!
//! Dispatch is an explicit `match` on [`CollectionKind`]; every kind has a
//! submodule exposing `collect(conn, recent_limit)`:
//!
//! | Kind | Table | Counters | Rated subset | Recent by |
//! |------|-------|----------|--------------|-----------|
//! | books | `books` | read, to read | all | `date_added` |
//! | albums | `albums` | artists | all | `date_added` |
//! | shows | `shows` | seen, wishlist, theaters | seen | `date_attended` (seen only) |
//! | restaurants | `restaurants` | visited, wishlist, locations | visited | `date_added` |
//!
//! ## Failure handling
//!
//! [`extract`] never returns an error. A missing file, a file that is not a
//! database, a missing table or column: all of these log a warning and yield
//! [`CollectionStats::unavailable`], and the run carries on with the other
//! collections.
//!
//! Sources are opened read-only and never created. The connection lives for
//! exactly one [`extract`] call and is closed whether or not the queries
//! succeeded.

mod albums;
pub mod artists;
mod books;
mod restaurants;
mod shows;

use crate::config::CollectionKind;
use indexmap::IndexMap;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::path::Path;

pub use artists::parse_or_fallback;

/// Kind-specific counters. Each kind reports a fixed subset, see
/// [`CollectionKind::counters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    Read,
    ToRead,
    Artists,
    Seen,
    Wishlist,
    Theaters,
    Visited,
    Locations,
}

impl Counter {
    pub fn label(self) -> &'static str {
        match self {
            Counter::Read => "Read",
            Counter::ToRead => "To Read",
            Counter::Artists => "Artists",
            Counter::Seen => "Seen",
            Counter::Wishlist => "Wishlist",
            Counter::Theaters => "Theaters",
            Counter::Visited => "Visited",
            Counter::Locations => "Locations",
        }
    }
}

impl CollectionKind {
    /// The counters this kind reports, in display order.
    pub fn counters(self) -> &'static [Counter] {
        match self {
            CollectionKind::Books => &[Counter::Read, Counter::ToRead],
            CollectionKind::Albums => &[Counter::Artists],
            CollectionKind::Shows => &[Counter::Seen, Counter::Wishlist, Counter::Theaters],
            CollectionKind::Restaurants => {
                &[Counter::Visited, Counter::Wishlist, Counter::Locations]
            }
        }
    }
}

/// Display projection of one recently added (or attended) item.
#[derive(Debug, Clone, PartialEq)]
pub enum RecentItem {
    Book {
        title: Option<String>,
        authors: Option<String>,
        rating: Option<f64>,
        date_added: Option<String>,
    },
    Album {
        name: Option<String>,
        artists: Vec<String>,
        genre: Option<String>,
        rating: Option<f64>,
        date_added: Option<String>,
    },
    Show {
        name: Option<String>,
        theater: Option<String>,
        date_attended: Option<String>,
        rating: Option<f64>,
    },
    Restaurant {
        name: Option<String>,
        location: Option<String>,
        cuisine: Option<String>,
        rating: Option<f64>,
        date_added: Option<String>,
    },
}

impl RecentItem {
    pub fn title(&self) -> Option<&str> {
        match self {
            RecentItem::Book { title, .. } => title.as_deref(),
            RecentItem::Album { name, .. }
            | RecentItem::Show { name, .. }
            | RecentItem::Restaurant { name, .. } => name.as_deref(),
        }
    }

    pub fn rating(&self) -> Option<f64> {
        match self {
            RecentItem::Book { rating, .. }
            | RecentItem::Album { rating, .. }
            | RecentItem::Show { rating, .. }
            | RecentItem::Restaurant { rating, .. } => *rating,
        }
    }
}

/// Normalized statistics for one collection.
///
/// When `available` is false every counter is zero, there is no average and
/// no recent items; renderers can rely on that.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    pub kind: CollectionKind,
    pub available: bool,
    pub total_count: u64,
    /// Keys are exactly `kind.counters()`, in that order.
    pub counters: IndexMap<Counter, u64>,
    /// Mean rating over the kind's rated subset, one decimal.
    pub avg_rating: Option<f64>,
    /// Newest first, never longer than the requested limit.
    pub recent_items: Vec<RecentItem>,
}

impl CollectionStats {
    /// Stats for a collection whose source could not be read.
    pub fn unavailable(kind: CollectionKind) -> Self {
        Self {
            kind,
            available: false,
            total_count: 0,
            counters: kind.counters().iter().map(|&c| (c, 0)).collect(),
            avg_rating: None,
            recent_items: Vec::new(),
        }
    }

    /// Empty but available stats, filled in by the kind modules.
    fn available(kind: CollectionKind, total_count: u64) -> Self {
        Self {
            available: true,
            total_count,
            ..Self::unavailable(kind)
        }
    }

    fn set(&mut self, counter: Counter, value: u64) {
        debug_assert!(self.kind.counters().contains(&counter));
        self.counters.insert(counter, value);
    }

    /// Value of a counter; zero for counters this kind doesn't report.
    pub fn counter(&self, counter: Counter) -> u64 {
        self.counters.get(&counter).copied().unwrap_or(0)
    }
}

/// Extract statistics for one collection. Never fails; see the module docs.
pub async fn extract(kind: CollectionKind, path: &Path, recent_limit: usize) -> CollectionStats {
    if !path.exists() {
        tracing::warn!(%kind, path = %path.display(), "Database not found; collection unavailable");
        return CollectionStats::unavailable(kind);
    }
    match collect(kind, path, recent_limit).await {
        Ok(stats) => {
            tracing::debug!(%kind, path = %path.display(), total = stats.total_count, "Extracted collection stats");
            stats
        }
        Err(err) => {
            tracing::warn!(%kind, path = %path.display(), error = %err, "Could not read database; collection unavailable");
            CollectionStats::unavailable(kind)
        }
    }
}

async fn collect(
    kind: CollectionKind,
    path: &Path,
    recent_limit: usize,
) -> sqlx::Result<CollectionStats> {
    let mut conn = open(path).await?;
    let result = match kind {
        CollectionKind::Books => books::collect(&mut conn, recent_limit).await,
        CollectionKind::Albums => albums::collect(&mut conn, recent_limit).await,
        CollectionKind::Shows => shows::collect(&mut conn, recent_limit).await,
        CollectionKind::Restaurants => restaurants::collect(&mut conn, recent_limit).await,
    };
    if let Err(err) = conn.close().await {
        tracing::debug!(path = %path.display(), error = %err, "Error closing database");
    }
    result
}

/// Open a source read-only. Never creates the file.
async fn open(path: &Path) -> sqlx::Result<SqliteConnection> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true)
        .create_if_missing(false);
    SqliteConnection::connect_with(&options).await
}

// ============================================================================
// Query helpers shared by the kind modules
// ============================================================================

/// Run a `SELECT COUNT(...)` query.
async fn count(conn: &mut SqliteConnection, sql: &str) -> sqlx::Result<u64> {
    let n: i64 = sqlx::query_scalar(sql).fetch_one(conn).await?;
    Ok(n.max(0) as u64)
}

/// Run a `SELECT AVG(...)` query; `None` when no rows qualify.
async fn average(conn: &mut SqliteConnection, sql: &str) -> sqlx::Result<Option<f64>> {
    let avg: Option<f64> = sqlx::query_scalar(sql).fetch_one(conn).await?;
    Ok(avg.map(round1))
}

/// SQLite `LIMIT` parameter for a recent-items query.
fn limit_param(recent_limit: usize) -> i64 {
    i64::try_from(recent_limit).unwrap_or(i64::MAX)
}

/// Round to one decimal place, exact halves to even (7.25 -> 7.2).
///
/// Fixed-precision formatting rounds from the exact binary value, which
/// `(value * 10.0).round()` does not.
pub(crate) fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}
