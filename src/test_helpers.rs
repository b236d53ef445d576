//! Shared test utilities: SQLite fixture databases for every collection kind.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let path = tmp.path().join("books.db");
//! books_fixture(&path).await;
//!
//! let stats = extract(CollectionKind::Books, &path, 5).await;
//! assert_eq!(stats.total_count, 4);
//! ```
//!
//! Each `*_fixture` documents its rows; tests assert against those numbers.

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::{Connection, Executor};
use std::path::Path;

pub const BOOKS_SCHEMA: &str = "CREATE TABLE books (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    authors TEXT,
    rating INTEGER,
    read_status TEXT,
    date_added TEXT
)";

pub const ALBUMS_SCHEMA: &str = "CREATE TABLE albums (
    id INTEGER PRIMARY KEY,
    album_name TEXT NOT NULL,
    artists TEXT,
    genre TEXT,
    rating INTEGER,
    date_added TEXT
)";

pub const SHOWS_SCHEMA: &str = "CREATE TABLE shows (
    id INTEGER PRIMARY KEY,
    show_name TEXT NOT NULL,
    theater_name TEXT,
    date_attended TEXT,
    rating INTEGER,
    seen_status TEXT
)";

pub const RESTAURANTS_SCHEMA: &str = "CREATE TABLE restaurants (
    id INTEGER PRIMARY KEY,
    restaurant_name TEXT NOT NULL,
    location TEXT,
    cuisine TEXT,
    rating REAL,
    visit_status TEXT,
    date_added TEXT
)";

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a database at `path` and run each statement in order.
pub async fn build_db(path: &Path, statements: &[&str]) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete);
    let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
    for statement in statements {
        conn.execute(*statement).await.unwrap();
    }
    conn.close().await.unwrap();
}

/// Four books: read (9), read (6), to_read (8), reading (unrated, newest).
pub async fn books_fixture(path: &Path) {
    build_db(
        path,
        &[
            BOOKS_SCHEMA,
            "INSERT INTO books (title, authors, rating, read_status, date_added) VALUES
                ('Dune', 'Frank Herbert', 9, 'read', '2024-01-10'),
                ('Emma', 'Jane Austen', 6, 'read', '2024-02-15'),
                ('Ulysses', 'James Joyce', 8, 'to_read', '2024-03-20'),
                ('Middlemarch', 'George Eliot', NULL, 'reading', '2024-04-01')",
        ],
    )
    .await;
}

/// Five albums, one with a non-JSON artist field ("Bootleg") and one whose
/// artist differs from another only by case and whitespace.
pub async fn albums_fixture(path: &Path) {
    build_db(
        path,
        &[
            ALBUMS_SCHEMA,
            r#"INSERT INTO albums (album_name, artists, genre, rating, date_added) VALUES
                ('OK Computer', '["Radiohead"]', 'Rock', 10, '2024-01-01'),
                ('Homogenic', '["Björk"]', 'Electronic', 7, '2024-02-01'),
                ('Bootleg', 'not json', NULL, NULL, '2024-03-01'),
                ('Lowercase', '[" radiohead "]', 'Rock', 8, '2024-04-01'),
                ('Collab', '["Radiohead", "Thom Yorke"]', 'Electronic', 6, '2024-05-01')"#,
        ],
    )
    .await;
}

/// Three seen shows (9, 7, unrated) and two wishlist shows, one of them
/// rated 1.
pub async fn shows_fixture(path: &Path) {
    build_db(
        path,
        &[
            SHOWS_SCHEMA,
            "INSERT INTO shows (show_name, theater_name, date_attended, rating, seen_status) VALUES
                ('Phantom', 'Majestic', '2023-05-01', 9, 'seen'),
                ('Wicked', 'Gershwin', '2023-08-12', 7, 'seen'),
                ('Hadestown', NULL, '2024-01-20', NULL, 'seen'),
                ('Hamilton', 'Richard Rodgers', NULL, 1, 'wishlist'),
                ('Cats', 'Majestic', NULL, NULL, 'wishlist')",
        ],
    )
    .await;
}

/// `count` restaurants named `Place {i}`, added on consecutive days.
/// Even rows are visited and rated 8, odd rows are wishlisted and rated 2;
/// locations cycle through three boroughs.
pub async fn restaurants_fixture(path: &Path, count: usize) {
    const LOCATIONS: [&str; 3] = ["Brooklyn", "Queens", "Manhattan"];
    let rows: Vec<String> = (0..count)
        .map(|i| {
            let (status, rating) = if i % 2 == 0 {
                ("visited", 8)
            } else {
                ("want_to_visit", 2)
            };
            format!(
                "('Place {i}', '{}', 'Thai', {rating}, '{status}', '2024-{:02}-{:02}')",
                LOCATIONS[i % 3],
                i / 28 + 1,
                i % 28 + 1
            )
        })
        .collect();
    let mut statements = vec![RESTAURANTS_SCHEMA.to_string()];
    if !rows.is_empty() {
        statements.push(format!(
            "INSERT INTO restaurants (restaurant_name, location, cuisine, rating, visit_status, date_added) VALUES {}",
            rows.join(", ")
        ));
    }
    let statements: Vec<&str> = statements.iter().map(String::as_str).collect();
    build_db(path, &statements).await;
}
