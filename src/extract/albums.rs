//! Albums: `albums` table whose `artists` column holds a JSON list of names.

use super::artists::{count_distinct, parse_or_fallback};
use super::{CollectionStats, Counter, RecentItem, average, count, limit_param};
use crate::config::CollectionKind;
use sqlx::sqlite::SqliteConnection;

type AlbumRow = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<String>,
);

pub(super) async fn collect(
    conn: &mut SqliteConnection,
    recent_limit: usize,
) -> sqlx::Result<CollectionStats> {
    let total = count(conn, "SELECT COUNT(*) FROM albums").await?;
    let mut stats = CollectionStats::available(CollectionKind::Albums, total);

    let artist_fields: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT CAST(artists AS TEXT) FROM albums WHERE artists IS NOT NULL",
    )
    .fetch_all(&mut *conn)
    .await?;
    stats.set(
        Counter::Artists,
        count_distinct(artist_fields.iter().map(String::as_str)) as u64,
    );
    stats.avg_rating =
        average(conn, "SELECT AVG(rating) FROM albums WHERE rating IS NOT NULL").await?;

    let rows: Vec<AlbumRow> = sqlx::query_as(
        "SELECT CAST(album_name AS TEXT), CAST(artists AS TEXT), CAST(genre AS TEXT),
                CAST(rating AS REAL), CAST(date_added AS TEXT)
         FROM albums
         ORDER BY date_added DESC, rowid DESC
         LIMIT ?",
    )
    .bind(limit_param(recent_limit))
    .fetch_all(&mut *conn)
    .await?;

    stats.recent_items = rows
        .into_iter()
        .map(|(name, artists, genre, rating, date_added)| RecentItem::Album {
            name,
            artists: parse_or_fallback(artists.as_deref()),
            genre,
            rating,
            date_added,
        })
        .collect();
    Ok(stats)
}
