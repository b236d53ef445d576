//! Books: `books` table with a `read_status` of `read` or `to_read`.

use super::{CollectionStats, Counter, RecentItem, average, count, limit_param};
use crate::config::CollectionKind;
use sqlx::sqlite::SqliteConnection;

type BookRow = (Option<String>, Option<String>, Option<f64>, Option<String>);

pub(super) async fn collect(
    conn: &mut SqliteConnection,
    recent_limit: usize,
) -> sqlx::Result<CollectionStats> {
    let total = count(conn, "SELECT COUNT(*) FROM books").await?;
    let mut stats = CollectionStats::available(CollectionKind::Books, total);

    stats.set(
        Counter::Read,
        count(conn, "SELECT COUNT(*) FROM books WHERE read_status = 'read'").await?,
    );
    stats.set(
        Counter::ToRead,
        count(conn, "SELECT COUNT(*) FROM books WHERE read_status = 'to_read'").await?,
    );
    stats.avg_rating = average(conn, "SELECT AVG(rating) FROM books WHERE rating IS NOT NULL").await?;

    let rows: Vec<BookRow> = sqlx::query_as(
        "SELECT CAST(title AS TEXT), CAST(authors AS TEXT), CAST(rating AS REAL), CAST(date_added AS TEXT)
         FROM books
         ORDER BY date_added DESC, rowid DESC
         LIMIT ?",
    )
    .bind(limit_param(recent_limit))
    .fetch_all(&mut *conn)
    .await?;

    stats.recent_items = rows
        .into_iter()
        .map(|(title, authors, rating, date_added)| RecentItem::Book {
            title,
            authors,
            rating,
            date_added,
        })
        .collect();
    Ok(stats)
}
