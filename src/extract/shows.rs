//! Shows: `shows` table with a `seen_status` of `seen` or `wishlist`.
//!
//! Only seen shows have meaningful ratings and attendance dates, so both the
//! average and the recent list are restricted to them.

use super::{CollectionStats, Counter, RecentItem, average, count, limit_param};
use crate::config::CollectionKind;
use sqlx::sqlite::SqliteConnection;

type ShowRow = (Option<String>, Option<String>, Option<String>, Option<f64>);

pub(super) async fn collect(
    conn: &mut SqliteConnection,
    recent_limit: usize,
) -> sqlx::Result<CollectionStats> {
    let total = count(conn, "SELECT COUNT(*) FROM shows").await?;
    let mut stats = CollectionStats::available(CollectionKind::Shows, total);

    stats.set(
        Counter::Seen,
        count(conn, "SELECT COUNT(*) FROM shows WHERE seen_status = 'seen'").await?,
    );
    stats.set(
        Counter::Wishlist,
        count(conn, "SELECT COUNT(*) FROM shows WHERE seen_status = 'wishlist'").await?,
    );
    stats.set(
        Counter::Theaters,
        count(
            conn,
            "SELECT COUNT(DISTINCT theater_name) FROM shows WHERE theater_name IS NOT NULL",
        )
        .await?,
    );
    stats.avg_rating = average(
        conn,
        "SELECT AVG(rating) FROM shows WHERE rating IS NOT NULL AND seen_status = 'seen'",
    )
    .await?;

    let rows: Vec<ShowRow> = sqlx::query_as(
        "SELECT CAST(show_name AS TEXT), CAST(theater_name AS TEXT),
                CAST(date_attended AS TEXT), CAST(rating AS REAL)
         FROM shows
         WHERE seen_status = 'seen'
         ORDER BY date_attended DESC, rowid DESC
         LIMIT ?",
    )
    .bind(limit_param(recent_limit))
    .fetch_all(&mut *conn)
    .await?;

    stats.recent_items = rows
        .into_iter()
        .map(|(name, theater, date_attended, rating)| RecentItem::Show {
            name,
            theater,
            date_attended,
            rating,
        })
        .collect();
    Ok(stats)
}
