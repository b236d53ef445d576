//! Restaurants: `restaurants` table with a `visit_status` of `visited` or
//! `want_to_visit`. Ratings only count for places actually visited.

use super::{CollectionStats, Counter, RecentItem, average, count, limit_param};
use crate::config::CollectionKind;
use sqlx::sqlite::SqliteConnection;

type RestaurantRow = (
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
    let total = count(conn, "SELECT COUNT(*) FROM restaurants").await?;
    let mut stats = CollectionStats::available(CollectionKind::Restaurants, total);

    stats.set(
        Counter::Visited,
        count(conn, "SELECT COUNT(*) FROM restaurants WHERE visit_status = 'visited'").await?,
    );
    stats.set(
        Counter::Wishlist,
        count(
            conn,
            "SELECT COUNT(*) FROM restaurants WHERE visit_status = 'want_to_visit'",
        )
        .await?,
    );
    stats.set(
        Counter::Locations,
        count(
            conn,
            "SELECT COUNT(DISTINCT location) FROM restaurants WHERE location IS NOT NULL",
        )
        .await?,
    );
    stats.avg_rating = average(
        conn,
        "SELECT AVG(rating) FROM restaurants WHERE rating IS NOT NULL AND visit_status = 'visited'",
    )
    .await?;

    let rows: Vec<RestaurantRow> = sqlx::query_as(
        "SELECT CAST(restaurant_name AS TEXT), CAST(location AS TEXT), CAST(cuisine AS TEXT),
                CAST(rating AS REAL), CAST(date_added AS TEXT)
         FROM restaurants
         ORDER BY date_added DESC, rowid DESC
         LIMIT ?",
    )
    .bind(limit_param(recent_limit))
    .fetch_all(&mut *conn)
    .await?;

    stats.recent_items = rows
        .into_iter()
        .map(
            |(name, location, cuisine, rating, date_added)| RecentItem::Restaurant {
                name,
                location,
                cuisine,
                rating,
                date_added,
            },
        )
        .collect();
    Ok(stats)
}
