//! Cross-collection summary shown at the top of the dashboard.

use crate::extract::{CollectionStats, round1};
use indexmap::IndexMap;

/// Totals across all configured collections.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStats {
    /// Sum of `total_count` over every collection; unavailable ones add 0.
    pub total_items: u64,
    /// Mean of the per-collection averages, one decimal.
    ///
    /// This is an average of averages: a collection with three rated items
    /// weighs as much as one with three hundred.
    pub overall_avg_rating: Option<f64>,
    /// Number of collections whose source could be read.
    pub collection_count: usize,
}

/// Combine per-collection stats, keyed by collection name.
pub fn aggregate(stats_by_name: &IndexMap<String, CollectionStats>) -> AggregateStats {
    let total_items = stats_by_name.values().map(|s| s.total_count).sum();
    let ratings: Vec<f64> = stats_by_name
        .values()
        .filter_map(|s| s.avg_rating)
        .collect();
    let overall_avg_rating = if ratings.is_empty() {
        None
    } else {
        Some(round1(ratings.iter().sum::<f64>() / ratings.len() as f64))
    };
    AggregateStats {
        total_items,
        overall_avg_rating,
        collection_count: stats_by_name.values().filter(|s| s.available).count(),
    }
}
