//! HTML dashboard rendering.
//!
//! Turns the extracted statistics into a single self-contained `index.html`:
//!
//! - **Header**: site title and optional subtitle
//! - **Aggregate band**: total items, available collections, overall rating
//! - **Collection cards**: one per configured collection, in config order,
//!   with kind-specific counters, recent items and a browse link
//! - **Footer**: generation timestamp
//!
//! A collection whose database could not be read still gets its card, with a
//! "Database not available" notice in place of the statistics.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating; all
//! interpolated text is escaped. The stylesheet is embedded at compile time
//! from `static/style.css`, so the output needs no other files.

use crate::aggregate::AggregateStats;
use crate::config::{CollectionConfig, CollectionKind, SiteConfig};
use crate::extract::{CollectionStats, RecentItem};
use chrono::{DateTime, Local};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/style.css");

/// Ratings are out of ten everywhere.
const MAX_RATING: u32 = 10;

/// Render the full dashboard page.
pub fn render_dashboard(
    config: &SiteConfig,
    collections: &[(&CollectionConfig, &CollectionStats)],
    aggregate: &AggregateStats,
    generated_at: DateTime<Local>,
) -> Markup {
    let site = &config.site;
    let content = html! {
        header.header {
            h1 { (site.title) }
            @if let Some(subtitle) = site.subtitle.as_deref().filter(|s| !s.is_empty()) {
                div.subtitle { (subtitle) }
            }
        }
        (aggregate_band(aggregate))
        main.collections {
            @for (collection, stats) in collections {
                (collection_card(collection, stats, config))
            }
        }
        footer {
            "Generated on " (generated_at.format("%Y-%m-%d %H:%M"))
        }
    };
    base_document(&site.title, content)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

fn aggregate_band(aggregate: &AggregateStats) -> Markup {
    html! {
        section.aggregate-stats {
            (aggregate_stat(&aggregate.total_items.to_string(), "Total Items"))
            (aggregate_stat(&aggregate.collection_count.to_string(), "Collections"))
            @if let Some(avg) = aggregate.overall_avg_rating {
                (aggregate_stat(&format!("{avg:.1}"), "Overall Avg Rating"))
            }
        }
    }
}

fn aggregate_stat(value: &str, label: &str) -> Markup {
    html! {
        div.aggregate-stat {
            div.aggregate-stat-value { (value) }
            div.aggregate-stat-label { (label) }
        }
    }
}

/// Renders one collection card
fn collection_card(
    collection: &CollectionConfig,
    stats: &CollectionStats,
    config: &SiteConfig,
) -> Markup {
    let accent = format!("--collection-accent: {};", collection.accent_color);
    let show_recent = config.site.show_recent_items && !stats.recent_items.is_empty();
    let link = collection.link_path(config.deployment_mode);

    html! {
        section.collection-card style=(accent) {
            div.collection-header {
                span.collection-emoji { (collection.emoji) }
                h2.collection-name { (collection.name) }
            }
            @if !stats.available {
                div.collection-unavailable { "Database not available" }
            } @else {
                div.collection-stats {
                    (stat_item(stats.total_count, total_label(stats.kind)))
                    @for (counter, value) in &stats.counters {
                        (stat_item(*value, counter.label()))
                    }
                    @if let Some(avg) = stats.avg_rating {
                        div.stat-item {
                            span.stat-value { (format!("{avg:.1}")) }
                            span.stat-label { "Avg Rating" }
                        }
                    }
                }
                @if show_recent {
                    div.recent-section {
                        h3.recent-title { (recent_heading(stats.kind)) }
                        div.recent-items {
                            @for item in stats.recent_items.iter().take(config.site.recent_items_count) {
                                (recent_item(item))
                            }
                        }
                    }
                }
            }
            a.browse-button href=(link) { "Browse " (collection.name) " →" }
        }
    }
}

fn stat_item(value: u64, label: &str) -> Markup {
    html! {
        div.stat-item {
            span.stat-value { (value) }
            span.stat-label { (label) }
        }
    }
}

fn total_label(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Books => "Total Books",
        CollectionKind::Albums => "Albums",
        CollectionKind::Shows => "Total Shows",
        CollectionKind::Restaurants => "Restaurants",
    }
}

fn recent_heading(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Shows => "Recently Seen",
        _ => "Recently Added",
    }
}

/// Renders a recent item mini card
fn recent_item(item: &RecentItem) -> Markup {
    html! {
        div.recent-item {
            div.recent-item-title { (item.title().unwrap_or("Unknown")) }
            div.recent-item-meta { (item_meta(item)) }
            @if let Some(rating) = item.rating() {
                div.recent-item-rating { (star_rating(rating)) }
            }
        }
    }
}

/// Secondary line under a recent item's title.
fn item_meta(item: &RecentItem) -> String {
    fn or_unknown(value: &Option<String>) -> &str {
        value.as_deref().filter(|v| !v.is_empty()).unwrap_or("Unknown")
    }
    fn with_detail(primary: &str, detail: &Option<String>) -> String {
        match detail.as_deref().filter(|d| !d.is_empty()) {
            Some(d) => format!("{primary} • {d}"),
            None => primary.to_string(),
        }
    }

    match item {
        RecentItem::Book { authors, .. } => or_unknown(authors).to_string(),
        RecentItem::Album { artists, .. } => {
            if artists.is_empty() {
                "Unknown".to_string()
            } else {
                artists.join(", ")
            }
        }
        RecentItem::Show {
            theater,
            date_attended,
            ..
        } => with_detail(or_unknown(theater), date_attended),
        RecentItem::Restaurant {
            location, cuisine, ..
        } => with_detail(or_unknown(location), cuisine),
    }
}

/// Ten stars, filled up to the rating's integer part, followed by `x/10`.
pub fn star_rating(rating: f64) -> Markup {
    let filled = (rating.max(0.0).floor() as u32).min(MAX_RATING);
    let stars = format!(
        "{}{}",
        "★".repeat(filled as usize),
        "☆".repeat((MAX_RATING - filled) as usize)
    );
    html! {
        span.rating { (stars) }
        " "
        span.rating-value { (rating) "/" (MAX_RATING) }
    }
}

// ============================================================================
// Tests
// ============================================================================
