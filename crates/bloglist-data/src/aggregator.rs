//! Statistics report over a list of blogs.
//!
//! Bundles every `list_helper` figure into one serialisable value for the
//! CLI and the `/api/stats` endpoint.

use std::fmt::Write as _;

use bloglist_core::formatting::{format_count, percentage, pluralize};
use bloglist_core::list_helper;
use bloglist_core::models::{AuthorBlogs, AuthorLikes, AuthorTally, BlogRecord, FavoriteBlog};
use serde::{Deserialize, Serialize};

// ── BlogStatistics ────────────────────────────────────────────────────────────

/// All aggregate figures for one list of blogs.
///
/// The three selections are `None` exactly when the list is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogStatistics {
    /// Number of blogs summarised.
    pub blog_count: usize,
    /// Sum of likes across all blogs.
    pub total_likes: u64,
    /// Most-liked single blog.
    pub favorite_blog: Option<FavoriteBlog>,
    /// Most prolific author.
    pub most_blogs: Option<AuthorBlogs>,
    /// Author with the most likes overall.
    pub most_likes: Option<AuthorLikes>,
    /// Per-author breakdown in first-occurrence order.
    pub authors: Vec<AuthorTally>,
}

// ── StatsAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that builds and renders [`BlogStatistics`].
pub struct StatsAggregator;

impl StatsAggregator {
    /// Summarise `records`. Never fails; an empty list gives zero totals.
    pub fn summarize(records: &[BlogRecord]) -> BlogStatistics {
        BlogStatistics {
            blog_count: records.len(),
            total_likes: list_helper::total_likes(records),
            favorite_blog: list_helper::favorite_blog(records).ok(),
            most_blogs: list_helper::most_blogs(records).ok(),
            most_likes: list_helper::most_likes(records).ok(),
            authors: list_helper::author_tallies(records),
        }
    }

    /// Render a plain-text report.
    pub fn render_text(stats: &BlogStatistics) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{} with {} in total",
            pluralize(stats.blog_count as u64, "blog"),
            pluralize(stats.total_likes, "like")
        );

        if stats.blog_count == 0 {
            return out;
        }

        if let Some(fav) = &stats.favorite_blog {
            let _ = writeln!(
                out,
                "Favorite blog:  \"{}\" by {} ({})",
                fav.title,
                fav.author,
                pluralize(fav.likes, "like")
            );
        }
        if let Some(mb) = &stats.most_blogs {
            let _ = writeln!(
                out,
                "Most blogs:     {} ({})",
                mb.author,
                pluralize(mb.blogs as u64, "blog")
            );
        }
        if let Some(ml) = &stats.most_likes {
            let _ = writeln!(
                out,
                "Most likes:     {} ({})",
                ml.author,
                pluralize(ml.likes, "like")
            );
        }

        let _ = writeln!(out);
        let width = stats
            .authors
            .iter()
            .map(|a| a.author.chars().count())
            .max()
            .unwrap_or(0)
            .max("Author".len());
        let _ = writeln!(
            out,
            "{:<width$}  {:>6}  {:>10}  {:>6}",
            "Author", "Blogs", "Likes", "Share"
        );
        for tally in &stats.authors {
            let _ = writeln!(
                out,
                "{:<width$}  {:>6}  {:>10}  {:>5.1}%",
                tally.author,
                format_count(tally.blogs as u64),
                format_count(tally.likes),
                percentage(tally.likes, stats.total_likes, 1)
            );
        }

        out
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
