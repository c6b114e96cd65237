//! Aggregate statistics over an ordered list of blog records.
//!
//! Every function is a pure reduction over a borrowed slice. Selections that
//! rank records or authors break ties by first occurrence in the input.

use std::collections::HashMap;

use crate::error::{BlogError, Result};
use crate::models::{AuthorBlogs, AuthorLikes, AuthorTally, BlogRecord, FavoriteBlog};

/// Always returns `1`.
pub fn dummy(_records: &[BlogRecord]) -> u64 {
    1
}

/// Sum of `likes` across all records; `0` for an empty slice.
///
/// Exact for records within [`MAX_LIKES`](crate::models::MAX_LIKES); out-of-range likes built by hand
/// saturate at `u64::MAX` rather than overflow.
pub fn total_likes(records: &[BlogRecord]) -> u64 {
    records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.likes))
}

/// The record with the most likes, projected to `{title, author, likes}`.
///
/// When several records share the maximum, the first one in input order wins.
pub fn favorite_blog(records: &[BlogRecord]) -> Result<FavoriteBlog> {
    first_max_by_key(records, |r| r.likes)
        .map(FavoriteBlog::from)
        .ok_or(BlogError::EmptyInput {
            operation: "favorite_blog",
        })
}

/// The author with the most blogs.
pub fn most_blogs(records: &[BlogRecord]) -> Result<AuthorBlogs> {
    let tallies = author_tallies(records);
    first_max_by_key(&tallies, |t| t.blogs as u64)
        .map(|t| AuthorBlogs {
            author: t.author.clone(),
            blogs: t.blogs,
        })
        .ok_or(BlogError::EmptyInput {
            operation: "most_blogs",
        })
}

/// The author whose blogs have the highest summed likes.
pub fn most_likes(records: &[BlogRecord]) -> Result<AuthorLikes> {
    let tallies = author_tallies(records);
    first_max_by_key(&tallies, |t| t.likes)
        .map(|t| AuthorLikes {
            author: t.author.clone(),
            likes: t.likes,
        })
        .ok_or(BlogError::EmptyInput {
            operation: "most_likes",
        })
}

/// Group records by exact author string.
///
/// Authors appear in the order of their first blog in `records`.
pub fn author_tallies(records: &[BlogRecord]) -> Vec<AuthorTally> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<AuthorTally> = Vec::new();

    for record in records {
        let idx = *positions.entry(record.author.as_str()).or_insert_with(|| {
            tallies.push(AuthorTally::new(record.author.as_str()));
            tallies.len() - 1
        });
        tallies[idx].add_record(record);
    }

    tallies
}

/// Like `Iterator::max_by_key`, but keeps the first of equal maxima.
fn first_max_by_key<T>(items: &[T], key: impl Fn(&T) -> u64) -> Option<&T> {
    let mut best: Option<(&T, u64)> = None;
    for item in items {
        let k = key(item);
        match best {
            Some((_, best_key)) if k <= best_key => {}
            _ => best = Some((item, k)),
        }
    }
    best.map(|(item, _)| item)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
