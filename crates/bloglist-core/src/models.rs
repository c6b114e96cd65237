use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{BlogError, Result};

/// Largest accepted like count. With every record at or below this bound,
/// per-author and overall sums stay exact in a `u64`.
pub const MAX_LIKES: u64 = u32::MAX as u64;

fn bounded_likes<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let likes = u64::deserialize(deserializer)?;
    if likes > MAX_LIKES {
        return Err(serde::de::Error::custom(format!(
            "likes {likes} exceeds the maximum of {MAX_LIKES}"
        )));
    }
    Ok(likes)
}

// ── Aggregation input ─────────────────────────────────────────────────────────

/// A single blog post as consumed by the aggregation engine.
///
/// Deserialisation is the validation boundary: `title`, `author` and `likes`
/// are required, and `likes` must be an integer in `0..=MAX_LIKES`. Unknown fields
/// such as `_id` or `__v` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogRecord {
    /// Post title.
    pub title: String,
    /// Author name; compared by exact string equality.
    pub author: String,
    /// Link to the post. Never part of an aggregation result.
    #[serde(default)]
    pub url: String,
    /// Number of likes.
    #[serde(deserialize_with = "bounded_likes")]
    pub likes: u64,
}

impl BlogRecord {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
        likes: u64,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            url: url.into(),
            likes,
        }
    }

    /// Validate one untyped JSON value into a record.
    ///
    /// `index` is the position of the value in its source and is carried into
    /// the [`BlogError::MalformedRecord`] on failure.
    pub fn from_value(index: usize, value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| BlogError::MalformedRecord {
            index,
            reason: e.to_string(),
        })
    }
}

/// Validate a whole JSON array of records, stopping at the first bad one.
pub fn parse_records(values: Vec<serde_json::Value>) -> Result<Vec<BlogRecord>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| BlogRecord::from_value(index, value))
        .collect()
}

// ── Aggregation results ───────────────────────────────────────────────────────

/// Projection of the most-liked record: `url` and ids are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteBlog {
    pub title: String,
    pub author: String,
    pub likes: u64,
}

impl From<&BlogRecord> for FavoriteBlog {
    fn from(record: &BlogRecord) -> Self {
        Self {
            title: record.title.clone(),
            author: record.author.clone(),
            likes: record.likes,
        }
    }
}

/// Author with the highest number of blogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: usize,
}

/// Author with the highest summed likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: u64,
}

/// Per-author group: number of blogs and their summed likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorTally {
    pub author: String,
    pub blogs: usize,
    pub likes: u64,
}

impl AuthorTally {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            blogs: 0,
            likes: 0,
        }
    }

    /// Accumulate one record's contribution.
    pub fn add_record(&mut self, record: &BlogRecord) {
        self.blogs += 1;
        // Exact for records that passed validation.
        self.likes = self.likes.saturating_add(record.likes);
    }
}

// ── Stored documents ──────────────────────────────────────────────────────────

/// A blog post as kept by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub url: String,
    #[serde(default, deserialize_with = "bounded_likes")]
    pub likes: u64,
    /// Id of the user who created the post, if any.
    #[serde(default)]
    pub user: Option<String>,
    /// Ids of the comments attached to the post, oldest first.
    #[serde(default)]
    pub comments: Vec<String>,
}

impl Blog {
    /// The aggregation view of this post.
    pub fn to_record(&self) -> BlogRecord {
        BlogRecord::new(&self.title, &self.author, &self.url, self.likes)
    }
}

/// Editable fields of a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDraft {
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u64,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub password_hash: String,
    /// Ids of the blogs this user created.
    #[serde(default)]
    pub blogs: Vec<String>,
}

/// A comment attached to a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    /// Id of the blog this comment belongs to.
    pub blog: String,
}
