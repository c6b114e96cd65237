//! In-memory document store for blogs, users and comments.
//!
//! Documents keep insertion order, so [`BlogStore::records`] hands the
//! aggregation engine a stable sequence. The whole store can be snapshotted
//! to a JSON file and loaded back.

use std::path::Path;

use bloglist_core::error::{BlogError, Result};
use bloglist_core::models::{Blog, BlogDraft, BlogRecord, Comment, User, MAX_LIKES};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Minimum username length in characters.
pub const MIN_USERNAME_LEN: usize = 3;

// ── Ids ───────────────────────────────────────────────────────────────────────

/// Generate a fresh document id (32 lowercase hex chars).
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Validate an id from the outside world and return its canonical form.
///
/// Hyphenated and upper-case UUIDs are accepted and normalised.
pub fn parse_id(id: &str) -> Result<String> {
    Uuid::try_parse(id)
        .map(|u| u.simple().to_string())
        .map_err(|_| BlogError::MalformedId(id.to_string()))
}

// ── BlogStore ─────────────────────────────────────────────────────────────────

/// All documents of the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogStore {
    #[serde(default)]
    blogs: Vec<Blog>,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    comments: Vec<Comment>,
}

impl BlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Snapshots ─────────────────────────────────────────────────────────────

    /// Load a snapshot. A missing file yields an empty store.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No store snapshot at {}; starting empty", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| BlogError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let store: Self = serde_json::from_str(&content)?;
        debug!(
            blogs = store.blogs.len(),
            users = store.users.len(),
            comments = store.comments.len(),
            "store snapshot loaded"
        );
        Ok(store)
    }

    /// Atomically write a snapshot, creating parent directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    // ── Blogs ─────────────────────────────────────────────────────────────────

    /// All blogs in insertion order.
    pub fn blogs(&self) -> &[Blog] {
        &self.blogs
    }

    /// Aggregation view of every blog, in insertion order.
    pub fn records(&self) -> Vec<BlogRecord> {
        self.blogs.iter().map(Blog::to_record).collect()
    }

    pub fn get_blog(&self, id: &str) -> Result<Option<&Blog>> {
        let id = parse_id(id)?;
        Ok(self.blogs.iter().find(|b| b.id == id))
    }

    /// Insert a new blog, linking it to `user_id` when given.
    pub fn create_blog(&mut self, draft: BlogDraft, user_id: Option<&str>) -> Result<Blog> {
        validate_draft(&draft)?;

        let owner = match user_id {
            Some(uid) => {
                let uid = parse_id(uid)?;
                if !self.users.iter().any(|u| u.id == uid) {
                    return Err(BlogError::NotFound {
                        kind: "user",
                        id: uid,
                    });
                }
                Some(uid)
            }
            None => None,
        };

        let blog = Blog {
            id: new_id(),
            title: draft.title,
            author: draft.author,
            url: draft.url,
            likes: draft.likes,
            user: owner.clone(),
            comments: Vec::new(),
        };

        if let Some(uid) = owner {
            if let Some(user) = self.users.iter_mut().find(|u| u.id == uid) {
                user.blogs.push(blog.id.clone());
            }
        }

        self.blogs.push(blog.clone());
        Ok(blog)
    }

    /// Replace the editable fields of a blog. `None` when it does not exist.
    pub fn update_blog(&mut self, id: &str, draft: BlogDraft) -> Result<Option<Blog>> {
        validate_draft(&draft)?;
        let id = parse_id(id)?;

        let Some(blog) = self.blogs.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        blog.title = draft.title;
        blog.author = draft.author;
        blog.url = draft.url;
        blog.likes = draft.likes;
        Ok(Some(blog.clone()))
    }

    /// Remove a blog and its comments. Deleting a missing blog is not an error.
    pub fn delete_blog(&mut self, id: &str) -> Result<Option<Blog>> {
        let id = parse_id(id)?;

        let Some(pos) = self.blogs.iter().position(|b| b.id == id) else {
            return Ok(None);
        };
        let removed = self.blogs.remove(pos);

        if let Some(uid) = &removed.user {
            if let Some(user) = self.users.iter_mut().find(|u| &u.id == uid) {
                user.blogs.retain(|b| b != &removed.id);
            }
        }
        self.comments.retain(|c| c.blog != removed.id);

        Ok(Some(removed))
    }

    // ── Comments ──────────────────────────────────────────────────────────────

    /// Comments of one blog, oldest first.
    pub fn comments_for(&self, blog_id: &str) -> Result<Vec<&Comment>> {
        let blog = self
            .get_blog(blog_id)?
            .ok_or_else(|| BlogError::NotFound {
                kind: "blog",
                id: blog_id.to_string(),
            })?;
        Ok(self.comments.iter().filter(|c| c.blog == blog.id).collect())
    }

    pub fn add_comment(&mut self, blog_id: &str, content: &str) -> Result<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(BlogError::Validation("content missing".to_string()));
        }
        let id = parse_id(blog_id)?;
        let Some(blog) = self.blogs.iter_mut().find(|b| b.id == id) else {
            return Err(BlogError::NotFound { kind: "blog", id });
        };

        let comment = Comment {
            id: new_id(),
            content: content.to_string(),
            blog: blog.id.clone(),
        };
        blog.comments.push(comment.id.clone());
        self.comments.push(comment.clone());
        Ok(comment)
    }

    // ── Users ─────────────────────────────────────────────────────────────────

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Look up a user by canonical id. Unparsable ids simply do not match.
    pub fn get_user(&self, id: &str) -> Option<&User> {
        let id = parse_id(id).ok()?;
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Register a user. The password must already be hashed.
    pub fn create_user(&mut self, username: &str, name: &str, password_hash: String) -> Result<User> {
        let username = username.trim();
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(BlogError::Validation(format!(
                "username must be at least {MIN_USERNAME_LEN} characters long"
            )));
        }
        if self.find_user_by_username(username).is_some() {
            return Err(BlogError::Conflict("username must be unique".to_string()));
        }

        let user = User {
            id: new_id(),
            username: username.to_string(),
            name: name.to_string(),
            password_hash,
            blogs: Vec::new(),
        };
        self.users.push(user.clone());
        Ok(user)
    }
}

fn validate_draft(draft: &BlogDraft) -> Result<()> {
    if draft.title.trim().is_empty() || draft.url.trim().is_empty() {
        return Err(BlogError::Validation("title or url missing".to_string()));
    }
    if draft.likes > MAX_LIKES {
        return Err(BlogError::Validation(format!(
            "likes must be at most {MAX_LIKES}"
        )));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
