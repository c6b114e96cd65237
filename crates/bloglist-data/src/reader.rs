//! Blog data file discovery and loading.
//!
//! Accepts a single `.json` file (an array of blogs, or a store snapshot with
//! a `blogs` array), a `.jsonl` file with one blog per line, or a directory
//! searched recursively for both kinds. Every record is validated on the way
//! in; the first malformed record aborts the load.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use bloglist_core::error::{BlogError, Result};
use bloglist_core::models::{parse_records, BlogRecord};
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` and `.jsonl` files recursively under `dir`, sorted by path.
pub fn find_data_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_data_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every blog record found at `path`, preserving file and line order.
pub fn load_blog_records(path: &Path) -> Result<Vec<BlogRecord>> {
    if !path.exists() {
        return Err(BlogError::DataPathNotFound(path.to_path_buf()));
    }

    if path.is_file() {
        return load_file(path);
    }

    let files = find_data_files(path);
    if files.is_empty() {
        return Err(BlogError::NoDataFiles(path.to_path_buf()));
    }

    let mut records = Vec::new();
    for file in &files {
        records.extend(load_file(file)?);
    }

    debug!(
        "Loaded {} blog records from {} files",
        records.len(),
        files.len()
    );

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn is_data_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("json") | Some("jsonl")
    )
}

fn load_file(path: &Path) -> Result<Vec<BlogRecord>> {
    let is_jsonl = path.extension().and_then(|e| e.to_str()) == Some("jsonl");
    let records = if is_jsonl {
        load_jsonl_file(path)?
    } else {
        load_json_file(path)?
    };
    debug!("File {}: {} records", path.display(), records.len());
    Ok(records)
}

fn load_json_file(path: &Path) -> Result<Vec<BlogRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| BlogError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let value: serde_json::Value = serde_json::from_str(&content)?;
    let values = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut doc) => match doc.remove("blogs") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(BlogError::Validation(format!(
                    "{}: expected a `blogs` array",
                    path.display()
                )))
            }
        },
        _ => {
            return Err(BlogError::Validation(format!(
                "{}: expected an array of blogs",
                path.display()
            )))
        }
    };

    parse_records(values).map_err(|e| with_file_context(e, path))
}

fn load_jsonl_file(path: &Path) -> Result<Vec<BlogRecord>> {
    let file = std::fs::File::open(path).map_err(|source| BlogError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let reader = std::io::BufReader::new(file);
    let mut records = Vec::new();

    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| BlogError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let index = records.len();
        let value: serde_json::Value =
            serde_json::from_str(trimmed).map_err(|e| BlogError::MalformedRecord {
                index,
                reason: format!("{} line {}: {}", path.display(), line_no + 1, e),
            })?;
        let record = BlogRecord::from_value(index, value).map_err(|e| match e {
            BlogError::MalformedRecord { index, reason } => BlogError::MalformedRecord {
                index,
                reason: format!("{} line {}: {}", path.display(), line_no + 1, reason),
            },
            other => other,
        })?;
        records.push(record);
    }

    Ok(records)
}

fn with_file_context(err: BlogError, path: &Path) -> BlogError {
    match err {
        BlogError::MalformedRecord { index, reason } => BlogError::MalformedRecord {
            index,
            reason: format!("{}: {}", path.display(), reason),
        },
        other => other,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
