//! Core types for the blog list service.
//!
//! Holds the blog and user models, the shared error type, CLI settings and
//! the `list_helper` statistics used by every other crate.

pub mod error;
pub mod formatting;
pub mod list_helper;
pub mod models;
pub mod settings;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

pub use error::{BlogError, Result};
pub use models::BlogRecord;
