//! Data layer for the blog list service.
//!
//! Reads blog records from JSON / JSONL files, summarises them into
//! statistics reports and keeps the in-memory document store used by the
//! REST API.

pub mod aggregator;
pub mod reader;
pub mod store;

pub use bloglist_core as core;
