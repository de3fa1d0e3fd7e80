//! State management module
//!
//! Handles the poll cursor and the dedup set of already-notified
//! transactions. Both are persisted between runs so a restart neither
//! re-notifies nor skips transfers.
//!
//! # Overview
//!
//! The state module provides:
//! - `ProcessedSet` - Insertion-ordered set of transaction hashes with pruning
//! - `StateStore` - File-based persistence with atomic writes

mod store;
mod types;

pub use store::{StateStore, CURSOR_FILE, PROCESSED_FILE};
pub use types::{CursorDocument, ProcessedSet};
