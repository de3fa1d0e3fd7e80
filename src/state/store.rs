//! State store implementation
//!
//! Provides file-based state persistence with atomic writes.

use super::types::{CursorDocument, ProcessedSet};
use crate::error::{Error, Result};
use crate::types::Cursor;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File holding the cursor document
pub const CURSOR_FILE: &str = "state.json";

/// File holding the processed transaction hashes
pub const PROCESSED_FILE: &str = "processed_txs.json";

/// Store for the cursor and the processed set
///
/// Single writer only. Each document is written to a temp sibling and
/// renamed over the target, so a crash leaves either the old or the new
/// contents on disk.
#[derive(Debug, Clone)]
pub struct StateStore {
    cursor_path: PathBuf,
    processed_path: PathBuf,
}

impl StateStore {
    /// Create a store keeping both files in `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            cursor_path: dir.join(CURSOR_FILE),
            processed_path: dir.join(PROCESSED_FILE),
        }
    }

    pub fn cursor_path(&self) -> &Path {
        &self.cursor_path
    }

    pub fn processed_path(&self) -> &Path {
        &self.processed_path
    }

    /// Load the persisted cursor
    ///
    /// Returns `None` when there is no prior state or the file is corrupt.
    pub async fn load_cursor(&self) -> Option<Cursor> {
        read_document::<CursorDocument>(&self.cursor_path)
            .await
            .map(|doc| doc.last_polled_time)
    }

    /// Persist the cursor, replacing the previous value
    pub async fn save_cursor(&self, cursor: Cursor) -> Result<()> {
        let doc = CursorDocument {
            last_polled_time: cursor,
        };
        write_atomic(&self.cursor_path, &doc).await
    }

    /// Load the processed set, empty when absent or corrupt
    pub async fn load_processed(&self) -> ProcessedSet {
        read_document::<ProcessedSet>(&self.processed_path)
            .await
            .unwrap_or_default()
    }

    /// Persist the full processed set, replacing prior contents
    pub async fn save_processed(&self, processed: &ProcessedSet) -> Result<()> {
        write_atomic(&self.processed_path, processed).await
    }

    /// Delete both state files
    pub async fn clear(&self) -> Result<()> {
        for path in [&self.cursor_path, &self.processed_path] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(Error::state(format!(
                        "Failed to remove {}: {e}",
                        path.display()
                    )))
                }
            }
        }
        Ok(())
    }
}

/// Read and parse a JSON document, swallowing any failure
async fn read_document<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Ignoring unreadable state file {}: {e}", path.display());
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!("Ignoring corrupt state file {}: {e}", path.display());
            None
        }
    }
}

/// Write to a temp file first, then rename for atomicity
async fn write_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string(value)
        .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))?;

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &contents)
        .await
        .map_err(|e| Error::state(format!("Failed to write {}: {e}", temp_path.display())))?;

    tokio::fs::rename(&temp_path, path)
        .await
        .map_err(|e| Error::state(format!("Failed to rename {}: {e}", path.display())))?;

    Ok(())
}
