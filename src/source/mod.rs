//! Transfer source module
//!
//! Incremental range reads against the transfers table.
//!
//! # Overview
//!
//! The source module provides:
//! - `TransferSource` - Trait for "rows created at or after T, oldest first, at most N"
//! - `SupabaseSource` - PostgREST implementation over the shared HTTP client

mod supabase;

pub use supabase::{SupabaseConfig, SupabaseSource};

use crate::error::Result;
use crate::types::{Cursor, TransferRecord};
use async_trait::async_trait;

/// Source of newly inserted transfer rows
#[async_trait]
pub trait TransferSource: Send + Sync {
    /// Fetch rows with `created_at >= cursor`, ascending, capped at `limit`
    ///
    /// An empty range is `Ok(vec![])`. Query failures are
    /// `Error::SourceUnavailable`.
    async fn fetch_since(&self, cursor: Cursor, limit: usize) -> Result<Vec<TransferRecord>>;
}

#[cfg(test)]
mod tests;
