//! Collection sources and the async glue between a source and a view
//!
//! A [`CollectionSource`] loads a whole collection and performs deletes and
//! updates against the backend. A [`ViewHandle`] pairs one source with one
//! [`CollectionView`](crate::view::CollectionView): every successful mutation
//! is followed by a full reload, and overlapping reloads resolve to the most
//! recently requested one.

pub mod handle;
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "in-memory")]
pub mod in_memory;
pub mod registry;

use crate::core::record::Record;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use handle::{RefreshOutcome, ViewHandle};
#[cfg(feature = "http")]
pub use http::HttpSource;
#[cfg(feature = "in-memory")]
pub use in_memory::InMemorySource;
pub use registry::ViewRegistry;

/// Data-loading and mutation collaborator for one collection
///
/// Implementations are agnostic to how records are displayed; they only move
/// whole collections and single-record changes.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Collection name, used in logs and errors
    fn name(&self) -> &str;

    /// Load the entire collection
    async fn fetch(&self) -> Result<Vec<Record>>;

    /// Delete one record by id
    async fn delete(&self, id: &str) -> Result<()>;

    /// Apply a partial update to one record and return the stored result
    async fn update(&self, id: &str, patch: Value) -> Result<Record>;
}

/// Turn a decoded JSON array into records
///
/// Elements that are not objects are skipped with a warning so one bad entry
/// cannot blank the whole view.
pub fn records_from_values(collection: &str, values: Vec<Value>) -> Vec<Record> {
    let total = values.len();
    let records: Vec<Record> = values.into_iter().filter_map(Record::from_value).collect();
    let skipped = total - records.len();
    if skipped > 0 {
        tracing::warn!(collection = %collection, skipped, "skipping non-object entries");
    }
    records
}
