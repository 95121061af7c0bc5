//! In-memory collection source for testing and development

use crate::core::record::Record;
use crate::source::CollectionSource;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory collection source
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Clones share the same records.
#[derive(Clone)]
pub struct InMemorySource {
    name: String,
    id_field: String,
    records: Arc<RwLock<Vec<Record>>>,
}

impl InMemorySource {
    /// Create an empty source keyed by `id`
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_records(name, Vec::new())
    }

    pub fn with_records(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            id_field: "id".to_string(),
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    /// Add a record, assigning a UUID v4 id when it has none
    pub fn insert(&self, mut record: Record) -> Result<Record> {
        if record.id(&self.id_field).is_none() {
            record.set(self.id_field.clone(), Value::String(Uuid::new_v4().to_string()));
        }

        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        records.push(record.clone());

        Ok(record)
    }

    /// Replace every record
    pub fn replace_all(&self, new_records: Vec<Record>) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        *records = new_records;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CollectionSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let before = records.len();
        records.retain(|r| r.id(&self.id_field).as_deref() != Some(id));
        if records.len() == before {
            return Err(anyhow!("{} '{}' not found", self.name, id));
        }

        Ok(())
    }

    async fn update(&self, id: &str, patch: Value) -> Result<Record> {
        let patch = patch
            .as_object()
            .ok_or_else(|| anyhow!("Update patch must be a JSON object"))?;

        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let record = records
            .iter_mut()
            .find(|r| r.id(&self.id_field).as_deref() == Some(id))
            .ok_or_else(|| anyhow!("{} '{}' not found", self.name, id))?;

        // The id is not patchable
        let original_id = record.get(&self.id_field).cloned();
        record.merge(patch);
        if let Some(id_value) = original_id {
            record.set(self.id_field.clone(), id_value);
        }

        Ok(record.clone())
    }
}
