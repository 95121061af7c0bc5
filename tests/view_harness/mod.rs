//! Shared fixtures for collection view tests
//!
//! Provides record builders for the four ranch collections and a gated
//! source for exercising overlapping reloads.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod view_harness;
//! use view_harness::*;
//! ```

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use ranch_view::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

// ---------------------------------------------------------------------------
// Record builders
// ---------------------------------------------------------------------------

pub fn record(value: Value) -> Record {
    Record::from_value(value).expect("fixture must be a JSON object")
}

pub fn ranch(id: u32, name: &str, hectares: f64) -> Record {
    record(json!({
        "id": id,
        "name": name,
        "location": "Sonora",
        "owner": "Cooperativa Ganadera",
        "surfaceHectares": hectares,
        "status": "activo",
    }))
}

pub fn transaction(id: u32, amount: f64, kind: &str, date: &str) -> Record {
    record(json!({
        "id": id,
        "description": format!("movement {}", id),
        "category": "feed",
        "type": kind,
        "amount": amount,
        "date": date,
    }))
}

pub fn vaccination(id: u32, vaccine: &str, veterinarian: &str, status: &str, date: &str) -> Record {
    record(json!({
        "id": id,
        "animalId": format!("MX-{:04}", id),
        "vaccine": vaccine,
        "veterinarian": veterinarian,
        "status": status,
        "scheduledDate": date,
    }))
}

/// `count` events named `a 1`, `ab 2`, ... with a mix of searchable titles
pub fn events(count: u32) -> Vec<Record> {
    (1..=count)
        .map(|i| {
            let title = if i % 2 == 0 { format!("ab {}", i) } else { format!("a {}", i) };
            record(json!({
                "id": i,
                "title": title,
                "status": if i % 3 == 0 { "completed" } else { "scheduled" },
                "date": format!("2024-06-{:02}", (i % 28) + 1),
            }))
        })
        .collect()
}

pub fn ids(records: &[Record]) -> Vec<String> {
    records.iter().map(|r| r.text("id")).collect()
}

pub fn column(records: &[Record], field: &str) -> Vec<Value> {
    records
        .iter()
        .map(|r| r.get(field).cloned().unwrap_or(Value::Null))
        .collect()
}

// ---------------------------------------------------------------------------
// GatedSource: the first fetch blocks until released
// ---------------------------------------------------------------------------

/// Source whose first `fetch` parks until [`GatedSource::release`] is called.
///
/// The first fetch returns `first`, every later fetch returns `later`
/// immediately. `started` is notified when the first fetch begins.
pub struct GatedSource {
    pub first: Vec<Record>,
    pub later: Vec<Record>,
    pub calls: AtomicUsize,
    pub started: Notify,
    pub gate: Notify,
}

impl GatedSource {
    pub fn new(first: Vec<Record>, later: Vec<Record>) -> Arc<Self> {
        Arc::new(Self {
            first,
            later,
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            gate: Notify::new(),
        })
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl CollectionSource for GatedSource {
    fn name(&self) -> &str {
        "gated"
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.started.notify_one();
            self.gate.notified().await;
            return Ok(self.first.clone());
        }
        Ok(self.later.clone())
    }

    async fn delete(&self, _id: &str) -> Result<()> {
        Ok(())
    }

    async fn update(&self, id: &str, _patch: Value) -> Result<Record> {
        Err(anyhow!("read-only: {}", id))
    }
}

// ---------------------------------------------------------------------------
// FailingSource: every call fails
// ---------------------------------------------------------------------------

pub struct FailingSource;

#[async_trait]
impl CollectionSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        Err(anyhow!("503 Service Unavailable"))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        Err(anyhow!("cannot delete {}", id))
    }

    async fn update(&self, id: &str, _patch: Value) -> Result<Record> {
        Err(anyhow!("cannot update {}", id))
    }
}

// ---------------------------------------------------------------------------
// MalformedSource: fetch reports an undecodable payload
// ---------------------------------------------------------------------------

pub struct MalformedSource;

#[async_trait]
impl CollectionSource for MalformedSource {
    fn name(&self) -> &str {
        "malformed"
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        Err(SourceError::Decode {
            collection: "ranches".to_string(),
            message: "expected a sequence".to_string(),
        }
        .into())
    }

    async fn delete(&self, _id: &str) -> Result<()> {
        Ok(())
    }

    async fn update(&self, id: &str, _patch: Value) -> Result<Record> {
        Err(anyhow!("read-only: {}", id))
    }
}
