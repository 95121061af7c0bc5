//! Async handle tying a collection source to a collection view

use crate::core::error::{SourceError, ViewError};
use crate::core::events::{EventBus, EventEnvelope, ViewEvent};
use crate::core::record::Record;
use crate::source::CollectionSource;
use crate::view::CollectionView;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, broadcast};

/// What happened to a refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched collection was applied to the view
    Applied { count: usize },
    /// A newer refresh was requested while this one was in flight
    Stale { generation: u64 },
}

/// Shared handle over one view and its source
///
/// Cheap to clone; clones drive the same view. Each refresh takes a
/// generation ticket and its result is applied only if no newer refresh was
/// requested in the meantime, so the view always ends up showing the most
/// recently requested load.
#[derive(Clone)]
pub struct ViewHandle {
    name: String,
    source: Arc<dyn CollectionSource>,
    view: Arc<RwLock<CollectionView>>,
    generation: Arc<AtomicU64>,
    events: EventBus,
}

impl ViewHandle {
    pub fn new(source: impl CollectionSource + 'static, view: CollectionView) -> Self {
        Self::from_arc(Arc::new(source), view)
    }

    pub fn from_arc(source: Arc<dyn CollectionSource>, view: CollectionView) -> Self {
        Self {
            name: view.name().to_string(),
            source,
            view: Arc::new(RwLock::new(view)),
            generation: Arc::new(AtomicU64::new(0)),
            events: EventBus::default(),
        }
    }

    /// Publish events on a shared bus instead of a private one
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    /// Read access to the view
    pub async fn read(&self) -> RwLockReadGuard<'_, CollectionView> {
        self.view.read().await
    }

    /// Write access to the view, for setters (search, filters, sort, paging)
    pub async fn write(&self) -> RwLockWriteGuard<'_, CollectionView> {
        self.view.write().await
    }

    /// Latest generation ticket handed out
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Reload the whole collection from the source
    ///
    /// On failure the view keeps its data and records the error message.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ViewError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(collection = %self.name, generation = ticket, "refresh requested");

        let result = self.source.fetch().await;

        let mut view = self.view.write().await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(
                collection = %self.name,
                generation = ticket,
                "discarding stale refresh result"
            );
            self.events.publish(ViewEvent::StaleDiscarded {
                collection: self.name.clone(),
                generation: ticket,
            });
            return Ok(RefreshOutcome::Stale { generation: ticket });
        }

        match result {
            Ok(records) => {
                let count = records.len();
                view.replace_source(records);
                drop(view);

                tracing::info!(collection = %self.name, count, "collection reloaded");
                self.events.publish(ViewEvent::Reloaded {
                    collection: self.name.clone(),
                    count,
                });
                Ok(RefreshOutcome::Applied { count })
            }
            Err(e) => {
                let error = self.fetch_failed(e);
                let message = match &error {
                    SourceError::Fetch { message, .. } | SourceError::Decode { message, .. } => {
                        message.clone()
                    }
                    other => other.to_string(),
                };
                view.set_error(message.clone());
                drop(view);

                self.events.publish(ViewEvent::ReloadFailed {
                    collection: self.name.clone(),
                    message,
                });
                Err(error.into())
            }
        }
    }

    /// Delete a record, then reload the collection
    pub async fn delete(&self, id: &str) -> Result<RefreshOutcome, ViewError> {
        if let Err(e) = self.source.delete(id).await {
            return Err(self.mutation_failed("delete", id, e).await);
        }

        self.view.write().await.deselect(id);
        self.events.publish(ViewEvent::Deleted {
            collection: self.name.clone(),
            id: id.to_string(),
        });
        self.refresh().await
    }

    /// Update a record, then reload the collection
    pub async fn update(&self, id: &str, patch: Value) -> Result<Record, ViewError> {
        let record = match self.source.update(id, patch).await {
            Ok(record) => record,
            Err(e) => return Err(self.mutation_failed("update", id, e).await),
        };

        self.events.publish(ViewEvent::Updated {
            collection: self.name.clone(),
            id: id.to_string(),
        });
        self.refresh().await?;
        Ok(record)
    }

    /// Typed source errors (e.g. a malformed payload) pass through as is
    fn fetch_failed(&self, error: anyhow::Error) -> SourceError {
        match error.downcast::<SourceError>() {
            Ok(typed) => typed,
            Err(error) => SourceError::Fetch {
                collection: self.name.clone(),
                message: format!("{:#}", error),
            },
        }
    }

    async fn mutation_failed(&self, operation: &str, id: &str, error: anyhow::Error) -> ViewError {
        let message = format!("{:#}", error);
        self.view.write().await.set_error(message.clone());
        self.events.publish(ViewEvent::MutationFailed {
            collection: self.name.clone(),
            id: id.to_string(),
            message: message.clone(),
        });

        SourceError::Mutation {
            collection: self.name.clone(),
            operation: operation.to_string(),
            id: id.to_string(),
            message,
        }
        .into()
    }
}
