//! Registry of view handles, one per collection

use crate::core::error::{ConfigError, ViewError};
use crate::core::events::EventBus;
use crate::source::handle::{RefreshOutcome, ViewHandle};
use futures::future::join_all;
use indexmap::IndexMap;

/// All collection views of an application, keyed by collection name
///
/// Handles registered here share one event bus.
#[derive(Clone, Default)]
pub struct ViewRegistry {
    handles: IndexMap<String, ViewHandle>,
    events: EventBus,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle, replacing any previous handle with the same name
    pub fn register(&mut self, handle: ViewHandle) -> &ViewHandle {
        let handle = handle.with_event_bus(self.events.clone());
        let name = handle.name().to_string();
        self.handles.insert(name.clone(), handle);
        &self.handles[&name]
    }

    pub fn get(&self, name: &str) -> Result<&ViewHandle, ViewError> {
        self.handles.get(name).ok_or_else(|| {
            ConfigError::UnknownCollection {
                name: name.to_string(),
            }
            .into()
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Refresh every registered view concurrently
    ///
    /// One failing collection does not stop the others; results come back in
    /// registration order.
    pub async fn refresh_all(&self) -> Vec<(String, Result<RefreshOutcome, ViewError>)> {
        let refreshes = self.handles.iter().map(|(name, handle)| async move {
            (name.clone(), handle.refresh().await)
        });
        join_all(refreshes).await
    }
}
