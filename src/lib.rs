//! # ranch-view
//!
//! Collection view pipeline for ranch management frontends: load a collection,
//! search it, filter it, sort it and page through it.
//!
//! ## Features
//!
//! - **Predicate builder**: filter keys bound to record fields (equality,
//!   substring, numeric and date ranges); blank and `"all"` values are ignored
//! - **Search**: case-insensitive substring match over configured fields
//! - **Type-aware sorting**: string, number and date keys, stable, with a total
//!   order even for invalid dates
//! - **Pagination**: clamped page navigation and pagination metadata
//! - **Orchestrator**: [`CollectionView`](view::CollectionView) keeps the
//!   derived view consistent with the latest state after every change
//! - **Sources**: in-memory and REST (`http` feature) collection sources, with
//!   reload-after-mutation and stale reload protection
//! - **Configuration**: YAML-described collections plus built-in presets for
//!   ranches, transactions, events and vaccinations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ranch_view::prelude::*;
//!
//! let source = InMemorySource::with_records("ranches", records);
//! let view = CollectionView::new(collections::ranch::config())?;
//! let handle = ViewHandle::new(source, view);
//! handle.refresh().await?;
//!
//! let mut view = handle.write().await;
//! view.set_search_term("norte");
//! view.set_filter("superficie_min", json!(60));
//! view.set_sort("surfaceHectares");
//! for ranch in view.paged_records() {
//!     println!("{}", ranch.text("name"));
//! }
//! ```

pub mod collections;
pub mod config;
pub mod core;
pub mod source;
pub mod telemetry;
pub mod view;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ConfigError, ErrorReport, QueryError, SourceError, ViewError},
        events::{EventBus, EventEnvelope, ViewEvent},
        filter::{FilterBinding, FilterKind, FilterState, PredicateBuilder, RecordPredicate},
        pager::{PageState, PaginationMeta},
        query::QueryParams,
        record::Record,
        search::SearchMatcher,
        sort::{Comparator, SortConfig, SortDirection, SortType},
    };

    // === Views ===
    pub use crate::view::{CollectionView, DerivedView, ViewState, filter_and_sort};

    // === Sources ===
    #[cfg(feature = "http")]
    pub use crate::source::HttpSource;
    #[cfg(feature = "in-memory")]
    pub use crate::source::InMemorySource;
    pub use crate::source::{CollectionSource, RefreshOutcome, ViewHandle, ViewRegistry};

    // === Config ===
    pub use crate::collections;
    pub use crate::config::{CollectionConfig, ViewsConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};
}
