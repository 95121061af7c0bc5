//! Core module containing the building blocks of the collection view pipeline

pub mod error;
pub mod events;
pub mod filter;
pub mod pager;
pub mod query;
pub mod record;
pub mod search;
pub mod sort;

pub use error::{ConfigError, QueryError, SourceError, ViewError};
pub use events::{EventBus, EventEnvelope, ViewEvent};
pub use filter::{FilterBinding, FilterKind, FilterState, PredicateBuilder, RecordPredicate};
pub use pager::{PageState, PaginationMeta};
pub use query::QueryParams;
pub use record::Record;
pub use search::SearchMatcher;
pub use sort::{Comparator, SortConfig, SortDirection, SortType};
