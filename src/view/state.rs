//! Serializable view state and the derived view

use crate::config::CollectionConfig;
use crate::core::filter::FilterState;
use crate::core::pager::{PageState, PaginationMeta};
use crate::core::record::Record;
use crate::core::sort::SortConfig;
use serde::{Deserialize, Serialize};

/// Everything the user controls in a collection view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub filters: FilterState,
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub sort: Option<SortConfig>,
    #[serde(default)]
    pub page: PageState,
}

impl ViewState {
    /// Initial state for a collection: no filters, default sort, page 1
    pub fn for_collection(config: &CollectionConfig) -> Self {
        Self {
            filters: FilterState::new(),
            search_term: String::new(),
            sort: config.default_sort.clone(),
            page: PageState::new(config.items_per_page),
        }
    }
}

/// Output of the pipeline, rebuilt on every recompute
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedView {
    /// Every matching record, in sorted order
    pub filtered: Vec<Record>,
    /// The slice of `filtered` on the current page
    pub paged: Vec<Record>,
    pub meta: PaginationMeta,
}
