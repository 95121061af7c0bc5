//! Query parameters for deep-linking a collection view
//!
//! A view's state can be written to and restored from URL-style parameters,
//! so a filtered, sorted page can be bookmarked or shared.
//!
//! # Example
//! ```text
//! ?page=2&limit=10
//! ?search=norte&filter={"estado": "activo", "superficie_min": 60}
//! ?page=1&limit=20&filter={"amountMin": 100}&sort=date:desc
//! ```

use crate::core::error::QueryError;
use crate::core::filter::FilterState;
use crate::core::pager::{DEFAULT_ITEMS_PER_PAGE, PageState};
use crate::core::sort::SortConfig;
use crate::view::ViewState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Largest page size a query may request
pub const MAX_LIMIT: usize = 100;

/// Query parameters for pagination, search, filtering and sorting
///
/// All parameters have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Free-text search term
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Filters as a JSON object keyed by filter key
    ///
    /// # Format
    /// ```text
    /// filter={"status": "scheduled", "amountMin": 100, "dateFrom": "2024-01-01"}
    /// ```
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Sort field and direction
    ///
    /// # Format
    /// - `field:asc` or `field` (ascending)
    /// - `field:desc` (descending)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_ITEMS_PER_PAGE,
            search: None,
            filter: None,
            sort: None,
        }
    }
}

impl QueryParams {
    /// Build from decoded key/value pairs; unknown keys are ignored
    ///
    /// Unparsable `page`/`limit` values keep their defaults.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key {
                "page" => {
                    if let Ok(page) = value.trim().parse() {
                        params.page = page;
                    }
                }
                "limit" => {
                    if let Ok(limit) = value.trim().parse() {
                        params.limit = limit;
                    }
                }
                "search" => params.search = Some(value.to_string()),
                "filter" => params.filter = Some(value.to_string()),
                "sort" => params.sort = Some(value.to_string()),
                _ => {}
            }
        }
        params
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, ensuring it stays within `1..=MAX_LIMIT`
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }

    /// Parse filter JSON string into Value, dropping anything malformed
    pub fn filter_value(&self) -> Option<Value> {
        self.filter
            .as_ref()
            .and_then(|s| serde_json::from_str(s).ok())
    }

    /// Strict variant of [`QueryParams::filter_value`]
    pub fn filter_state(&self) -> Result<FilterState, QueryError> {
        let Some(raw) = self.filter.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(FilterState::new());
        };

        let value: Value = serde_json::from_str(raw).map_err(|e| QueryError::InvalidFilter {
            message: e.to_string(),
        })?;

        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(QueryError::InvalidFilter {
                message: format!("expected a JSON object, got {}", other),
            }),
        }
    }

    /// Parse the sort expression, if any
    pub fn sort_config(&self) -> Result<Option<SortConfig>, QueryError> {
        match self.sort.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(expression) => SortConfig::parse(expression).map(Some),
        }
    }

    /// Turn these parameters into a view state
    pub fn to_view_state(&self) -> Result<ViewState, QueryError> {
        Ok(ViewState {
            filters: self.filter_state()?,
            search_term: self.search.clone().unwrap_or_default(),
            sort: self.sort_config()?,
            page: PageState {
                current_page: self.page(),
                items_per_page: self.limit(),
            },
        })
    }

    /// Capture a view state as query parameters
    ///
    /// The page size is capped at [`MAX_LIMIT`], the same cap
    /// [`QueryParams::limit`] applies when the parameters are read back.
    pub fn from_view_state(state: &ViewState) -> Self {
        let filter = if state.filters.is_empty() {
            None
        } else {
            serde_json::to_string(&state.filters).ok()
        };
        let search = Some(state.search_term.clone()).filter(|s| !s.is_empty());

        Self {
            page: state.page.current_page.max(1),
            limit: state.page.items_per_page.clamp(1, MAX_LIMIT),
            search,
            filter,
            sort: state.sort.as_ref().map(SortConfig::to_string),
        }
    }
}
