//! The collection view controller
//!
//! [`CollectionView`] owns the source records, the [`ViewState`] and the
//! [`DerivedView`]. Every mutator recomputes what it invalidates before
//! returning, so reads always see a view consistent with the latest state.
//!
//! Page policy, applied uniformly:
//! - a new search term, a filter change or new source data resets to page 1;
//! - a sort or page-size change keeps the current page;
//! - after any recompute the page is clamped into `[1, max(total_pages, 1)]`.

use crate::config::CollectionConfig;
use crate::core::error::{ConfigError, ViewError};
use crate::core::filter::PredicateBuilder;
use crate::core::pager::{PaginationMeta, total_pages};
use crate::core::record::Record;
use crate::core::search::SearchMatcher;
use crate::core::sort::{Comparator, SortConfig};
use crate::view::state::{DerivedView, ViewState};
use indexmap::IndexSet;
use serde_json::Value;
use std::collections::HashSet;

/// Run search, filters and sort over `source`
///
/// Pure: the source is never mutated and the same inputs always give the
/// same output.
pub fn filter_and_sort(
    config: &CollectionConfig,
    source: &[Record],
    state: &ViewState,
) -> Vec<Record> {
    let matcher = SearchMatcher::new(config.search_fields.iter().cloned());
    let search = matcher.query(&state.search_term);
    let predicate = PredicateBuilder::new(&config.filters).build(&state.filters);

    let mut filtered: Vec<Record> = source
        .iter()
        .filter(|record| search.matches(record) && predicate.matches(record))
        .cloned()
        .collect();

    if let Some(sort) = &state.sort {
        Comparator::new(sort, config.sort_type(&sort.key)).sort(&mut filtered);
    }

    filtered
}

/// A collection view: source data, user state and the derived output
#[derive(Debug, Clone)]
pub struct CollectionView {
    config: CollectionConfig,
    source: Vec<Record>,
    state: ViewState,
    derived: DerivedView,
    selection: IndexSet<String>,
    error: Option<String>,
}

impl CollectionView {
    /// Create an empty view
    pub fn new(config: CollectionConfig) -> Result<Self, ViewError> {
        config.validate()?;
        let state = ViewState::for_collection(&config);
        let mut view = Self {
            config,
            source: Vec::new(),
            state,
            derived: DerivedView::default(),
            selection: IndexSet::new(),
            error: None,
        };
        view.refilter();
        Ok(view)
    }

    /// Create a view over already-loaded records
    pub fn with_records(config: CollectionConfig, records: Vec<Record>) -> Result<Self, ViewError> {
        let mut view = Self::new(config)?;
        view.replace_source(records);
        Ok(view)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn source_records(&self) -> &[Record] {
        &self.source
    }

    // === Derived output ===

    /// Every record matching the current search and filters, sorted
    pub fn filtered_records(&self) -> &[Record] {
        &self.derived.filtered
    }

    /// Records on the current page
    pub fn paged_records(&self) -> &[Record] {
        &self.derived.paged
    }

    pub fn derived(&self) -> &DerivedView {
        &self.derived
    }

    pub fn meta(&self) -> &PaginationMeta {
        &self.derived.meta
    }

    pub fn total_pages(&self) -> usize {
        self.derived.meta.total_pages
    }

    pub fn current_page(&self) -> usize {
        self.state.page.current_page
    }

    /// Last load or mutation error, shown next to the last good data
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sum of a numeric field over the filtered records
    ///
    /// Records where the field is missing or not numeric are skipped.
    pub fn sum(&self, field: &str) -> f64 {
        self.derived
            .filtered
            .iter()
            .filter_map(|r| r.number(field))
            .filter(|n| n.is_finite())
            .sum()
    }

    /// Look up a source record by id
    pub fn find(&self, id: &str) -> Option<&Record> {
        let id_field = &self.config.id_field;
        self.source
            .iter()
            .find(|r| r.id(id_field).as_deref() == Some(id))
    }

    // === Mutators: search and filters (reset to page 1) ===

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.state.search_term {
            return;
        }
        self.state.search_term = term;
        self.state.page.reset();
        self.refilter();
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: Value) {
        if self.state.filters.set(key, value) {
            self.state.page.reset();
            self.refilter();
        }
    }

    pub fn clear_filter(&mut self, key: &str) {
        if self.state.filters.remove(key) {
            self.state.page.reset();
            self.refilter();
        }
    }

    /// Drop every filter and the search term
    pub fn clear_filters(&mut self) {
        if self.state.filters.is_empty() && self.state.search_term.is_empty() {
            return;
        }
        self.state.filters.clear();
        self.state.search_term.clear();
        self.state.page.reset();
        self.refilter();
    }

    // === Mutators: sort and page size (keep the page) ===

    /// Header-click sort: a new key starts ascending, the same key flips direction
    pub fn set_sort(&mut self, key: &str) {
        let next = SortConfig::toggle(self.state.sort.as_ref(), key);
        self.set_sort_config(Some(next));
    }

    pub fn set_sort_config(&mut self, sort: Option<SortConfig>) {
        if self.state.sort == sort {
            return;
        }
        self.state.sort = sort;
        self.refilter();
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) -> Result<(), ViewError> {
        if items_per_page == 0 {
            return Err(ConfigError::InvalidPageSize {
                collection: self.config.name.clone(),
            }
            .into());
        }
        self.state.page.items_per_page = items_per_page;
        self.repage();
        Ok(())
    }

    // === Mutators: page navigation ===

    /// Jump to a page, clamped to the available pages
    pub fn set_page(&mut self, page: usize) {
        let total = self.total_pages();
        self.state.page.go_to(page, total);
        self.repage();
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.state.page.next(self.total_pages());
        if moved {
            self.repage();
        }
        moved
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.state.page.previous();
        if moved {
            self.repage();
        }
        moved
    }

    // === Mutators: whole state and source ===

    /// Replace the whole view state (e.g. restored from query parameters)
    ///
    /// The requested page is kept, clamped to the available pages.
    pub fn apply_state(&mut self, state: ViewState) -> Result<(), ViewError> {
        if state.page.items_per_page == 0 {
            return Err(ConfigError::InvalidPageSize {
                collection: self.config.name.clone(),
            }
            .into());
        }
        self.state = state;
        self.refilter();
        Ok(())
    }

    /// Swap in a freshly loaded collection
    ///
    /// Resets to page 1, clears the error and drops selected ids that no
    /// longer exist.
    pub fn replace_source(&mut self, records: Vec<Record>) {
        self.warn_on_duplicate_ids(&records);
        self.source = records;
        self.error = None;

        let id_field = &self.config.id_field;
        let present: HashSet<String> = self.source.iter().filter_map(|r| r.id(id_field)).collect();
        self.selection.retain(|id| present.contains(id));

        self.state.page.reset();
        self.refilter();
    }

    /// Apply the outcome of a reload
    ///
    /// On failure the previous source and derived view stay untouched and the
    /// message is kept for display.
    pub fn apply_reload<E: std::fmt::Display>(&mut self, result: Result<Vec<Record>, E>) {
        match result {
            Ok(records) => self.replace_source(records),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(collection = %self.config.name, error = %message, "collection view error");
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // === Selection ===

    /// Select a record by id; ids not in the source are ignored
    pub fn select(&mut self, id: &str) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.selection.insert(id.to_string())
    }

    pub fn deselect(&mut self, id: &str) -> bool {
        self.selection.shift_remove(id)
    }

    /// Flip the selection of one record; returns whether it is now selected
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if self.deselect(id) {
            false
        } else {
            self.select(id)
        }
    }

    /// Select every record on the current page
    pub fn select_page(&mut self) {
        let id_field = &self.config.id_field;
        let ids: Vec<String> = self
            .derived
            .paged
            .iter()
            .filter_map(|r| r.id(id_field))
            .collect();
        self.selection.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Selected ids in selection order
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.selection.iter().map(String::as_str)
    }

    // === Recompute ===

    fn refilter(&mut self) {
        self.derived.filtered = filter_and_sort(&self.config, &self.source, &self.state);
        self.repage();
    }

    fn repage(&mut self) {
        let total = self.derived.filtered.len();
        let pages = total_pages(total, self.state.page.items_per_page);
        let requested = self.state.page.current_page;
        self.state.page.go_to(requested, pages);

        self.derived.paged = self.state.page.slice(&self.derived.filtered).to_vec();
        self.derived.meta = PaginationMeta::new(
            self.state.page.current_page,
            self.state.page.items_per_page,
            total,
        );

        tracing::debug!(
            collection = %self.config.name,
            total,
            page = self.state.page.current_page,
            pages,
            "view recomputed"
        );
    }

    fn warn_on_duplicate_ids(&self, records: &[Record]) {
        let id_field = &self.config.id_field;
        let mut seen = HashSet::new();
        let mut missing = 0usize;
        for record in records {
            match record.id(id_field) {
                Some(id) => {
                    if !seen.insert(id.clone()) {
                        tracing::warn!(
                            collection = %self.config.name,
                            id = %id,
                            "duplicate record id"
                        );
                    }
                }
                None => missing += 1,
            }
        }
        if missing > 0 {
            tracing::warn!(
                collection = %self.config.name,
                missing,
                id_field = %id_field,
                "records without an id"
            );
        }
    }
}
