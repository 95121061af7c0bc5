//! Calendar events (roundups, inspections, sales)

use crate::config::CollectionConfig;
use crate::core::filter::FilterBinding;
use crate::core::sort::{SortConfig, SortType};

pub const NAME: &str = "events";

pub fn config() -> CollectionConfig {
    CollectionConfig::new(NAME)
        .with_search_fields(["title", "description", "location"])
        .with_filter(FilterBinding::equals("status", "status"))
        .with_filter(FilterBinding::equals("eventType", "eventType"))
        .with_filter(FilterBinding::contains("location", "location"))
        .with_filter(FilterBinding::date_from("dateFrom", "date"))
        .with_filter(FilterBinding::date_to("dateTo", "date"))
        .with_sort_type("date", SortType::Date)
        .with_default_sort(SortConfig::asc("date"))
}
