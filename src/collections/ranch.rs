//! Ranch directory: name, location, owner, surface and head count

use crate::config::CollectionConfig;
use crate::core::filter::FilterBinding;
use crate::core::sort::{SortConfig, SortType};

pub const NAME: &str = "ranches";

pub fn config() -> CollectionConfig {
    CollectionConfig::new(NAME)
        .with_search_fields(["name", "location", "owner"])
        .with_filter(FilterBinding::min("superficie_min", "surfaceHectares"))
        .with_filter(FilterBinding::max("superficie_max", "surfaceHectares"))
        .with_filter(FilterBinding::equals("estado", "status"))
        .with_filter(FilterBinding::contains("ubicacion", "location"))
        .with_sort_type("surfaceHectares", SortType::Number)
        .with_sort_type("cattleCount", SortType::Number)
        .with_sort_type("createdAt", SortType::Date)
        .with_default_sort(SortConfig::asc("name"))
}
