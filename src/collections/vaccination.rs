//! Vaccination schedule entries

use crate::config::CollectionConfig;
use crate::core::filter::FilterBinding;
use crate::core::sort::{SortConfig, SortType};

pub const NAME: &str = "vaccinations";

pub fn config() -> CollectionConfig {
    CollectionConfig::new(NAME)
        .with_endpoint("vaccinations/schedule")
        .with_search_fields(["animalId", "vaccine", "veterinarian"])
        .with_filter(FilterBinding::equals("status", "status"))
        .with_filter(FilterBinding::contains("veterinarian", "veterinarian"))
        .with_filter(FilterBinding::contains("vaccine", "vaccine"))
        .with_filter(FilterBinding::date_from("dateFrom", "scheduledDate"))
        .with_filter(FilterBinding::date_to("dateTo", "scheduledDate"))
        .with_sort_type("scheduledDate", SortType::Date)
        .with_default_sort(SortConfig::asc("scheduledDate"))
}
