//! Income and expense transactions

use crate::config::CollectionConfig;
use crate::core::filter::FilterBinding;
use crate::core::sort::{SortConfig, SortType};

pub const NAME: &str = "transactions";

pub fn config() -> CollectionConfig {
    CollectionConfig::new(NAME)
        .with_endpoint("finance/transactions")
        .with_search_fields(["description", "category", "reference"])
        .with_filter(FilterBinding::equals("type", "type"))
        .with_filter(FilterBinding::equals("category", "category"))
        .with_filter(FilterBinding::min("amountMin", "amount"))
        .with_filter(FilterBinding::max("amountMax", "amount"))
        .with_filter(FilterBinding::date_from("dateFrom", "date"))
        .with_filter(FilterBinding::date_to("dateTo", "date"))
        .with_sort_type("amount", SortType::Number)
        .with_sort_type("date", SortType::Date)
        .with_default_sort(SortConfig::desc("date"))
}
