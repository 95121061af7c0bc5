//! Ready-made configurations for the ranch management collections

pub mod event;
pub mod finance;
pub mod ranch;
pub mod vaccination;

use crate::config::CollectionConfig;

/// All built-in collection configurations
pub fn all() -> Vec<CollectionConfig> {
    vec![
        ranch::config(),
        finance::config(),
        event::config(),
        vaccination::config(),
    ]
}
