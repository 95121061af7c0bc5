//! Configuration loading and management

use crate::collections;
use crate::core::error::ConfigError;
use crate::core::filter::FilterBinding;
use crate::core::pager::DEFAULT_ITEMS_PER_PAGE;
use crate::core::sort::{SortConfig, SortType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

fn default_id_field() -> String {
    "id".to_string()
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

/// Configuration for one collection view
///
/// # Example (YAML)
/// ```yaml
/// name: transactions
/// endpoint: finance/transactions
/// search_fields: [description, category]
/// filters:
///   - { key: amountMin, field: amount, kind: min }
///   - { key: type, field: type, kind: equals }
/// sort_types:
///   amount: number
///   date: date
/// default_sort: { key: date, direction: desc }
/// items_per_page: 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Collection name (e.g. "ranches")
    pub name: String,

    /// REST endpoint relative to the API base; defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Field holding the unique record identifier
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Fields searched by the free-text box, in order
    #[serde(default)]
    pub search_fields: Vec<String>,

    /// Filter key bindings
    #[serde(default)]
    pub filters: Vec<FilterBinding>,

    /// Comparison type per sort key; unlisted keys sort as strings
    #[serde(default)]
    pub sort_types: IndexMap<String, SortType>,

    /// Sort applied when the view is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortConfig>,

    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

impl CollectionConfig {
    /// Minimal configuration: `id` field, no search fields, no filters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: None,
            id_field: default_id_field(),
            search_fields: Vec::new(),
            filters: Vec::new(),
            sort_types: IndexMap::new(),
            default_sort: None,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, binding: FilterBinding) -> Self {
        self.filters.push(binding);
        self
    }

    pub fn with_sort_type(mut self, key: impl Into<String>, sort_type: SortType) -> Self {
        self.sort_types.insert(key.into(), sort_type);
        self
    }

    pub fn with_default_sort(mut self, sort: SortConfig) -> Self {
        self.default_sort = Some(sort);
        self
    }

    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    /// Endpoint path for this collection
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(&self.name)
    }

    /// Comparison type for a sort key
    pub fn sort_type(&self, key: &str) -> SortType {
        self.sort_types.get(key).copied().unwrap_or_default()
    }

    /// Check the invariants the pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items_per_page == 0 {
            return Err(ConfigError::InvalidPageSize {
                collection: self.name.clone(),
            });
        }
        if self.id_field.trim().is_empty() {
            return Err(ConfigError::EmptyIdField {
                collection: self.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for binding in &self.filters {
            if !seen.insert(binding.key.as_str()) {
                return Err(ConfigError::DuplicateFilterKey {
                    collection: self.name.clone(),
                    key: binding.key.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Complete configuration: every collection view of the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Base URL of the REST API, used by HTTP sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    pub collections: Vec<CollectionConfig>,
}

impl ViewsConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate every collection
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for collection in &self.collections {
            collection.validate()?;
            if !seen.insert(collection.name.as_str()) {
                return Err(ConfigError::DuplicateCollection {
                    name: collection.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Find a collection by name
    pub fn collection(&self, name: &str) -> Result<&CollectionConfig, ConfigError> {
        self.collections
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ConfigError::UnknownCollection {
                name: name.to_string(),
            })
    }

    /// The four ranch collections with their standard settings
    pub fn default_config() -> Self {
        Self {
            api_base: None,
            collections: collections::all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterKind;

    #[test]
    fn test_default_config() {
        let config = ViewsConfig::default_config();

        assert_eq!(config.collections.len(), 4);
        assert!(config.validate().is_ok());
        assert!(config.collection("ranches").is_ok());
        assert!(matches!(
            config.collection("herds"),
            Err(ConfigError::UnknownCollection { .. })
        ));
    }

    #[test]
    fn test_yaml_serialization() {
        let config = ViewsConfig::default_config();
        let yaml = config.to_yaml().unwrap();

        // Should be able to parse it back
        let parsed = ViewsConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = r#"
collections:
  - name: paddocks
    filters:
      - { key: areaMin, field: area, kind: min }
    sort_types:
      area: number
"#;
        let config = ViewsConfig::from_yaml_str(yaml).unwrap();
        let paddocks = config.collection("paddocks").unwrap();
        assert_eq!(paddocks.id_field, "id");
        assert_eq!(paddocks.endpoint(), "paddocks");
        assert_eq!(paddocks.items_per_page, DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(paddocks.filters[0].kind, FilterKind::Min);
        assert_eq!(paddocks.sort_type("area"), SortType::Number);
        assert_eq!(paddocks.sort_type("name"), SortType::String);
    }

    #[test]
    fn test_validation_rejects_bad_collections() {
        let zero_page = CollectionConfig::new("x").with_items_per_page(0);
        assert!(matches!(
            zero_page.validate(),
            Err(ConfigError::InvalidPageSize { .. })
        ));

        let duplicate = CollectionConfig::new("x")
            .with_filter(FilterBinding::min("amount", "amount"))
            .with_filter(FilterBinding::max("amount", "amount"));
        assert!(matches!(
            duplicate.validate(),
            Err(ConfigError::DuplicateFilterKey { .. })
        ));

        let no_id = CollectionConfig::new("x").with_id_field(" ");
        assert!(matches!(no_id.validate(), Err(ConfigError::EmptyIdField { .. })));

        let yaml = "collections:\n  - name: broken\n    items_per_page: 0\n";
        assert!(ViewsConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_validation_rejects_duplicate_collection_names() {
        let yaml = r#"
collections:
  - name: paddocks
  - name: herds
  - name: paddocks
    items_per_page: 5
"#;
        let err = ViewsConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCollection { ref name } if name == "paddocks"));
        assert_eq!(err.error_code(), "DUPLICATE_COLLECTION");
    }
}
