//! Typed error handling for collection views
//!
//! The pipeline itself never fails on bad records or bad filter input; errors
//! only come from the edges: configuration, query parameters and the sources
//! that load or mutate collections.
//!
//! # Error Categories
//!
//! - [`ConfigError`]: invalid or unreadable collection configuration
//! - [`SourceError`]: fetch, mutation and decode failures from a collection source
//! - [`QueryError`]: malformed query parameters (filter JSON, sort expression)
//!
//! # Example
//!
//! ```rust,ignore
//! match handle.refresh().await {
//!     Ok(outcome) => println!("{:?}", outcome),
//!     Err(ViewError::Source(SourceError::Fetch { collection, message })) => {
//!         eprintln!("could not load {}: {}", collection, message);
//!     }
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// The main error type for the crate
#[derive(Debug)]
pub enum ViewError {
    /// Configuration errors
    Config(ConfigError),

    /// Collection source errors (fetch, delete, update)
    Source(SourceError),

    /// Query parameter errors
    Query(QueryError),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::Config(e) => write!(f, "{}", e),
            ViewError::Source(e) => write!(f, "{}", e),
            ViewError::Query(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewError::Config(e) => Some(e),
            ViewError::Source(e) => Some(e),
            ViewError::Query(e) => Some(e),
        }
    }
}

/// Serializable error report, suitable for handing to a presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ViewError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ViewError::Config(e) => e.error_code(),
            ViewError::Source(e) => e.error_code(),
            ViewError::Query(e) => e.error_code(),
        }
    }

    /// Convert to an error report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to collection configuration
#[derive(Debug)]
pub enum ConfigError {
    /// `items_per_page` must be greater than zero
    InvalidPageSize { collection: String },

    /// The same filter key is bound twice
    DuplicateFilterKey { collection: String, key: String },

    /// The id field name is empty
    EmptyIdField { collection: String },

    /// No collection with that name is registered
    UnknownCollection { name: String },

    /// Two collections share a name
    DuplicateCollection { name: String },

    /// Configuration file could not be read
    Io { path: String, message: String },

    /// Configuration could not be parsed
    Parse { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPageSize { collection } => {
                write!(f, "Collection '{}': items_per_page must be > 0", collection)
            }
            ConfigError::DuplicateFilterKey { collection, key } => {
                write!(
                    f,
                    "Collection '{}': filter key '{}' is bound more than once",
                    collection, key
                )
            }
            ConfigError::EmptyIdField { collection } => {
                write!(f, "Collection '{}': id_field must not be empty", collection)
            }
            ConfigError::UnknownCollection { name } => {
                write!(f, "Unknown collection: {}", name)
            }
            ConfigError::DuplicateCollection { name } => {
                write!(f, "Collection '{}' is defined more than once", name)
            }
            ConfigError::Io { path, message } => {
                write!(f, "Failed to read configuration '{}': {}", path, message)
            }
            ConfigError::Parse { message } => {
                write!(f, "Failed to parse configuration: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvalidPageSize { .. } => "INVALID_PAGE_SIZE",
            ConfigError::DuplicateFilterKey { .. } => "DUPLICATE_FILTER_KEY",
            ConfigError::EmptyIdField { .. } => "EMPTY_ID_FIELD",
            ConfigError::UnknownCollection { .. } => "UNKNOWN_COLLECTION",
            ConfigError::DuplicateCollection { .. } => "DUPLICATE_COLLECTION",
            ConfigError::Io { .. } => "CONFIG_IO_ERROR",
            ConfigError::Parse { .. } => "CONFIG_PARSE_ERROR",
        }
    }
}

impl From<ConfigError> for ViewError {
    fn from(err: ConfigError) -> Self {
        ViewError::Config(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Source Errors
// =============================================================================

/// Errors reported by a collection source
#[derive(Debug)]
pub enum SourceError {
    /// Loading the collection failed
    Fetch { collection: String, message: String },

    /// A delete or update failed
    Mutation {
        collection: String,
        operation: String,
        id: String,
        message: String,
    },

    /// The response body was not a collection of records
    Decode { collection: String, message: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Fetch {
                collection,
                message,
            } => write!(f, "Failed to load {}: {}", collection, message),
            SourceError::Mutation {
                collection,
                operation,
                id,
                message,
            } => write!(
                f,
                "Failed to {} {} '{}': {}",
                operation, collection, id, message
            ),
            SourceError::Decode {
                collection,
                message,
            } => write!(f, "Invalid {} payload: {}", collection, message),
        }
    }
}

impl std::error::Error for SourceError {}

impl SourceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SourceError::Fetch { .. } => "SOURCE_FETCH_FAILED",
            SourceError::Mutation { .. } => "SOURCE_MUTATION_FAILED",
            SourceError::Decode { .. } => "SOURCE_DECODE_FAILED",
        }
    }
}

impl From<SourceError> for ViewError {
    fn from(err: SourceError) -> Self {
        ViewError::Source(err)
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors related to query parameters
#[derive(Debug)]
pub enum QueryError {
    /// The `filter` parameter is not a JSON object
    InvalidFilter { message: String },

    /// The `sort` parameter is not `field`, `field:asc` or `field:desc`
    InvalidSort { expression: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidFilter { message } => {
                write!(f, "Invalid filter parameter: {}", message)
            }
            QueryError::InvalidSort { expression } => {
                write!(f, "Invalid sort expression: '{}'", expression)
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::InvalidFilter { .. } => "INVALID_FILTER",
            QueryError::InvalidSort { .. } => "INVALID_SORT",
        }
    }
}

impl From<QueryError> for ViewError {
    fn from(err: QueryError) -> Self {
        ViewError::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_bubble_up() {
        let err = ViewError::from(ConfigError::UnknownCollection {
            name: "herds".to_string(),
        });
        assert_eq!(err.error_code(), "UNKNOWN_COLLECTION");
        assert_eq!(err.to_string(), "Unknown collection: herds");
    }

    #[test]
    fn test_report_carries_code_and_message() {
        let err = ViewError::from(SourceError::Fetch {
            collection: "ranches".to_string(),
            message: "connection refused".to_string(),
        });
        let report = err.to_report();
        assert_eq!(report.code, "SOURCE_FETCH_FAILED");
        assert_eq!(report.message, "Failed to load ranches: connection refused");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let err = ViewError::from(QueryError::InvalidSort {
            expression: "amount:sideways".to_string(),
        });
        assert!(err.source().is_some());
    }
}
