//! Sort configuration and the type-aware record comparator
//!
//! Sort expressions use the `field`, `field:asc` or `field:desc` format.
//!
//! # Ordering rules
//!
//! - `string`: both sides lowercased, then compared.
//! - `number`: lenient float parse; missing, unparsable and NaN values count as `0`.
//! - `date`: invalid or missing dates are greater than every valid date and
//!   equal to each other, so they sort last ascending and first descending.
//!
//! `desc` is the exact reverse of `asc`.

use crate::core::error::QueryError;
use crate::core::record::{Record, value_to_date, value_to_number, value_to_text};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// How the values of a sort key are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    #[default]
    String,
    Number,
    Date,
}

/// The active sort key and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Header-click semantics: a new key starts ascending, the same key flips
    pub fn toggle(current: Option<&SortConfig>, key: &str) -> SortConfig {
        match current {
            Some(active) if active.key == key => SortConfig {
                key: active.key.clone(),
                direction: active.direction.toggled(),
            },
            _ => SortConfig::asc(key),
        }
    }

    /// Parse a `field`, `field:asc` or `field:desc` expression
    pub fn parse(expression: &str) -> Result<Self, QueryError> {
        static SORT_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = SORT_REGEX.get_or_init(|| {
            Regex::new(r"^([A-Za-z_][A-Za-z0-9_.\-]*)(?::(asc|desc))?$").expect("valid sort regex")
        });

        let trimmed = expression.trim();
        let captures = regex
            .captures(trimmed)
            .ok_or_else(|| QueryError::InvalidSort {
                expression: expression.to_string(),
            })?;

        let direction = match captures.get(2).map(|m| m.as_str()) {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };

        Ok(Self {
            key: captures[1].to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.direction.as_str())
    }
}

/// Comparator for one sort key
#[derive(Debug, Clone)]
pub struct Comparator {
    key: String,
    direction: SortDirection,
    sort_type: SortType,
}

impl Comparator {
    pub fn new(config: &SortConfig, sort_type: SortType) -> Self {
        Self {
            key: config.key.clone(),
            direction: config.direction,
            sort_type,
        }
    }

    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ordering = match self.sort_type {
            SortType::String => self.string_key(a).cmp(&self.string_key(b)),
            SortType::Number => {
                let (x, y) = (self.number_key(a), self.number_key(b));
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            SortType::Date => {
                let x = a.value(&self.key).and_then(value_to_date);
                let y = b.value(&self.key).and_then(value_to_date);
                match (x, y) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Stable in-place sort
    pub fn sort(&self, records: &mut [Record]) {
        records.sort_by(|a, b| self.compare(a, b));
    }

    fn string_key(&self, record: &Record) -> String {
        record
            .value(&self.key)
            .map(value_to_text)
            .unwrap_or_default()
            .to_lowercase()
    }

    fn number_key(&self, record: &Record) -> f64 {
        record
            .value(&self.key)
            .and_then(value_to_number)
            .filter(|n| !n.is_nan())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn records(field: &str, values: &[Value]) -> Vec<Record> {
        values
            .iter()
            .map(|v| Record::from_value(json!({ field: v })).expect("object"))
            .collect()
    }

    fn column(records: &[Record], field: &str) -> Vec<Value> {
        records
            .iter()
            .map(|r| r.get(field).cloned().unwrap_or(Value::Null))
            .collect()
    }

    #[test]
    fn test_toggle_semantics() {
        let first = SortConfig::toggle(None, "amount");
        assert_eq!(first, SortConfig::asc("amount"));
        let second = SortConfig::toggle(Some(&first), "amount");
        assert_eq!(second, SortConfig::desc("amount"));
        let other = SortConfig::toggle(Some(&second), "date");
        assert_eq!(other, SortConfig::asc("date"));
    }

    #[test]
    fn test_parse_sort_expression() {
        assert_eq!(SortConfig::parse("amount").unwrap(), SortConfig::asc("amount"));
        assert_eq!(
            SortConfig::parse("created_at:desc").unwrap(),
            SortConfig::desc("created_at")
        );
        assert_eq!(
            SortConfig::parse("location.state:asc").unwrap(),
            SortConfig::asc("location.state")
        );
        assert!(SortConfig::parse("amount:sideways").is_err());
        assert!(SortConfig::parse(":desc").is_err());
        assert!(SortConfig::parse("").is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let config = SortConfig::desc("amount");
        assert_eq!(config.to_string(), "amount:desc");
        assert_eq!(SortConfig::parse(&config.to_string()).unwrap(), config);
    }

    #[test]
    fn test_number_sort_descending() {
        let mut data = records("amount", &[json!(10.5), json!(-3.2), json!(100), json!(0)]);
        Comparator::new(&SortConfig::desc("amount"), SortType::Number).sort(&mut data);
        assert_eq!(
            column(&data, "amount"),
            vec![json!(100), json!(10.5), json!(0), json!(-3.2)]
        );
    }

    #[test]
    fn test_number_sort_treats_garbage_as_zero() {
        let mut data = records("n", &[json!(5), json!("abc"), json!(-1), json!(null)]);
        Comparator::new(&SortConfig::asc("n"), SortType::Number).sort(&mut data);
        assert_eq!(
            column(&data, "n"),
            vec![json!(-1), json!("abc"), json!(null), json!(5)]
        );
    }

    #[test]
    fn test_string_sort_ignores_case() {
        let mut data = records("name", &[json!("bravo"), json!("Alpha"), json!("charlie")]);
        Comparator::new(&SortConfig::asc("name"), SortType::String).sort(&mut data);
        assert_eq!(
            column(&data, "name"),
            vec![json!("Alpha"), json!("bravo"), json!("charlie")]
        );
    }

    #[test]
    fn test_invalid_dates_sort_last_ascending_first_descending() {
        let values = [
            json!("2024-05-01"),
            json!("garbage"),
            json!("2023-01-15T08:00:00Z"),
            json!(null),
        ];

        let mut asc = records("date", &values);
        Comparator::new(&SortConfig::asc("date"), SortType::Date).sort(&mut asc);
        assert_eq!(
            column(&asc, "date"),
            vec![json!("2023-01-15T08:00:00Z"), json!("2024-05-01"), json!("garbage"), json!(null)]
        );

        let mut desc = records("date", &values);
        Comparator::new(&SortConfig::desc("date"), SortType::Date).sort(&mut desc);
        assert_eq!(
            column(&desc, "date"),
            vec![json!("garbage"), json!(null), json!("2024-05-01"), json!("2023-01-15T08:00:00Z")]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut data: Vec<Record> = ["a", "b", "c"]
            .iter()
            .map(|id| Record::from_value(json!({ "id": id, "status": "active" })).unwrap())
            .collect();
        Comparator::new(&SortConfig::desc("status"), SortType::String).sort(&mut data);
        assert_eq!(column(&data, "id"), vec![json!("a"), json!("b"), json!("c")]);
    }
}
