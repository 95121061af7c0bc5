//! Filter state and the predicate builder
//!
//! A [`FilterState`] holds what the user picked in the filter controls. A list
//! of [`FilterBinding`]s says which record field each filter key constrains and
//! how. [`PredicateBuilder`] combines the two into a [`RecordPredicate`]: the
//! logical AND of one clause per active filter.
//!
//! # Example
//!
//! ```rust,ignore
//! let bindings = vec![
//!     FilterBinding::min("superficie_min", "surfaceHectares"),
//!     FilterBinding::equals("estado", "status"),
//! ];
//! let mut state = FilterState::new();
//! state.set("superficie_min", json!(60));
//! state.set("estado", json!("all")); // sentinel: no constraint
//!
//! let predicate = PredicateBuilder::new(&bindings).build(&state);
//! let kept: Vec<_> = records.iter().filter(|r| predicate.matches(r)).collect();
//! ```

use crate::core::record::{
    Record, parse_date_parts, value_to_date, value_to_number, value_to_text,
};
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel used by select controls to mean "any value"
pub const ALL_SENTINEL: &str = "all";

/// Whether a filter value constrains anything
///
/// Null, blank strings, the `"all"` sentinel and empty arrays are inactive.
/// An array holding only inactive entries is inactive too.
pub fn is_active(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => {
            let trimmed = s.trim();
            !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(ALL_SENTINEL)
        }
        Value::Array(items) => items.iter().any(is_active),
        _ => true,
    }
}

/// Current filter values, keyed by filter key
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(IndexMap<String, Value>);

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter value; returns true if the stored value changed
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if self.0.get(&key) == Some(&value) {
            return false;
        }
        self.0.insert(key, value);
        true
    }

    /// Remove a filter; returns true if it was present
    pub fn remove(&mut self, key: &str) -> bool {
        self.0.shift_remove(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the filters that actually constrain records
    pub fn active(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0
            .iter()
            .filter(|(_, v)| is_active(v))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<IndexMap<String, Value>> for FilterState {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How a filter key constrains its field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Exact match on the text form of the value
    Equals,
    /// Case-insensitive substring match
    Contains,
    /// Inclusive numeric lower bound
    Min,
    /// Inclusive numeric upper bound
    Max,
    /// Inclusive date lower bound
    DateFrom,
    /// Inclusive date upper bound (a bare day covers the whole day)
    DateTo,
}

/// Maps a filter key to the record field it constrains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterBinding {
    /// Key in the filter state (e.g. `amountMin`)
    pub key: String,
    /// Record field or dotted path (e.g. `amount`)
    pub field: String,
    pub kind: FilterKind,
}

impl FilterBinding {
    pub fn new(key: impl Into<String>, field: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            field: field.into(),
            kind,
        }
    }

    pub fn equals(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(key, field, FilterKind::Equals)
    }

    pub fn contains(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(key, field, FilterKind::Contains)
    }

    pub fn min(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(key, field, FilterKind::Min)
    }

    pub fn max(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(key, field, FilterKind::Max)
    }

    pub fn date_from(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(key, field, FilterKind::DateFrom)
    }

    pub fn date_to(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(key, field, FilterKind::DateTo)
    }

    /// Compile this binding against a filter value
    ///
    /// Returns `None` when the value cannot be turned into a constraint
    /// (inactive, or unparsable for numeric/date kinds).
    fn compile(&self, value: &Value) -> Option<Clause> {
        if !is_active(value) {
            return None;
        }
        let field = self.field.clone();

        match self.kind {
            FilterKind::Equals => {
                let expected = text_options(value)?;
                Some(Clause::Equals { field, expected })
            }
            FilterKind::Contains => {
                let needles = text_options(value)?
                    .into_iter()
                    .map(|needle| needle.to_lowercase())
                    .collect();
                Some(Clause::Contains { field, needles })
            }
            FilterKind::Min => finite_number(value).map(|bound| Clause::Min { field, bound }),
            FilterKind::Max => finite_number(value).map(|bound| Clause::Max { field, bound }),
            FilterKind::DateFrom => {
                let (bound, _) = parse_date_value(value)?;
                Some(Clause::DateFrom { field, bound })
            }
            FilterKind::DateTo => {
                let (at, day_only) = parse_date_value(value)?;
                let bound = if day_only {
                    at.checked_add_signed(Duration::days(1) - Duration::nanoseconds(1))
                        .unwrap_or(DateTime::<Utc>::MAX_UTC)
                } else {
                    at
                };
                Some(Clause::DateTo { field, bound })
            }
        }
    }
}

/// Text forms a filter value accepts; an array means "any of"
///
/// Inactive array entries are skipped. `None` when nothing is left.
fn text_options(value: &Value) -> Option<Vec<String>> {
    let options: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| is_active(item))
            .map(value_to_text)
            .collect(),
        other => vec![value_to_text(other)],
    };
    Some(options).filter(|o| !o.is_empty())
}

fn finite_number(value: &Value) -> Option<f64> {
    value_to_number(value).filter(|n| n.is_finite())
}

fn parse_date_value(value: &Value) -> Option<(DateTime<Utc>, bool)> {
    match value {
        Value::String(s) => parse_date_parts(s),
        other => value_to_date(other).map(|at| (at, false)),
    }
}

/// One compiled constraint
#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Equals { field: String, expected: Vec<String> },
    Contains { field: String, needles: Vec<String> },
    Min { field: String, bound: f64 },
    Max { field: String, bound: f64 },
    DateFrom { field: String, bound: DateTime<Utc> },
    DateTo { field: String, bound: DateTime<Utc> },
}

impl Clause {
    fn matches(&self, record: &Record) -> bool {
        match self {
            Clause::Equals { field, expected } => record.value(field).is_some_and(|v| {
                let text = value_to_text(v);
                expected.iter().any(|e| *e == text)
            }),
            Clause::Contains { field, needles } => record.value(field).is_some_and(|v| {
                let text = value_to_text(v).to_lowercase();
                needles.iter().any(|n| text.contains(n.as_str()))
            }),
            Clause::Min { field, bound } => record.number(field).is_some_and(|n| n >= *bound),
            Clause::Max { field, bound } => record.number(field).is_some_and(|n| n <= *bound),
            Clause::DateFrom { field, bound } => record.date(field).is_some_and(|d| d >= *bound),
            Clause::DateTo { field, bound } => record.date(field).is_some_and(|d| d <= *bound),
        }
    }
}

/// Conjunction of compiled filter clauses
///
/// An empty predicate matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPredicate {
    clauses: Vec<Clause>,
}

impl RecordPredicate {
    /// Predicate with no constraints
    pub fn always() -> Self {
        Self::default()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    /// Number of active clauses
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Builds record predicates from filter state
pub struct PredicateBuilder<'a> {
    bindings: &'a [FilterBinding],
}

impl<'a> PredicateBuilder<'a> {
    pub fn new(bindings: &'a [FilterBinding]) -> Self {
        Self { bindings }
    }

    /// Compile the active filters of `state` into one predicate
    pub fn build(&self, state: &FilterState) -> RecordPredicate {
        let mut clauses = Vec::new();

        for (key, value) in state.active() {
            let mut bound = false;
            for binding in self.bindings.iter().filter(|b| b.key == key) {
                bound = true;
                match binding.compile(value) {
                    Some(clause) => clauses.push(clause),
                    None => tracing::debug!(
                        filter = %key,
                        value = %value,
                        "ignoring filter value that cannot be interpreted"
                    ),
                }
            }
            if !bound {
                tracing::debug!(filter = %key, "ignoring filter with no binding");
            }
        }

        RecordPredicate { clauses }
    }
}
