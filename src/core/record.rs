//! Records and value coercion
//!
//! A [`Record`] is one JSON object from a collection. Field access never
//! fails: missing fields and nulls come back as `None` and the coercion
//! helpers degrade to "no value" instead of erroring.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One item of a managed collection (ranch, transaction, event, vaccination)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap an existing JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a record from a JSON value, returning `None` unless it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Get a field by name or dotted path (`location.state`)
    ///
    /// An exact key match wins over path traversal, so keys that themselves
    /// contain dots stay reachable.
    pub fn get(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(path) {
            return Some(value);
        }
        if !path.contains('.') {
            return None;
        }

        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Get a field, treating JSON `null` as absent
    pub fn value(&self, path: &str) -> Option<&Value> {
        self.get(path).filter(|v| !v.is_null())
    }

    /// Text form of a field; missing and null fields are the empty string
    pub fn text(&self, path: &str) -> String {
        self.value(path).map(value_to_text).unwrap_or_default()
    }

    /// Numeric form of a field (lenient float parsing)
    pub fn number(&self, path: &str) -> Option<f64> {
        self.value(path).and_then(value_to_number)
    }

    /// Date form of a field
    pub fn date(&self, path: &str) -> Option<DateTime<Utc>> {
        self.value(path).and_then(value_to_date)
    }

    /// Identifier of this record under `id_field`, keyed by its text form
    pub fn id(&self, id_field: &str) -> Option<String> {
        match self.value(id_field)? {
            Value::String(s) if s.is_empty() => None,
            Value::Object(_) | Value::Array(_) => None,
            other => Some(value_to_text(other)),
        }
    }

    /// Set a top-level field
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Shallow merge of a patch object into this record
    pub fn merge(&mut self, patch: &Map<String, Value>) {
        for (key, value) in patch {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Borrow the underlying JSON object
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert back into a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Coerce a JSON value to text
///
/// Integral numbers print without a fractional part (`10.0` → `"10"`),
/// objects and arrays print as compact JSON, null is the empty string.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return n.to_string();
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                    format!("{}", f as i64)
                }
                Some(f) => f.to_string(),
                None => n.to_string(),
            }
        }
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Coerce a JSON value to a float
///
/// Numbers pass through, strings use [`parse_float`], everything else is `None`.
pub fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float(s),
        _ => None,
    }
}

/// Parse the longest leading float literal of `input`
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12.5 ha"`
/// parses as `12.5`. Returns `None` when no digits are found.
pub fn parse_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Coerce a JSON value to a UTC timestamp
///
/// Strings go through [`parse_date`]; numbers are epoch milliseconds.
pub fn value_to_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

/// Parse a date string
///
/// Accepted forms: RFC 3339, `YYYY-MM-DDTHH:MM[:SS]`, `YYYY-MM-DD HH:MM[:SS]`
/// and `YYYY-MM-DD` (midnight UTC). Naive timestamps are read as UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    parse_date_parts(input).map(|(at, _)| at)
}

/// Parse a date string and report whether it carried only a calendar day
pub(crate) fn parse_date_parts(input: &str) -> Option<(DateTime<Utc>, bool)> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some((at.with_timezone(&Utc), false));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some((Utc.from_utc_datetime(&naive), false));
        }
    }

    let day = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    Some((Utc.from_utc_datetime(&midnight), true))
}
