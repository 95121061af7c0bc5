//! Free-text search across record fields

use crate::core::record::Record;

/// Case-insensitive substring search over a fixed list of fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchMatcher {
    fields: Vec<String>,
}

impl SearchMatcher {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Prepare a search for `term`
    ///
    /// A blank term yields a query that matches everything.
    pub fn query(&self, term: &str) -> SearchQuery<'_> {
        let needle = if term.trim().is_empty() {
            None
        } else {
            Some(term.to_lowercase())
        };
        SearchQuery {
            fields: &self.fields,
            needle,
        }
    }

    /// One-shot convenience over [`SearchMatcher::query`]
    pub fn matches(&self, record: &Record, term: &str) -> bool {
        self.query(term).matches(record)
    }
}

/// A search term bound to the fields it runs against
#[derive(Debug, Clone)]
pub struct SearchQuery<'a> {
    fields: &'a [String],
    needle: Option<String>,
}

impl SearchQuery<'_> {
    /// True when the term constrains nothing
    pub fn is_blank(&self) -> bool {
        self.needle.is_none()
    }

    pub fn matches(&self, record: &Record) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        self.fields
            .iter()
            .any(|field| record.text(field).to_lowercase().contains(needle.as_str()))
    }
}
