//! REST collection source backed by `reqwest`
//!
//! | Operation | Request                          | Expected response        |
//! |-----------|----------------------------------|--------------------------|
//! | fetch     | `GET {base}/{endpoint}`          | JSON array of objects    |
//! | delete    | `DELETE {base}/{endpoint}/{id}`  | any 2xx                  |
//! | update    | `PUT {base}/{endpoint}/{id}`     | the updated JSON object  |

use crate::config::CollectionConfig;
use crate::core::error::SourceError;
use crate::core::record::Record;
use crate::source::{CollectionSource, records_from_values};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

/// Collection source talking to a REST backend
#[derive(Clone)]
pub struct HttpSource {
    name: String,
    client: Client,
    collection_url: Url,
}

impl HttpSource {
    /// Create a source for `endpoint` under `base_url`
    pub fn new(name: impl Into<String>, base_url: &str, endpoint: &str) -> Result<Self> {
        Self::with_client(name, Client::new(), base_url, endpoint)
    }

    /// Create a source for a configured collection
    pub fn for_collection(config: &CollectionConfig, base_url: &str) -> Result<Self> {
        Self::new(config.name.clone(), base_url, config.endpoint())
    }

    /// Share an existing client (connection pool) between sources
    pub fn with_client(
        name: impl Into<String>,
        client: Client,
        base_url: &str,
        endpoint: &str,
    ) -> Result<Self> {
        let mut collection_url =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL '{}'", base_url))?;
        {
            let mut segments = collection_url
                .path_segments_mut()
                .map_err(|_| anyhow!("API base URL '{}' cannot have a path", base_url))?;
            segments.pop_if_empty();
            segments.extend(endpoint.split('/').filter(|s| !s.is_empty()));
        }

        Ok(Self {
            name: name.into(),
            client,
            collection_url,
        })
    }

    /// URL of the whole collection
    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    /// URL of one record; the id is percent-encoded as a single segment
    pub fn record_url(&self, id: &str) -> Result<Url> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Collection URL cannot have a path"))?
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl CollectionSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        tracing::debug!(collection = %self.name, url = %self.collection_url, "fetching collection");

        let body = self
            .client
            .get(self.collection_url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", self.collection_url))?
            .error_for_status()?
            .bytes()
            .await
            .with_context(|| format!("GET {} body could not be read", self.collection_url))?;

        Ok(decode_collection(&self.name, &body)?)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.record_url(id)?;
        self.client
            .delete(url.clone())
            .send()
            .await
            .with_context(|| format!("DELETE {} failed", url))?
            .error_for_status()?;
        Ok(())
    }

    async fn update(&self, id: &str, patch: Value) -> Result<Record> {
        let url = self.record_url(id)?;
        let body: Value = self
            .client
            .put(url.clone())
            .json(&patch)
            .send()
            .await
            .with_context(|| format!("PUT {} failed", url))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("{} update response is not JSON", self.name))?;

        Record::from_value(body).ok_or_else(|| anyhow!("{} update response is not an object", self.name))
    }
}

/// Decode a collection response body into records
///
/// The body must be a JSON array; non-object entries are skipped.
fn decode_collection(collection: &str, body: &[u8]) -> Result<Vec<Record>, SourceError> {
    let values: Vec<Value> =
        serde_json::from_slice(body).map_err(|e| SourceError::Decode {
            collection: collection.to_string(),
            message: e.to_string(),
        })?;
    Ok(records_from_values(collection, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_collection() {
        let records = decode_collection("ranches", br#"[{"id": 1}, 7, {"id": 2}]"#).unwrap();
        assert_eq!(records.len(), 2);

        let err = decode_collection("ranches", br#"{"data": []}"#).unwrap_err();
        assert_eq!(err.error_code(), "SOURCE_DECODE_FAILED");
    }

    #[test]
    fn test_collection_url_joins_endpoint() {
        let source = HttpSource::new("transactions", "http://localhost:8080/api/", "finance/transactions")
            .unwrap();
        assert_eq!(
            source.collection_url().as_str(),
            "http://localhost:8080/api/finance/transactions"
        );
    }

    #[test]
    fn test_record_url_encodes_id() {
        let source = HttpSource::new("ranches", "http://localhost:8080/api", "ranches").unwrap();
        assert_eq!(
            source.record_url("r 1/2").unwrap().as_str(),
            "http://localhost:8080/api/ranches/r%201%2F2"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpSource::new("ranches", "not a url", "ranches").is_err());
        assert!(HttpSource::new("ranches", "mailto:someone@example.com", "ranches").is_err());
    }
}
