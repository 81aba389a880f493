use crate::{
    error::{FinderError, Result},
    models::{Document, SearchPage, SearchQuery},
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

/// Anything that can answer a catalog search one page at a time.
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage>;
}

/// HTTP client for the Open Library search endpoint.
///
/// One attempt per call: no retries and no explicit timeout.
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    client: Client,
    search_url: String,
}

impl OpenLibraryClient {
    pub fn new(search_url: &str) -> Self {
        Self {
            client: Client::new(),
            search_url: search_url.trim().to_string(),
        }
    }

    /// Full request URL for a query; spaces are form-encoded as `+`.
    pub fn request_url(&self, query: &SearchQuery) -> Result<Url> {
        Url::parse_with_params(&self.search_url, query.params()).map_err(|e| {
            FinderError::InvalidInput(format!("Invalid search URL '{}': {}", self.search_url, e))
        })
    }
}

#[async_trait]
impl SearchSource for OpenLibraryClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        let url = self.request_url(query)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Catalog search returned status {}", status);
            return Err(FinderError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FinderError::DecodeAnomaly(format!("Body is not JSON: {}", e)))?;

        let page = decode_page(body);
        if let Some(anomaly) = &page.anomaly {
            warn!("{}", anomaly);
        }
        Ok(page)
    }
}

/// Normalise a search envelope into documents plus a total count.
///
/// A missing or malformed `docs` field yields an empty page; elements that do
/// not decode are skipped. Either case is reported through `SearchPage::anomaly`.
pub fn decode_page(body: Value) -> SearchPage {
    let mut problems = Vec::new();
    let mut docs = Vec::new();

    match body.get("docs") {
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                if !item.is_object() {
                    problems.push(format!("docs[{}] is not an object", index));
                    continue;
                }
                match serde_json::from_value::<Document>(item.clone()) {
                    Ok(doc) => docs.push(doc),
                    Err(e) => problems.push(format!("docs[{}] skipped: {}", index, e)),
                }
            }
        }
        Some(_) => problems.push("`docs` is not a list".to_string()),
        None => problems.push("`docs` is missing".to_string()),
    }

    let total = body
        .get("numFound")
        .and_then(Value::as_u64)
        .filter(|count| *count > 0)
        .unwrap_or(docs.len() as u64);

    SearchPage {
        docs,
        total,
        anomaly: (!problems.is_empty()).then(|| FinderError::DecodeAnomaly(problems.join("; "))),
    }
}
