//! Catalog clients for fetching raw bill documents.
//!
//! [`BillCatalog`] hides which external source is being walked:
//!
//! - [`GovTrackClient`] reads the bulk `data.json` files, one per bill
//! - [`BulkDirCatalog`] reads the same files from a local mirror
//! - [`ProPublicaClient`] calls the REST API, one request for the bill and
//!   one for its cosponsor list
//! - [`mock::MockBillCatalog`] serves scripted documents in unit tests
//!   (behind the `test-utils` feature)
//!
//! # Example
//!
//! ```ignore
//! use bill_harvest::congress::{BillCatalog, BillKey, BillType, GovTrackClient};
//!
//! let client = GovTrackClient::new("https://www.govtrack.us/data/congress");
//! let doc = client.fetch_bill(&BillKey::new(BillType::Hr, 21, 114)).await?;
//! ```

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::extract::BillDocument;
use super::types::{BillKey, SourceKind};

/// Errors that can occur when fetching from a bill catalog.
#[derive(Debug, Error)]
pub enum CongressApiError {
    /// HTTP request failed (connection, timeout, or body decoding)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Catalog has no document for this bill
    #[error("Bill not found: {0}")]
    NotFound(String),

    /// Catalog returned an error response
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Local bulk file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Local bulk file is not valid JSON
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Trait for bill catalog operations.
#[async_trait]
pub trait BillCatalog: Send + Sync {
    /// Which document layout this catalog returns.
    fn source(&self) -> SourceKind;

    /// Fetch the raw document(s) describing one bill.
    async fn fetch_bill(&self, key: &BillKey) -> Result<BillDocument, CongressApiError>;
}

/// Build the shared HTTP client used by every outbound call.
///
/// # Errors
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_http_client(
    timeout: Duration,
    user_agent: &str,
) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

/// Send a GET and decode the JSON body, mapping 404 and other failures.
async fn get_json(request: RequestBuilder, what: &str) -> Result<Value, CongressApiError> {
    let response = request.send().await?;
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(CongressApiError::NotFound(what.to_string()));
    }

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(CongressApiError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json().await?)
}

fn trim_base(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}

/// Client for GovTrack's bulk bill files.
pub struct GovTrackClient {
    client: reqwest::Client,
    base_url: String,
}

impl GovTrackClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client with a custom `reqwest::Client` (timeouts, user agent).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }

    fn bill_url(&self, key: &BillKey) -> String {
        format!(
            "{}/{}/bills/{}/{}/data.json",
            self.base_url,
            key.congress,
            key.bill_type,
            key.slug()
        )
    }
}

#[async_trait]
impl BillCatalog for GovTrackClient {
    fn source(&self) -> SourceKind {
        SourceKind::GovTrack
    }

    async fn fetch_bill(&self, key: &BillKey) -> Result<BillDocument, CongressApiError> {
        let url = self.bill_url(key);
        tracing::debug!(bill = %key, %url, "fetching GovTrack bill");

        let doc = get_json(self.client.get(&url), &key.to_string()).await?;
        Ok(BillDocument::GovTrack(doc))
    }
}

/// GovTrack bulk files read from a local mirror of the data directory.
///
/// Layout matches the remote one: `{root}/{congress}/bills/{type}/{slug}/data.json`.
pub struct BulkDirCatalog {
    root: PathBuf,
}

impl BulkDirCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bill_path(&self, key: &BillKey) -> PathBuf {
        self.root
            .join(key.congress.to_string())
            .join("bills")
            .join(key.bill_type.to_string())
            .join(key.slug())
            .join("data.json")
    }
}

#[async_trait]
impl BillCatalog for BulkDirCatalog {
    fn source(&self) -> SourceKind {
        SourceKind::GovTrack
    }

    async fn fetch_bill(&self, key: &BillKey) -> Result<BillDocument, CongressApiError> {
        let path = self.bill_path(key);
        tracing::debug!(bill = %key, path = %path.display(), "reading bulk bill file");

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CongressApiError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(BillDocument::GovTrack(serde_json::from_slice(&bytes)?))
    }
}

/// Client for the ProPublica Congress API.
pub struct ProPublicaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ProPublicaClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Create a client with a custom `reqwest::Client` (timeouts, user agent).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            api_key: api_key.into(),
        }
    }

    async fn get(&self, url: &str, key: &BillKey) -> Result<Value, CongressApiError> {
        let request = self.client.get(url).header("X-API-Key", &self.api_key);
        get_json(request, &key.to_string()).await
    }
}

#[async_trait]
impl BillCatalog for ProPublicaClient {
    fn source(&self) -> SourceKind {
        SourceKind::ProPublica
    }

    async fn fetch_bill(&self, key: &BillKey) -> Result<BillDocument, CongressApiError> {
        let bill_url = format!("{}/{}/bills/{}.json", self.base_url, key.congress, key.slug());
        let cosponsors_url = format!(
            "{}/{}/bills/{}/cosponsors.json",
            self.base_url,
            key.congress,
            key.slug()
        );
        tracing::debug!(bill = %key, url = %bill_url, "fetching ProPublica bill");

        let bill = self.get(&bill_url, key).await?;
        let cosponsors = self.get(&cosponsors_url, key).await?;
        Ok(BillDocument::ProPublica { bill, cosponsors })
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{BillCatalog, BillDocument, BillKey, CongressApiError, SourceKind};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock catalog serving scripted results keyed by bill number.
    ///
    /// Numbers with no scripted result answer `NotFound`, like a 404.
    pub struct MockBillCatalog {
        source: SourceKind,
        results: Mutex<HashMap<u32, Result<BillDocument, CongressApiError>>>,
        calls: Mutex<Vec<BillKey>>,
    }

    impl MockBillCatalog {
        pub fn new(source: SourceKind) -> Self {
            Self {
                source,
                results: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Serve `doc` for bill `number`.
        pub fn set_bill(&self, number: u32, doc: BillDocument) {
            self.results.lock().unwrap().insert(number, Ok(doc));
        }

        /// Fail bill `number` with `err`.
        pub fn set_error(&self, number: u32, err: CongressApiError) {
            self.results.lock().unwrap().insert(number, Err(err));
        }

        /// All keys passed to `fetch_bill`, in call order.
        pub fn calls(&self) -> Vec<BillKey> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BillCatalog for MockBillCatalog {
        fn source(&self) -> SourceKind {
            self.source
        }

        async fn fetch_bill(&self, key: &BillKey) -> Result<BillDocument, CongressApiError> {
            self.calls.lock().unwrap().push(*key);

            self.results
                .lock()
                .unwrap()
                .remove(&key.number)
                .unwrap_or_else(|| Err(CongressApiError::NotFound(key.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::congress::BillType;
    use serde_json::json;
    use std::path::Path;

    fn write_bill(root: &Path, key: &BillKey, body: &str) {
        let dir = root
            .join(key.congress.to_string())
            .join("bills")
            .join(key.bill_type.to_string())
            .join(key.slug());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("data.json"), body).unwrap();
    }

    #[tokio::test]
    async fn bulk_dir_reads_mirrored_file() {
        let root = tempfile::tempdir().unwrap();
        let key = BillKey::new(BillType::Hr, 21, 114);
        let body = json!({"bill_id": "hr21-114", "introduced_at": "2015-01-06"});
        write_bill(root.path(), &key, &body.to_string());

        let catalog = BulkDirCatalog::new(root.path());
        let doc = catalog.fetch_bill(&key).await.unwrap();

        assert_eq!(catalog.source(), SourceKind::GovTrack);
        assert!(matches!(doc, BillDocument::GovTrack(v) if v == body));
    }

    #[tokio::test]
    async fn bulk_dir_missing_file_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let catalog = BulkDirCatalog::new(root.path());

        let result = catalog.fetch_bill(&BillKey::new(BillType::S, 7, 115)).await;

        assert!(matches!(result, Err(CongressApiError::NotFound(id)) if id == "s7-115"));
    }

    #[tokio::test]
    async fn bulk_dir_malformed_file_is_decode_error() {
        let root = tempfile::tempdir().unwrap();
        let key = BillKey::new(BillType::Hr, 3, 114);
        write_bill(root.path(), &key, "{not json");

        let result = BulkDirCatalog::new(root.path()).fetch_bill(&key).await;

        assert!(matches!(result, Err(CongressApiError::Decode(_))));
    }
}
