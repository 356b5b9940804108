//! Follower counts for legislators' twitter handles.
//!
//! Lookups are best-effort: any failure is recorded as
//! [`FOLLOWERS_UNAVAILABLE`] and the run carries on.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::reconcile::LegislatorRecord;

/// Follower count recorded when a lookup fails.
pub const FOLLOWERS_UNAVAILABLE: i64 = -1;

#[derive(Debug, Error)]
pub enum FollowerLookupError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Handle not found: {0}")]
    NotFound(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("response has no follower count for {0}")]
    MissingCount(String),
}

/// Looks up the follower count of a social handle.
#[async_trait]
pub trait FollowerLookup: Send + Sync {
    async fn follower_count(&self, handle: &str) -> Result<u64, FollowerLookupError>;
}

/// Twitter API v2 user lookup with app-only bearer auth.
pub struct TwitterFollowerLookup {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl TwitterFollowerLookup {
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, bearer_token)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        bearer_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
        }
    }

    fn user_url(&self, handle: &str) -> String {
        format!(
            "{}/2/users/by/username/{}?user.fields=public_metrics",
            self.base_url,
            urlencoding::encode(handle)
        )
    }
}

#[async_trait]
impl FollowerLookup for TwitterFollowerLookup {
    async fn follower_count(&self, handle: &str) -> Result<u64, FollowerLookupError> {
        let response = self
            .client
            .get(self.user_url(handle))
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FollowerLookupError::NotFound(handle.to_string()));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FollowerLookupError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        body.pointer("/data/public_metrics/followers_count")
            .and_then(Value::as_u64)
            .ok_or_else(|| FollowerLookupError::MissingCount(handle.to_string()))
    }
}

/// Fill `followers` for every legislator with a twitter handle.
///
/// Legislators without a handle stay `None`. Failed lookups become
/// [`FOLLOWERS_UNAVAILABLE`].
pub async fn enrich_followers(legislators: &mut [LegislatorRecord], lookup: &dyn FollowerLookup) {
    let mut unavailable = 0usize;

    for legislator in legislators.iter_mut() {
        let handle = legislator.twitter.trim();
        if handle.is_empty() {
            continue;
        }

        let count = match lookup.follower_count(handle).await {
            Ok(count) => i64::try_from(count).unwrap_or(i64::MAX),
            Err(e) => {
                tracing::warn!(handle, error = %e, "follower lookup failed");
                unavailable += 1;
                FOLLOWERS_UNAVAILABLE
            }
        };
        legislator.followers = Some(count);
    }

    if unavailable > 0 {
        tracing::info!(unavailable, "some follower counts are unavailable");
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock follower lookup for unit testing.

    use super::{FollowerLookup, FollowerLookupError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a fixed table; unknown handles are `NotFound`.
    #[derive(Default)]
    pub struct MockFollowerLookup {
        counts: HashMap<String, u64>,
        calls: Mutex<Vec<String>>,
    }

    impl MockFollowerLookup {
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_count(mut self, handle: &str, count: u64) -> Self {
            self.counts.insert(handle.to_string(), count);
            self
        }

        /// Handles looked up so far, in call order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FollowerLookup for MockFollowerLookup {
        async fn follower_count(&self, handle: &str) -> Result<u64, FollowerLookupError> {
            self.calls.lock().unwrap().push(handle.to_string());
            self.counts
                .get(handle)
                .copied()
                .ok_or_else(|| FollowerLookupError::NotFound(handle.to_string()))
        }
    }
}
