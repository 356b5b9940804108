//! Legislator roster from EveryPolitician term CSV files.

use async_trait::async_trait;
use serde::Deserialize;
use std::io::Read;
use thiserror::Error;

/// One legislator as listed on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RosterEntry {
    pub name: String,
    /// `Last, First` form when the roster provides one.
    pub sort_name: String,
    pub party: String,
    pub state: String,
    pub district: u32,
    pub twitter: String,
    pub facebook: String,
}

impl RosterEntry {
    /// Join keys for this entry, built the same way as for sponsorships.
    ///
    /// One key from `sort_name` ("Issa, Darrell") and one from `name`
    /// ("Darrell Issa"), so sponsorship names in either order can match.
    /// Blank names are skipped and an identical second key is dropped.
    #[must_use]
    pub fn join_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(2);
        for name in [&self.sort_name, &self.name] {
            if name.trim().is_empty() {
                continue;
            }
            let key = bh_names::join_key(name, &self.state, self.district);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("malformed roster CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Source of the legislator roster for one term.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch_roster(&self, term: u32) -> Result<Vec<RosterEntry>, RosterError>;
}

/// Column layout of an EveryPolitician `term-N.csv` file. Unused columns are skipped.
#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sort_name: String,
    #[serde(default)]
    twitter: String,
    #[serde(default)]
    facebook: String,
    #[serde(default)]
    group: String,
    #[serde(default)]
    area_id: String,
}

/// State and district from an OCD division id such as
/// `ocd-division/country:us/state:ca/cd:49`. At-large seats get district 0.
fn parse_area_id(area_id: &str) -> (String, u32) {
    let mut state = String::new();
    let mut district = 0;

    for part in area_id.split('/') {
        if let Some(code) = part.strip_prefix("state:") {
            state = code.to_ascii_uppercase();
        } else if let Some(cd) = part.strip_prefix("cd:") {
            district = cd.parse().unwrap_or(0);
        }
    }

    (state, district)
}

/// Parse an EveryPolitician term CSV.
///
/// # Errors
/// Returns an error if the CSV is malformed.
pub fn parse_roster_csv<R: Read>(reader: R) -> Result<Vec<RosterEntry>, RosterError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for row in reader.deserialize::<RosterRow>() {
        let row = row?;
        let (state, district) = parse_area_id(&row.area_id);
        entries.push(RosterEntry {
            name: row.name,
            sort_name: row.sort_name,
            party: row.group,
            state,
            district,
            twitter: row.twitter,
            facebook: row.facebook,
        });
    }

    Ok(entries)
}

/// HTTP roster source reading `{base}/{country}/{chamber}/term-{term}.csv`.
pub struct EveryPoliticianRoster {
    client: reqwest::Client,
    base_url: String,
    country: String,
    chamber: String,
}

impl EveryPoliticianRoster {
    pub fn new(
        base_url: impl Into<String>,
        country: impl Into<String>,
        chamber: impl Into<String>,
    ) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, country, chamber)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        country: impl Into<String>,
        chamber: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            country: country.into(),
            chamber: chamber.into(),
        }
    }

    fn term_url(&self, term: u32) -> String {
        format!(
            "{}/{}/{}/term-{}.csv",
            self.base_url, self.country, self.chamber, term
        )
    }
}

#[async_trait]
impl RosterSource for EveryPoliticianRoster {
    async fn fetch_roster(&self, term: u32) -> Result<Vec<RosterEntry>, RosterError> {
        let url = self.term_url(term);
        tracing::debug!(%url, "fetching legislator roster");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RosterError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        parse_roster_csv(body.as_ref())
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock roster for unit testing.

    use super::{RosterEntry, RosterError, RosterSource};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves a fixed roster, or fails every fetch.
    pub struct MockRoster {
        entries: Vec<RosterEntry>,
        fail: bool,
        terms: Mutex<Vec<u32>>,
    }

    impl MockRoster {
        pub fn new(entries: Vec<RosterEntry>) -> Self {
            Self {
                entries,
                fail: false,
                terms: Mutex::new(Vec::new()),
            }
        }

        /// A roster whose every fetch answers 503.
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(Vec::new())
            }
        }

        /// Terms requested so far.
        pub fn terms(&self) -> Vec<u32> {
            self.terms.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RosterSource for MockRoster {
        async fn fetch_roster(&self, term: u32) -> Result<Vec<RosterEntry>, RosterError> {
            self.terms.lock().unwrap().push(term);
            if self.fail {
                return Err(RosterError::ApiError {
                    status: 503,
                    message: "roster unavailable".to_string(),
                });
            }
            Ok(self.entries.clone())
        }
    }
}
