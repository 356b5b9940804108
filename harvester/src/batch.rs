//! Walk a range of bill numbers, fetching and normalizing each one.
//!
//! Every identifier ends in exactly one terminal [`BillStatus`]. Failures on
//! one identifier are recorded and the batch moves on to the next.

use std::fmt;

use crate::congress::{
    ActionRecord, BillCatalog, BillKey, BillRecord, BillType, CongressApiError, ExtractError,
    SponsorshipRecord,
};

/// Per-identifier progress through the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillStatus {
    Pending,
    Fetched,
    Parsed,
    FetchFailed,
    /// Source answered with a non-OK status field
    QueryError,
    /// Source returned other than exactly one match
    UnexpectedMultipleResults,
    /// Malformed field or any other per-bill failure
    Error,
}

impl BillStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Fetched => "FETCHED",
            Self::Parsed => "PARSED",
            Self::FetchFailed => "FETCH_FAILED",
            Self::QueryError => "QUERY_ERROR",
            Self::UnexpectedMultipleResults => "UNEXPECTED_MULTIPLE_RESULTS",
            Self::Error => "ERROR",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Fetched)
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ExtractError> for BillStatus {
    fn from(err: &ExtractError) -> Self {
        match err {
            ExtractError::QueryError(_) => Self::QueryError,
            ExtractError::UnexpectedResults(_) => Self::UnexpectedMultipleResults,
            ExtractError::MissingField(_)
            | ExtractError::InvalidType { .. }
            | ExtractError::InvalidDate { .. }
            | ExtractError::InvalidTime { .. } => Self::Error,
        }
    }
}

impl From<&CongressApiError> for BillStatus {
    fn from(_: &CongressApiError) -> Self {
        Self::FetchFailed
    }
}

/// Terminal outcome for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillStatusRecord {
    pub key: BillKey,
    pub status: BillStatus,
    /// Error message for failed identifiers, empty when parsed.
    pub detail: String,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub bill_type: BillType,
    pub congress: u32,
    /// Emit a progress line after this many identifiers.
    pub progress_every: usize,
}

/// Accumulated tables for one run.
#[derive(Debug, Default)]
pub struct BatchOutput {
    pub bills: Vec<BillRecord>,
    pub actions: Vec<ActionRecord>,
    pub sponsorships: Vec<SponsorshipRecord>,
    pub statuses: Vec<BillStatusRecord>,
}

impl BatchOutput {
    /// Number of identifiers that ended in `status`.
    #[must_use]
    pub fn count(&self, status: BillStatus) -> usize {
        self.statuses.iter().filter(|s| s.status == status).count()
    }
}

/// Fetch and normalize each bill number in order.
///
/// Only bills that reach [`BillStatus::Parsed`] contribute rows to the
/// bill, action and sponsorship tables.
pub async fn run_batch(
    catalog: &dyn BillCatalog,
    numbers: &[u32],
    options: &BatchOptions,
) -> BatchOutput {
    let mut output = BatchOutput::default();
    let progress_every = options.progress_every.max(1);

    tracing::info!(
        source = %catalog.source(),
        bill_type = %options.bill_type,
        congress = options.congress,
        identifiers = numbers.len(),
        "starting batch"
    );

    for (done, &number) in numbers.iter().enumerate() {
        let key = BillKey::new(options.bill_type, number, options.congress);
        let record = process_one(catalog, key, &mut output).await;

        match record.status {
            BillStatus::Parsed => tracing::info!(bill = %key, status = %record.status),
            _ => tracing::warn!(bill = %key, status = %record.status, detail = %record.detail),
        }
        output.statuses.push(record);

        let done = done + 1;
        if done % progress_every == 0 && done < numbers.len() {
            tracing::info!(done, total = numbers.len(), "batch progress");
        }
    }

    tracing::info!(
        parsed = output.count(BillStatus::Parsed),
        fetch_failed = output.count(BillStatus::FetchFailed),
        query_error = output.count(BillStatus::QueryError),
        unexpected_results = output.count(BillStatus::UnexpectedMultipleResults),
        error = output.count(BillStatus::Error),
        "batch complete"
    );

    output
}

async fn process_one(
    catalog: &dyn BillCatalog,
    key: BillKey,
    output: &mut BatchOutput,
) -> BillStatusRecord {
    tracing::debug!(bill = %key, status = %BillStatus::Pending);

    let doc = match catalog.fetch_bill(&key).await {
        Ok(doc) => doc,
        Err(e) => {
            return BillStatusRecord {
                key,
                status: BillStatus::from(&e),
                detail: e.to_string(),
            }
        }
    };
    tracing::debug!(bill = %key, status = %BillStatus::Fetched);

    match doc.normalize(&key) {
        Ok(normalized) => {
            output.bills.push(normalized.bill);
            output.actions.extend(normalized.actions);
            output.sponsorships.extend(normalized.sponsorships);
            BillStatusRecord {
                key,
                status: BillStatus::Parsed,
                detail: String::new(),
            }
        }
        Err(e) => BillStatusRecord {
            key,
            status: BillStatus::from(&e),
            detail: e.to_string(),
        },
    }
}
