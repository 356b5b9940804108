//! Field extraction from raw bill documents.
//!
//! Both catalogs describe the same bill with different layouts. A
//! [`BillDocument`] carries the raw JSON tagged with its source, and every
//! extraction dispatches on that tag so downstream code only ever sees the
//! flat records in [`super::types`].
//!
//! Optional fields (titles, subjects, committee lists, per-party counts)
//! fall back to an empty string, `false`, or zero. Dates are parsed with
//! `%Y-%m-%d` and a malformed date is an error for the whole bill.

use chrono::{NaiveDate, NaiveTime};
use serde_json::{Map, Value};
use thiserror::Error;

use super::types::{BillKey, BillRecord, SourceKind};

type Object = Map<String, Value>;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// A raw bill document as returned by one of the catalogs.
#[derive(Debug, Clone, PartialEq)]
pub enum BillDocument {
    /// A GovTrack `data.json` file: the bill with actions and cosponsors inline.
    GovTrack(Value),
    /// ProPublica envelopes (`{"status": .., "results": [..]}`) for the bill
    /// endpoint and the cosponsors endpoint.
    ProPublica { bill: Value, cosponsors: Value },
}

/// Errors raised while turning a bill document into flat records.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The source answered but reported a non-OK status
    #[error("source reported status '{0}'")]
    QueryError(String),

    /// The source did not return exactly one result
    #[error("expected exactly one result, got {0}")]
    UnexpectedResults(usize),

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("field '{field}' is not {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    #[error("field '{field}' has malformed date '{value}'")]
    InvalidDate { field: String, value: String },

    #[error("field '{field}' has malformed time '{value}'")]
    InvalidTime { field: String, value: String },
}

/// A document with source envelopes already unwrapped.
pub(crate) enum BillView<'a> {
    GovTrack(&'a Object),
    ProPublica {
        bill: &'a Object,
        cosponsors: &'a Object,
    },
}

impl BillDocument {
    #[must_use]
    pub const fn source(&self) -> SourceKind {
        match self {
            Self::GovTrack(_) => SourceKind::GovTrack,
            Self::ProPublica { .. } => SourceKind::ProPublica,
        }
    }

    pub(crate) fn view(&self) -> Result<BillView<'_>, ExtractError> {
        match self {
            Self::GovTrack(doc) => Ok(BillView::GovTrack(as_object(doc, "document")?)),
            Self::ProPublica { bill, cosponsors } => Ok(BillView::ProPublica {
                bill: single_result(bill)?,
                cosponsors: single_result(cosponsors)?,
            }),
        }
    }

    /// Project the document onto a [`BillRecord`].
    ///
    /// # Errors
    /// Returns an error if a ProPublica envelope is not a single OK result,
    /// a required field is missing, or a field has an unexpected type or a
    /// malformed date.
    pub fn extract_bill(&self, key: &BillKey) -> Result<BillRecord, ExtractError> {
        extract_bill(&self.view()?, key)
    }
}

pub(crate) fn extract_bill(view: &BillView<'_>, key: &BillKey) -> Result<BillRecord, ExtractError> {
    match view {
        BillView::GovTrack(doc) => extract_govtrack(doc, key),
        BillView::ProPublica { bill, .. } => extract_propublica(bill, key),
    }
}

fn extract_govtrack(doc: &Object, key: &BillKey) -> Result<BillRecord, ExtractError> {
    let history = optional_object(doc, "history")?;
    let passed = |field: &str| -> Result<bool, ExtractError> {
        match history {
            Some(h) => Ok(optional_str(h, field)? == "pass"),
            None => Ok(false),
        }
    };
    let history_flag = |field: &str| -> Result<bool, ExtractError> {
        history.map_or(Ok(false), |h| optional_bool(h, field))
    };

    let sponsor = required_object(doc, "sponsor")?;
    let cosponsor_count = match doc.get("cosponsors") {
        None | Some(Value::Null) => 0,
        Some(Value::Array(list)) => u32::try_from(list.len()).unwrap_or(u32::MAX),
        Some(_) => return Err(invalid_type("cosponsors", "an array")),
    };
    let (democrat, republican, independent) = party_counts(doc, "cosponsors_by_party")?;

    Ok(BillRecord {
        key: *key,
        short_title: optional_str(doc, "short_title")?,
        official_title: optional_str(doc, "official_title")?,
        popular_title: optional_str(doc, "popular_title")?,
        status: optional_str(doc, "status")?,
        status_at: optional_date(doc, "status_at")?,
        introduced: parse_date("introduced_at", &required_str(doc, "introduced_at")?)?,
        top_subject: optional_str(doc, "subjects_top_term")?,
        house_passed: passed("house_passage_result")?,
        senate_passed: passed("senate_passage_result")?,
        enacted: is_present(doc, "enacted_as") || history_flag("enacted")?,
        vetoed: history_flag("vetoed")?,
        sponsor_id: optional_str(sponsor, "bioguide_id")?,
        sponsor_name: required_str(sponsor, "name")?,
        cosponsor_count,
        cosponsors_democrat: democrat,
        cosponsors_republican: republican,
        cosponsors_independent: independent,
    })
}

fn extract_propublica(bill: &Object, key: &BillKey) -> Result<BillRecord, ExtractError> {
    let (democrat, republican, independent) = party_counts(bill, "cosponsors_by_party")?;

    Ok(BillRecord {
        key: *key,
        short_title: optional_str(bill, "short_title")?,
        official_title: optional_str(bill, "title")?,
        popular_title: optional_str(bill, "popular_title")?,
        status: optional_str(bill, "latest_major_action")?,
        status_at: optional_date(bill, "latest_major_action_date")?,
        introduced: parse_date("introduced_date", &required_str(bill, "introduced_date")?)?,
        top_subject: optional_str(bill, "primary_subject")?,
        house_passed: is_present(bill, "house_passage"),
        senate_passed: is_present(bill, "senate_passage"),
        enacted: is_present(bill, "enacted"),
        vetoed: is_present(bill, "vetoed"),
        sponsor_id: optional_str(bill, "sponsor_id")?,
        sponsor_name: required_str(bill, "sponsor")?,
        cosponsor_count: count(bill, "cosponsors")?,
        cosponsors_democrat: democrat,
        cosponsors_republican: republican,
        cosponsors_independent: independent,
    })
}

/// Unwrap a ProPublica envelope to its only result.
fn single_result(envelope: &Value) -> Result<&Object, ExtractError> {
    let envelope = as_object(envelope, "envelope")?;

    if let Some(status) = envelope.get("status") {
        let status = status.as_str().unwrap_or_default();
        if status != "OK" {
            return Err(ExtractError::QueryError(status.to_string()));
        }
    }

    match envelope.get("results") {
        Some(Value::Array(results)) if results.len() == 1 => as_object(&results[0], "results[0]"),
        Some(Value::Array(results)) => Err(ExtractError::UnexpectedResults(results.len())),
        None | Some(Value::Null) => Err(ExtractError::MissingField("results".into())),
        Some(_) => Err(invalid_type("results", "an array")),
    }
}

// Field helpers

pub(crate) fn invalid_type(field: &str, expected: &'static str) -> ExtractError {
    ExtractError::InvalidType {
        field: field.to_string(),
        expected,
    }
}

pub(crate) fn as_object<'a>(value: &'a Value, field: &str) -> Result<&'a Object, ExtractError> {
    value.as_object().ok_or_else(|| invalid_type(field, "an object"))
}

/// Present and not `null`.
pub(crate) fn is_present(obj: &Object, field: &str) -> bool {
    obj.get(field).is_some_and(|v| !v.is_null())
}

pub(crate) fn required_object<'a>(obj: &'a Object, field: &str) -> Result<&'a Object, ExtractError> {
    optional_object(obj, field)?.ok_or_else(|| ExtractError::MissingField(field.to_string()))
}

pub(crate) fn optional_object<'a>(
    obj: &'a Object,
    field: &str,
) -> Result<Option<&'a Object>, ExtractError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(_) => Err(invalid_type(field, "an object")),
    }
}

/// String or number rendered as text; `None` when absent or null.
fn text(obj: &Object, field: &str) -> Result<Option<String>, ExtractError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(invalid_type(field, "a string")),
    }
}

pub(crate) fn required_str(obj: &Object, field: &str) -> Result<String, ExtractError> {
    text(obj, field)?.ok_or_else(|| ExtractError::MissingField(field.to_string()))
}

pub(crate) fn optional_str(obj: &Object, field: &str) -> Result<String, ExtractError> {
    Ok(text(obj, field)?.unwrap_or_default())
}

pub(crate) fn optional_bool(obj: &Object, field: &str) -> Result<bool, ExtractError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(invalid_type(field, "a boolean")),
    }
}

/// Non-negative count; zero when absent or null.
pub(crate) fn count(obj: &Object, field: &str) -> Result<u32, ExtractError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid_type(field, "a non-negative count")),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| invalid_type(field, "a non-negative count")),
        Some(_) => Err(invalid_type(field, "a non-negative count")),
    }
}

/// Congressional district; `0` for null, absent, or a non-numeric label
/// such as `"At-Large"`.
pub(crate) fn district(obj: &Object, field: &str) -> Result<u32, ExtractError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::String(s)) => Ok(s.trim().parse().unwrap_or(0)),
        Some(Value::Number(_)) => count(obj, field),
        Some(_) => Err(invalid_type(field, "a district number")),
    }
}

/// Democrat, Republican, and Independent cosponsor counts.
fn party_counts(obj: &Object, field: &str) -> Result<(u32, u32, u32), ExtractError> {
    match optional_object(obj, field)? {
        Some(parties) => Ok((
            count(parties, "D")?,
            count(parties, "R")?,
            count(parties, "I")?,
        )),
        None => Ok((0, 0, 0)),
    }
}

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ExtractError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ExtractError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Date part of an optional timestamp; `None` when absent or empty.
fn optional_date(obj: &Object, field: &str) -> Result<Option<NaiveDate>, ExtractError> {
    let value = optional_str(obj, field)?;
    if value.is_empty() {
        return Ok(None);
    }
    parse_timestamp(field, &value).map(|(date, _)| Some(date))
}

/// Split a catalog timestamp into its date and optional time of day.
///
/// Accepts `2015-01-06` and `2015-01-06T14:01:00-05:00`; the offset is ignored.
pub(crate) fn parse_timestamp(
    field: &str,
    value: &str,
) -> Result<(NaiveDate, Option<NaiveTime>), ExtractError> {
    let date_part = value.get(..10).ok_or_else(|| ExtractError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })?;
    let date = parse_date(field, date_part)?;

    if value.len() <= 10 {
        return Ok((date, None));
    }

    let time = value
        .get(11..19)
        .and_then(|t| NaiveTime::parse_from_str(t, TIME_FORMAT).ok())
        .ok_or_else(|| ExtractError::InvalidTime {
            field: field.to_string(),
            value: value.to_string(),
        })?;
    Ok((date, Some(time)))
}
