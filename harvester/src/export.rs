//! CSV tables written once at the end of a run.
//!
//! One file per table, named `{type}{congress}_{table}.csv`. Every file gets
//! a header row even when the table is empty.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::batch::{BatchOutput, BillStatusRecord};
use crate::congress::{
    ActionRecord, BillKey, BillRecord, BillType, SponsorRole, SponsorshipRecord,
};
use crate::identity::LegislatorRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A serializable row with a fixed column order.
///
/// `HEADERS` must list the struct's fields in declaration order.
pub trait TableRow: Serialize {
    const TABLE: &'static str;
    const HEADERS: &'static [&'static str];
}

#[derive(Debug, Serialize)]
pub struct BillRow<'a> {
    bill_id: String,
    bill_type: BillType,
    number: u32,
    congress: u32,
    short_title: &'a str,
    official_title: &'a str,
    popular_title: &'a str,
    status: &'a str,
    status_at: Option<NaiveDate>,
    introduced: NaiveDate,
    top_subject: &'a str,
    house_passed: bool,
    senate_passed: bool,
    enacted: bool,
    vetoed: bool,
    sponsor_id: &'a str,
    sponsor_name: &'a str,
    cosponsor_count: u32,
    cosponsors_democrat: u32,
    cosponsors_republican: u32,
    cosponsors_independent: u32,
}

impl TableRow for BillRow<'_> {
    const TABLE: &'static str = "bills";
    const HEADERS: &'static [&'static str] = &[
        "bill_id",
        "bill_type",
        "number",
        "congress",
        "short_title",
        "official_title",
        "popular_title",
        "status",
        "status_at",
        "introduced",
        "top_subject",
        "house_passed",
        "senate_passed",
        "enacted",
        "vetoed",
        "sponsor_id",
        "sponsor_name",
        "cosponsor_count",
        "cosponsors_democrat",
        "cosponsors_republican",
        "cosponsors_independent",
    ];
}

impl<'a> From<&'a BillRecord> for BillRow<'a> {
    fn from(bill: &'a BillRecord) -> Self {
        Self {
            bill_id: bill.key.to_string(),
            bill_type: bill.key.bill_type,
            number: bill.key.number,
            congress: bill.key.congress,
            short_title: &bill.short_title,
            official_title: &bill.official_title,
            popular_title: &bill.popular_title,
            status: &bill.status,
            status_at: bill.status_at,
            introduced: bill.introduced,
            top_subject: &bill.top_subject,
            house_passed: bill.house_passed,
            senate_passed: bill.senate_passed,
            enacted: bill.enacted,
            vetoed: bill.vetoed,
            sponsor_id: &bill.sponsor_id,
            sponsor_name: &bill.sponsor_name,
            cosponsor_count: bill.cosponsor_count,
            cosponsors_democrat: bill.cosponsors_democrat,
            cosponsors_republican: bill.cosponsors_republican,
            cosponsors_independent: bill.cosponsors_independent,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActionRow<'a> {
    bill_id: String,
    date: NaiveDate,
    time: Option<NaiveTime>,
    status: &'a str,
    action_type: &'a str,
    committees: Option<&'a str>,
    text: &'a str,
}

impl TableRow for ActionRow<'_> {
    const TABLE: &'static str = "actions";
    const HEADERS: &'static [&'static str] = &[
        "bill_id",
        "date",
        "time",
        "status",
        "action_type",
        "committees",
        "text",
    ];
}

impl<'a> From<&'a ActionRecord> for ActionRow<'a> {
    fn from(action: &'a ActionRecord) -> Self {
        Self {
            bill_id: action.bill.to_string(),
            date: action.date,
            time: action.time,
            status: &action.status,
            action_type: &action.action_type,
            committees: action.committees.as_deref(),
            text: &action.text,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SponsorshipRow<'a> {
    bill_id: String,
    role: &'static str,
    name: &'a str,
    title: &'a str,
    state: &'a str,
    district: u32,
    joined_at: NaiveDate,
    bioguide_id: Option<&'a str>,
}

impl TableRow for SponsorshipRow<'_> {
    const TABLE: &'static str = "sponsorships";
    const HEADERS: &'static [&'static str] = &[
        "bill_id",
        "role",
        "name",
        "title",
        "state",
        "district",
        "joined_at",
        "bioguide_id",
    ];
}

impl<'a> From<&'a SponsorshipRecord> for SponsorshipRow<'a> {
    fn from(s: &'a SponsorshipRecord) -> Self {
        Self {
            bill_id: s.bill.to_string(),
            role: s.role.as_str(),
            name: &s.name,
            title: &s.title,
            state: &s.state,
            district: s.district,
            joined_at: s.joined_at,
            bioguide_id: s.bioguide_id.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LegislatorRow<'a> {
    name: &'a str,
    clean_name: &'a str,
    title: &'a str,
    state: &'a str,
    district: u32,
    bioguide_id: Option<&'a str>,
    join_key: &'a str,
    party: &'a str,
    twitter: &'a str,
    facebook: &'a str,
    followers: Option<i64>,
}

impl TableRow for LegislatorRow<'_> {
    const TABLE: &'static str = "legislators";
    const HEADERS: &'static [&'static str] = &[
        "name",
        "clean_name",
        "title",
        "state",
        "district",
        "bioguide_id",
        "join_key",
        "party",
        "twitter",
        "facebook",
        "followers",
    ];
}

impl<'a> From<&'a LegislatorRecord> for LegislatorRow<'a> {
    fn from(l: &'a LegislatorRecord) -> Self {
        Self {
            name: &l.name,
            clean_name: &l.clean_name,
            title: &l.title,
            state: &l.state,
            district: l.district,
            bioguide_id: l.bioguide_id.as_deref(),
            join_key: &l.join_key,
            party: &l.party,
            twitter: &l.twitter,
            facebook: &l.facebook,
            followers: l.followers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusRow<'a> {
    bill_id: String,
    number: u32,
    status: &'static str,
    detail: &'a str,
}

impl TableRow for StatusRow<'_> {
    const TABLE: &'static str = "status";
    const HEADERS: &'static [&'static str] = &["bill_id", "number", "status", "detail"];
}

impl<'a> From<&'a BillStatusRecord> for StatusRow<'a> {
    fn from(s: &'a BillStatusRecord) -> Self {
        Self {
            bill_id: s.key.to_string(),
            number: s.key.number,
            status: s.status.as_str(),
            detail: &s.detail,
        }
    }
}

/// Bill-by-legislator grid of sponsorship roles.
///
/// One row per parsed bill and one column per distinct sponsorship name, in
/// first-seen order. Cells hold `0` for the sponsor, `1` for an original
/// cosponsor, `2` for a later cosponsor and `-` otherwise.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SponsorshipMatrix {
    pub legislators: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SponsorshipMatrix {
    pub const TABLE: &'static str = "matrix";
    pub const BILL_COLUMNS: &'static [&'static str] =
        &["_type", "_id", "_status", "_sponsor", "_subject"];
    const FILL: &'static str = "-";
    const NO_SUBJECT: &'static str = "None";

    #[must_use]
    pub fn build(output: &BatchOutput) -> Self {
        let mut legislators: Vec<String> = Vec::new();
        let mut columns: HashMap<&str, usize> = HashMap::new();
        for s in &output.sponsorships {
            columns.entry(s.name.as_str()).or_insert_with(|| {
                legislators.push(s.name.clone());
                legislators.len() - 1
            });
        }

        let mut cells: HashMap<BillKey, Vec<&'static str>> = output
            .bills
            .iter()
            .map(|b| (b.key, vec![Self::FILL; legislators.len()]))
            .collect();
        for s in &output.sponsorships {
            if let (Some(row), Some(&col)) =
                (cells.get_mut(&s.bill), columns.get(s.name.as_str()))
            {
                row[col] = role_code(s.role);
            }
        }

        let rows = output
            .bills
            .iter()
            .map(|bill| {
                let subject = if bill.top_subject.is_empty() {
                    Self::NO_SUBJECT
                } else {
                    bill.top_subject.as_str()
                };
                let mut row = vec![
                    bill.key.bill_type.to_string(),
                    bill.key.number.to_string(),
                    bill.status.clone(),
                    bill.sponsor_name.clone(),
                    subject.to_string(),
                ];
                if let Some(codes) = cells.get(&bill.key) {
                    row.extend(codes.iter().map(|c| (*c).to_string()));
                }
                row
            })
            .collect();

        Self { legislators, rows }
    }

    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        Self::BILL_COLUMNS
            .iter()
            .copied()
            .chain(self.legislators.iter().map(String::as_str))
            .collect()
    }
}

const fn role_code(role: SponsorRole) -> &'static str {
    match role {
        SponsorRole::Sponsor => "0",
        SponsorRole::OriginalCosponsor => "1",
        SponsorRole::Cosponsor => "2",
    }
}

/// File name prefix for a run, e.g. `hr114`.
#[must_use]
pub fn table_prefix(bill_type: BillType, congress: u32) -> String {
    format!("{bill_type}{congress}")
}

/// Write one table to `{dir}/{prefix}_{table}.csv`, returning its path.
///
/// # Errors
/// Returns an error if the file cannot be created or a row fails to serialize.
pub fn write_table<R: TableRow>(
    dir: &Path,
    prefix: &str,
    rows: impl IntoIterator<Item = R>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{prefix}_{}.csv", R::TABLE));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)?;

    writer.write_record(R::HEADERS)?;
    let mut written = 0usize;
    for row in rows {
        writer.serialize(row)?;
        written += 1;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), rows = written, "wrote table");
    Ok(path)
}

/// Write the sponsorship matrix to `{dir}/{prefix}_matrix.csv`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_matrix(
    dir: &Path,
    prefix: &str,
    output: &BatchOutput,
) -> Result<PathBuf, ExportError> {
    let matrix = SponsorshipMatrix::build(output);
    let path = dir.join(format!("{prefix}_{}.csv", SponsorshipMatrix::TABLE));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)?;

    writer.write_record(matrix.headers())?;
    for row in &matrix.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    tracing::info!(
        path = %path.display(),
        rows = matrix.rows.len(),
        legislators = matrix.legislators.len(),
        "wrote matrix"
    );
    Ok(path)
}

/// Write every table for a run into `dir`, creating it if needed.
///
/// # Errors
/// Returns an error if the directory or any file cannot be written.
pub fn write_tables(
    dir: &Path,
    prefix: &str,
    output: &BatchOutput,
    legislators: &[LegislatorRecord],
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir)?;

    Ok(vec![
        write_table(dir, prefix, output.bills.iter().map(BillRow::from))?,
        write_table(dir, prefix, output.actions.iter().map(ActionRow::from))?,
        write_table(
            dir,
            prefix,
            output.sponsorships.iter().map(SponsorshipRow::from),
        )?,
        write_table(dir, prefix, legislators.iter().map(LegislatorRow::from))?,
        write_table(dir, prefix, output.statuses.iter().map(StatusRow::from))?,
        write_matrix(dir, prefix, output)?,
    ])
}
