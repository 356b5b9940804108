//! Bill identifiers and the flat records produced from bill documents.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chamber-specific bill type tag used in catalog URLs (e.g. `hr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BillType {
    Hr,
    S,
    Hres,
    Sres,
    Hjres,
    Sjres,
    Hconres,
    Sconres,
}

impl BillType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::S => "s",
            Self::Hres => "hres",
            Self::Sres => "sres",
            Self::Hjres => "hjres",
            Self::Sjres => "sjres",
            Self::Hconres => "hconres",
            Self::Sconres => "sconres",
        }
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known bill type.
#[derive(Debug, thiserror::Error)]
#[error("unknown bill type: {0}")]
pub struct UnknownBillType(String);

impl FromStr for BillType {
    type Err = UnknownBillType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hr" => Ok(Self::Hr),
            "s" => Ok(Self::S),
            "hres" => Ok(Self::Hres),
            "sres" => Ok(Self::Sres),
            "hjres" => Ok(Self::Hjres),
            "sjres" => Ok(Self::Sjres),
            "hconres" => Ok(Self::Hconres),
            "sconres" => Ok(Self::Sconres),
            _ => Err(UnknownBillType(s.to_string())),
        }
    }
}

/// Which external catalog a bill document came from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Bulk `data.json` files published by GovTrack.
    #[default]
    #[value(name = "govtrack")]
    GovTrack,
    /// The ProPublica Congress REST API.
    #[value(name = "propublica")]
    ProPublica,
}

impl SourceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GovTrack => "govtrack",
            Self::ProPublica => "propublica",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite key of a bill: type, number, and congress (session).
///
/// Unique per fetched bill within a run; every action and sponsorship
/// record carries the key of the bill it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BillKey {
    pub bill_type: BillType,
    pub number: u32,
    pub congress: u32,
}

impl BillKey {
    #[must_use]
    pub const fn new(bill_type: BillType, number: u32, congress: u32) -> Self {
        Self {
            bill_type,
            number,
            congress,
        }
    }

    /// Catalog slug without the congress, e.g. `hr21`.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}{}", self.bill_type, self.number)
    }
}

impl fmt::Display for BillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{}", self.bill_type, self.number, self.congress)
    }
}

/// General information about one bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillRecord {
    pub key: BillKey,
    pub short_title: String,
    pub official_title: String,
    pub popular_title: String,
    pub status: String,
    pub status_at: Option<NaiveDate>,
    pub introduced: NaiveDate,
    pub top_subject: String,
    pub house_passed: bool,
    pub senate_passed: bool,
    pub enacted: bool,
    pub vetoed: bool,
    pub sponsor_id: String,
    pub sponsor_name: String,
    pub cosponsor_count: u32,
    pub cosponsors_democrat: u32,
    pub cosponsors_republican: u32,
    pub cosponsors_independent: u32,
}

/// Status label forced onto the first action of every bill.
pub const INTRODUCED: &str = "INTRODUCED";

/// One action taken on a bill, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub bill: BillKey,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub status: String,
    pub action_type: String,
    /// Committee names joined with `|`.
    pub committees: Option<String>,
    pub text: String,
}

/// How a legislator is attached to a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SponsorRole {
    Sponsor,
    OriginalCosponsor,
    Cosponsor,
}

impl SponsorRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sponsor => "sponsor",
            Self::OriginalCosponsor => "original cosponsor",
            Self::Cosponsor => "cosponsor",
        }
    }
}

impl fmt::Display for SponsorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sponsor or cosponsor of a bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorshipRecord {
    pub bill: BillKey,
    pub role: SponsorRole,
    pub name: String,
    pub title: String,
    pub state: String,
    /// `0` when the source has no district (senators, at-large seats).
    pub district: u32,
    pub joined_at: NaiveDate,
    pub bioguide_id: Option<String>,
}
