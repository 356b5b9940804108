//! One record per legislator, joined against the roster.

use bh_names::{clean_name, join_key, OverrideTable};
use std::collections::{HashMap, HashSet};

use super::roster::RosterEntry;
use crate::congress::SponsorshipRecord;

/// A distinct legislator observed in sponsorship data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegislatorRecord {
    /// Name as first seen in sponsorship data.
    pub name: String,
    pub clean_name: String,
    pub title: String,
    pub state: String,
    pub district: u32,
    pub bioguide_id: Option<String>,
    pub join_key: String,
    /// Roster fields; empty when the join found no match.
    pub party: String,
    pub twitter: String,
    pub facebook: String,
    /// `None` until enriched; [`super::FOLLOWERS_UNAVAILABLE`] when the lookup failed.
    pub followers: Option<i64>,
}

impl LegislatorRecord {
    #[must_use]
    pub fn is_matched(&self) -> bool {
        !self.party.is_empty() || !self.twitter.is_empty() || !self.facebook.is_empty()
    }
}

/// Collapse sponsorships to one record per (clean name, state, district),
/// in first-seen order, and fill party and handles from the roster.
///
/// Each roster entry is indexed under both its sort-name and display-name
/// keys. Keys are not guaranteed unique; the first entry with a given key wins.
#[must_use]
pub fn reconcile(
    sponsorships: &[SponsorshipRecord],
    roster: &[RosterEntry],
    overrides: &OverrideTable,
) -> Vec<LegislatorRecord> {
    let mut by_key: HashMap<String, &RosterEntry> = HashMap::with_capacity(roster.len() * 2);
    for entry in roster {
        for key in entry.join_keys() {
            if by_key.contains_key(&key) {
                tracing::debug!(%key, name = %entry.name, "duplicate roster join key ignored");
            } else {
                by_key.insert(key, entry);
            }
        }
    }

    let mut seen = HashSet::new();
    let mut legislators = Vec::new();

    for sponsorship in sponsorships {
        let cleaned = clean_name(&sponsorship.name);
        let state = sponsorship.state.trim();
        if !seen.insert((cleaned.clone(), state.to_string(), sponsorship.district)) {
            continue;
        }

        let key = join_key(&sponsorship.name, state, sponsorship.district);
        let matched = by_key.get(overrides.resolve(&key)).copied();
        if matched.is_none() {
            tracing::debug!(%key, name = %sponsorship.name, "no roster match");
        }

        legislators.push(LegislatorRecord {
            name: sponsorship.name.clone(),
            clean_name: cleaned,
            title: sponsorship.title.clone(),
            state: state.to_string(),
            district: sponsorship.district,
            bioguide_id: sponsorship.bioguide_id.clone(),
            join_key: key,
            party: matched.map(|e| e.party.clone()).unwrap_or_default(),
            twitter: matched.map(|e| e.twitter.clone()).unwrap_or_default(),
            facebook: matched.map(|e| e.facebook.clone()).unwrap_or_default(),
            followers: None,
        });
    }

    let matched = legislators.iter().filter(|l| l.is_matched()).count();
    tracing::info!(
        legislators = legislators.len(),
        matched,
        unmatched = legislators.len() - matched,
        "reconciled sponsors against roster"
    );

    legislators
}
