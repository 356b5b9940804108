//! Legislator identity: deduplicating sponsors and enriching them from a roster.
//!
//! - [`roster`] - Fetch an external legislator roster (party, social handles)
//! - [`reconcile`] - Collapse sponsorships into one record per legislator and
//!   join against the roster with [`bh_names::join_key`]
//! - [`followers`] - Best-effort follower counts per twitter handle
//!
//! Name matching can silently miss. Unmatched legislators keep empty roster
//! fields, and known misses are fixed through the override table in config.

pub mod followers;
pub mod reconcile;
pub mod roster;

pub use followers::{
    enrich_followers, FollowerLookup, FollowerLookupError, TwitterFollowerLookup,
    FOLLOWERS_UNAVAILABLE,
};
pub use reconcile::{reconcile, LegislatorRecord};
pub use roster::{parse_roster_csv, EveryPoliticianRoster, RosterEntry, RosterError, RosterSource};
