//! Legislator name cleaning and roster join keys for `bill-harvest`
//!
//! Sponsorship data and legislator rosters spell the same person in slightly
//! different ways (suffixes, nicknames, middle initials, accents). This crate
//! reduces both sides to a comparable form and builds the key used to join
//! them. Matching is best-effort: the [`OverrideTable`] exists for names the
//! cleaning pipeline cannot reconcile on its own.

mod clean;
pub use clean::{clean_name, fold_accents, strip_middle_initial, strip_nickname, strip_suffix};

mod join;
pub use join::{join_key, last_name, OverrideTable};
