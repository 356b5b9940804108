//! Join keys between sponsorship records and a legislator roster.

use crate::clean_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Text before the first comma of an already-cleaned name.
///
/// Names without a comma are returned whole.
#[must_use]
pub fn last_name(cleaned: &str) -> &str {
    cleaned.split(',').next().unwrap_or_default().trim()
}

/// Build the roster join key: cleaned last name followed by state and district.
///
/// `join_key("Issa, Darrell E.", "CA", 49)` is `"IssaCA49"`.
#[must_use]
pub fn join_key(name: &str, state: &str, district: u32) -> String {
    let cleaned = clean_name(name);
    format!("{}{}{}", last_name(&cleaned), state.trim(), district)
}

/// Manual join-key overrides for names the cleaning pipeline cannot reconcile.
///
/// Maps a key computed from sponsorship data to the roster key it should be
/// matched against instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideTable(BTreeMap<String, String>);

impl OverrideTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an override, replacing any earlier one for the same key.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.0.insert(from.into(), to.into());
    }

    /// The key to look up in the roster: the override if one exists,
    /// otherwise `key` itself.
    #[must_use]
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.0.get(key).map_or(key, String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OverrideTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_name_takes_text_before_comma() {
        assert_eq!(last_name("Issa, Darrell"), "Issa");
        assert_eq!(last_name("Van Hollen, Chris"), "Van Hollen");
        assert_eq!(last_name("Darrell Issa"), "Darrell Issa");
        assert_eq!(last_name(""), "");
    }

    #[test]
    fn join_key_uses_cleaned_last_name() {
        assert_eq!(join_key("Issa, Darrell E.", "CA", 49), "IssaCA49");
        assert_eq!(join_key("Velázquez, Nydia M.", "NY", 7), "VelazquezNY7");
        assert_eq!(join_key(r#"Smith "Jack" Jr."#, "TX", 0), "SmithTX0");
    }

    #[test]
    fn override_table_resolves_known_keys_only() {
        let mut table = OverrideTable::new();
        table.insert("LujanNM3", "Lujan GrishamNM1");

        assert_eq!(table.resolve("LujanNM3"), "Lujan GrishamNM1");
        assert_eq!(table.resolve("IssaCA49"), "IssaCA49");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn override_table_deserializes_from_map() {
        let json = r#"{"McMorrisWA5": "McMorris RodgersWA5"}"#;
        let table: OverrideTable = serde_json::from_str(json).expect("should parse");
        assert_eq!(table.resolve("McMorrisWA5"), "McMorris RodgersWA5");
    }
}
