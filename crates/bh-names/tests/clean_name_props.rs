//! Property tests for the name-cleaning pipeline.

use bh_names::{clean_name, join_key};
use proptest::prelude::*;

fn name_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{1,10}",
        Just("Jr.".to_string()),
        Just("Sr".to_string()),
        Just(",".to_string()),
        Just("\"Nick\"".to_string()),
        Just("Q.".to_string()),
        Just("Gutiérrez".to_string()),
        Just("O\u{2019}Neal".to_string()),
    ]
}

fn name_like() -> impl Strategy<Value = String> {
    prop::collection::vec(name_fragment(), 0..6).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn cleaning_is_idempotent(name in name_like()) {
        let once = clean_name(&name);
        prop_assert_eq!(clean_name(&once), once);
    }

    #[test]
    fn cleaning_is_idempotent_on_arbitrary_text(name in any::<String>()) {
        let once = clean_name(&name);
        prop_assert_eq!(clean_name(&once), once);
    }

    #[test]
    fn join_key_is_stable_under_cleaning(name in name_like(), district in 0u32..60) {
        let cleaned = clean_name(&name);
        prop_assert_eq!(join_key(&cleaned, "VA", district), join_key(&name, "VA", district));
    }

    #[test]
    fn cleaned_names_never_carry_accents(name in name_like()) {
        let cleaned = clean_name(&name);
        prop_assert!(!cleaned.contains('é'));
        prop_assert!(!cleaned.contains('\u{2019}'), "cleaned name still contains U+2019");
    }
}

#[test]
fn documented_examples() {
    assert_eq!(clean_name("Smith, John Q."), "Smith, John");
    assert_eq!(clean_name("Smith, John"), "Smith, John");
    assert_eq!(clean_name(r#"Smith "Jack" Jr."#), "Smith");
}
