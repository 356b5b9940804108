//! The ordered name-cleaning pipeline.
//!
//! Steps run in a fixed order: generational suffix, quoted nickname,
//! trailing middle initial, then accent folding. Later steps assume the
//! earlier ones have already run (a nickname sitting before `Jr.` is only
//! trailing once the suffix is gone).

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

#[allow(clippy::expect_used)]
fn suffix_re() -> &'static Regex {
    static SUFFIX_RE: OnceLock<Regex> = OnceLock::new();
    SUFFIX_RE.get_or_init(|| {
        Regex::new(r"(?i)(?:\s*,\s*|\s+)(?:jr|sr)\.?\s*$").expect("valid suffix regex")
    })
}

#[allow(clippy::expect_used)]
fn nickname_re() -> &'static Regex {
    static NICKNAME_RE: OnceLock<Regex> = OnceLock::new();
    NICKNAME_RE.get_or_init(|| {
        Regex::new(r#"\s*["\u{201C}][^"\u{201C}\u{201D}]*["\u{201D}]"#)
            .expect("valid nickname regex")
    })
}

// A lone initial right after the comma is a first name, not a middle initial.
#[allow(clippy::expect_used)]
fn middle_initial_re() -> &'static Regex {
    static MIDDLE_INITIAL_RE: OnceLock<Regex> = OnceLock::new();
    MIDDLE_INITIAL_RE.get_or_init(|| {
        Regex::new(r"([^,\s])(?:\s+[A-Za-z]\.)+\s*$").expect("valid middle initial regex")
    })
}

/// Characters folded to ASCII by [`fold_accents`].
const ACCENT_FOLDS: &[(char, char)] = &[
    ('á', 'a'),
    ('à', 'a'),
    ('â', 'a'),
    ('ä', 'a'),
    ('ã', 'a'),
    ('å', 'a'),
    ('é', 'e'),
    ('è', 'e'),
    ('ê', 'e'),
    ('ë', 'e'),
    ('í', 'i'),
    ('ì', 'i'),
    ('î', 'i'),
    ('ï', 'i'),
    ('ó', 'o'),
    ('ò', 'o'),
    ('ô', 'o'),
    ('ö', 'o'),
    ('õ', 'o'),
    ('ú', 'u'),
    ('ù', 'u'),
    ('û', 'u'),
    ('ü', 'u'),
    ('ñ', 'n'),
    ('ç', 'c'),
    ('Á', 'A'),
    ('À', 'A'),
    ('Â', 'A'),
    ('Ä', 'A'),
    ('Ã', 'A'),
    ('Å', 'A'),
    ('É', 'E'),
    ('È', 'E'),
    ('Ê', 'E'),
    ('Ë', 'E'),
    ('Í', 'I'),
    ('Ì', 'I'),
    ('Î', 'I'),
    ('Ï', 'I'),
    ('Ó', 'O'),
    ('Ò', 'O'),
    ('Ô', 'O'),
    ('Ö', 'O'),
    ('Õ', 'O'),
    ('Ú', 'U'),
    ('Ù', 'U'),
    ('Û', 'U'),
    ('Ü', 'U'),
    ('Ñ', 'N'),
    ('Ç', 'C'),
    ('\u{2019}', '\''),
];

/// Remove a trailing `Jr.`/`Sr.` suffix, with or without a preceding comma.
#[must_use]
pub fn strip_suffix(name: &str) -> Cow<'_, str> {
    suffix_re().replace(name, "")
}

/// Remove quoted nickname segments such as `"Jack"`.
#[must_use]
pub fn strip_nickname(name: &str) -> Cow<'_, str> {
    nickname_re().replace_all(name, "")
}

/// Remove trailing single-letter initials followed by a period.
///
/// `"Smith, John Q."` becomes `"Smith, John"`; `"Smith, J."` is left alone.
#[must_use]
pub fn strip_middle_initial(name: &str) -> Cow<'_, str> {
    middle_initial_re().replace(name, "$1")
}

/// Replace the supported accented Latin letters and the right single
/// quotation mark with their ASCII equivalents.
#[must_use]
pub fn fold_accents(name: &str) -> String {
    name.chars()
        .map(|c| {
            ACCENT_FOLDS
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .collect()
}

fn squash_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_once(name: &str) -> String {
    let name = strip_suffix(name);
    let name = strip_nickname(&name);
    let name = strip_middle_initial(&name);
    squash_whitespace(&fold_accents(&name))
}

/// Run the full cleaning pipeline.
///
/// The ordered steps are repeated until the name stops changing, so the
/// result is stable under re-cleaning: `clean_name(&clean_name(x)) == clean_name(x)`.
#[must_use]
pub fn clean_name(name: &str) -> String {
    let mut current = squash_whitespace(name);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
