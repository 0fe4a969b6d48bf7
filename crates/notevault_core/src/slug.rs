//! Slug derivation from note titles.
//!
//! # Responsibility
//! - Produce a URL-safe slug from a free-form title.
//! - Transliterate Cyrillic input so non-Latin titles still yield slugs.
//!
//! # Invariants
//! - Output matches `[a-z0-9_-]*` and never exceeds `SLUG_MAX_CHARS`.
//! - Derivation is deterministic for a given title.

use crate::model::note::SLUG_MAX_CHARS;
use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATOR_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_]+").expect("valid separator regex"));

/// Cyrillic-to-Latin pairs, lowercase only; input is lowercased first.
const CYRILLIC_TRANSLIT: &[(char, &str)] = &[
    ('а', "a"),
    ('б', "b"),
    ('в', "v"),
    ('г', "g"),
    ('д', "d"),
    ('е', "e"),
    ('ё', "e"),
    ('ж', "zh"),
    ('з', "z"),
    ('и', "i"),
    ('й', "j"),
    ('к', "k"),
    ('л', "l"),
    ('м', "m"),
    ('н', "n"),
    ('о', "o"),
    ('п', "p"),
    ('р', "r"),
    ('с', "s"),
    ('т', "t"),
    ('у', "u"),
    ('ф', "f"),
    ('х', "h"),
    ('ц', "c"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "sch"),
    ('ъ', ""),
    ('ы', "y"),
    ('ь', ""),
    ('э', "e"),
    ('ю', "yu"),
    ('я', "ya"),
];

/// Derives a URL-safe slug from a title.
///
/// Rules:
/// - lowercase, Cyrillic transliterated to Latin;
/// - every run of other non-alphanumeric characters becomes a single `-`;
/// - leading/trailing `-` trimmed;
/// - result truncated to `SLUG_MAX_CHARS`.
///
/// Returns an empty string when the title has no transliterable content;
/// callers must treat that as a validation failure, not a usable slug.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut transliterated = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        match transliterate(ch) {
            Some(replacement) => transliterated.push_str(replacement),
            None => transliterated.push(ch),
        }
    }

    let separated = SEPARATOR_RUN_RE.replace_all(&transliterated, "-");
    let trimmed = separated.trim_matches('-');
    trimmed.chars().take(SLUG_MAX_CHARS).collect()
}

fn transliterate(ch: char) -> Option<&'static str> {
    CYRILLIC_TRANSLIT
        .iter()
        .find(|(cyr, _)| *cyr == ch)
        .map(|(_, latin)| *latin)
}
