//! Anchor location with a case-variant fallback.

use crate::fuzzy::{self, Match};

/// First letter upper-cased, the rest lower-cased — the case variant OCR
/// most often produces for an all-caps section header it failed to read.
pub fn capitalize(keyword: &str) -> String {
    let mut chars = keyword.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Best occurrence of `keyword` in `body`: lowest distance, earliest
/// position on ties. When the literal keyword is absent, retries with its
/// capitalized variant. `None` means not found — never an error.
pub fn locate(body: &str, keyword: &str, tolerance: u32) -> Option<Match> {
    if let Some(best) = fuzzy::find_near_matches(keyword, body, tolerance).first() {
        return Some(*best);
    }
    let variant = capitalize(keyword);
    if variant == keyword {
        return None;
    }
    fuzzy::find_near_matches(&variant, body, tolerance)
        .first()
        .copied()
}
