//! Single-line and block field extraction.

use crate::config::{FieldKind, FieldRole, FieldSpec, ScrapeConfig};
use crate::fuzzy;

use super::anchor;

/// Outcome of a block extraction: the value stored in the output column,
/// plus the raw flattened block when one was delimited (kept for the gene
/// sub-scraper even when the column stores something else).
#[derive(Debug, Clone)]
pub struct BlockCapture {
    pub value: String,
    pub raw: Option<String>,
}

/// Extract the text following `spec`'s anchor up to the next line break,
/// trimmed. Sentinel when the anchor is absent. Sex fields are normalized
/// to the canonical token when one is fuzzily present in the line.
pub fn single_line(body: &str, spec: &FieldSpec, config: &ScrapeConfig) -> String {
    let Some(hit) = anchor::locate(body, &spec.keyword, config.one_line_tolerance) else {
        return config.sentinel.clone();
    };
    let rest = &body[hit.end..];
    let line = match rest.find('\n') {
        Some(pos) => &rest[..pos],
        None => rest,
    };
    let line = line.trim();

    if spec.role == FieldRole::Sex {
        if let Some(token) = normalize_sex(line) {
            return token;
        }
    }
    line.to_string()
}

/// "Female" is checked before "Male": the shorter token matches exactly
/// inside the longer one, so longest-pattern-first keeps both honest.
fn normalize_sex(line: &str) -> Option<String> {
    ["Female", "Male"]
        .iter()
        .find(|token| !fuzzy::find_near_matches(token, line, 1).is_empty())
        .map(|token| (*token).to_string())
}

/// Extract the block opened by `fields[index]`, delimited by the next
/// applicable anchor. Sentinel when the start anchor is absent or no
/// terminator exists within the two-anchor lookahead window.
///
/// The block text is trimmed and its internal newlines replaced by the
/// configured delimiter. A `NumericBlock` stores the first standalone
/// numeric token of the block instead of the block itself.
pub fn block(
    body: &str,
    fields: &[FieldSpec],
    index: usize,
    config: &ScrapeConfig,
) -> BlockCapture {
    let spec = &fields[index];

    let Some(start) = anchor::locate(body, &spec.keyword, config.block_tolerance) else {
        return BlockCapture {
            value: config.sentinel.clone(),
            raw: None,
        };
    };

    let Some(end) = terminator(body, fields, index, start.end, config.block_tolerance) else {
        return BlockCapture {
            value: config.sentinel.clone(),
            raw: None,
        };
    };

    let raw = body[start.end..end].trim().replace('\n', &config.delimiter);
    let value = match spec.kind {
        FieldKind::NumericBlock => {
            first_number(&raw).unwrap_or_else(|| config.sentinel.clone())
        }
        _ => raw.clone(),
    };
    BlockCapture {
        value,
        raw: Some(raw),
    }
}

/// Find where the block starting at `origin` ends.
///
/// Candidates: the next anchor in the sequence searched after `origin`, its
/// capitalized variant searched over the whole body, and the anchor two
/// positions ahead searched after `origin` — the widened search tolerates
/// the immediate next anchor being garbled out of the text entirely while a
/// later one survives. Among all candidates at or past `origin`, the
/// earliest absolute offset wins. The lookahead is strictly bounded to two
/// anchors: a sequence that ends inside the window simply has no
/// terminator.
fn terminator(
    body: &str,
    fields: &[FieldSpec],
    index: usize,
    origin: usize,
    tolerance: u32,
) -> Option<usize> {
    let tail = &body[origin..];
    let mut candidates: Vec<usize> = Vec::new();

    let next = fields.get(index + 1)?;
    for hit in fuzzy::find_near_matches(&next.keyword, tail, tolerance) {
        candidates.push(origin + hit.start);
    }
    for hit in fuzzy::find_near_matches(&anchor::capitalize(&next.keyword), body, tolerance) {
        if hit.start >= origin {
            candidates.push(hit.start);
        }
    }
    if let Some(two_ahead) = fields.get(index + 2) {
        for hit in fuzzy::find_near_matches(&two_ahead.keyword, tail, tolerance) {
            candidates.push(origin + hit.start);
        }
    }

    candidates.into_iter().min()
}

/// First token consisting solely of digits, with tokens split on spaces,
/// percent signs and the line delimiter.
fn first_number(raw: &str) -> Option<String> {
    raw.split(|c: char| c == ' ' || c == '%' || c == '\n')
        .find(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}
