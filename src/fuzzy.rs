//! Approximate substring matching with a bounded edit distance.
//!
//! OCR output garbles section headers and field labels unpredictably, so
//! every anchor lookup in this crate goes through [`find_near_matches`]
//! rather than exact search. The matcher runs a Sellers-style dynamic
//! program (Levenshtein distance with a free start position in the text),
//! tracking the start of the best-scoring substring per cell so each hit
//! reports a sliceable span.

/// A single approximate occurrence of a pattern in a body of text.
///
/// `start` and `end` are byte offsets into the searched text, always on
/// character boundaries, so `&text[m.start..m.end]` is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub dist: u32,
}

impl Match {
    /// The matched span of the searched text.
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

/// Find all occurrences of `pattern` in `text` within `max_dist` edits
/// (insertions, deletions, substitutions).
///
/// Each maximal run of adjacent candidate end positions is consolidated to
/// the locally best hit, so one garbled occurrence yields one match, not a
/// cluster. The result is sorted ascending by distance; ties keep
/// left-to-right discovery order, so the first element is always the
/// lowest-distance, earliest occurrence. No hit (or an empty pattern)
/// returns an empty vector — never an error. A `max_dist` of 0 degenerates
/// to exact substring search.
pub fn find_near_matches(pattern: &str, text: &str, max_dist: u32) -> Vec<Match> {
    let pat: Vec<char> = pattern.chars().collect();
    if pat.is_empty() {
        return Vec::new();
    }

    // Byte offset of every character boundary, so char-indexed DP results
    // can be reported as sliceable byte spans.
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    bounds.push(text.len());

    let m = pat.len();
    // One DP cell per pattern prefix: (distance, start position) of the
    // best alignment of that prefix against a substring ending at the
    // current text position. Ties prefer the smaller start, keeping the
    // longest span.
    let mut prev: Vec<(u32, usize)> = (0..=m).map(|i| (i as u32, 0)).collect();
    let mut cur: Vec<(u32, usize)> = prev.clone();

    // (start, end, dist) in character positions, ends strictly increasing.
    let mut candidates: Vec<(usize, usize, u32)> = Vec::new();

    for (j, tc) in text.chars().enumerate() {
        cur[0] = (0, j + 1);
        for i in 1..=m {
            let sub = u32::from(pat[i - 1] != tc);
            let mut best = (prev[i - 1].0 + sub, prev[i - 1].1);
            let del = (cur[i - 1].0 + 1, cur[i - 1].1);
            if del < best {
                best = del;
            }
            let ins = (prev[i].0 + 1, prev[i].1);
            if ins < best {
                best = ins;
            }
            cur[i] = best;
        }
        if cur[m].0 <= max_dist {
            candidates.push((cur[m].1, j + 1, cur[m].0));
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    let mut matches = consolidate(&candidates);
    for hit in &mut matches {
        hit.start = bounds[hit.start];
        hit.end = bounds[hit.end];
    }
    // Stable: equal distances stay in left-to-right order.
    matches.sort_by_key(|hit| hit.dist);
    matches
}

/// Collapse each maximal run of adjacent end positions into the single
/// best hit of that run (minimum distance, earliest end on ties). Runs are
/// delimited by gaps in the end positions: a new occurrence further along
/// the text starts a new run.
fn consolidate(candidates: &[(usize, usize, u32)]) -> Vec<Match> {
    let mut matches: Vec<Match> = Vec::new();
    let mut run: Option<Match> = None;
    let mut last_end = 0;

    for &(start, end, dist) in candidates {
        run = match run.take() {
            Some(best) if end == last_end + 1 => {
                if dist < best.dist {
                    Some(Match { start, end, dist })
                } else {
                    Some(best)
                }
            }
            Some(best) => {
                matches.push(best);
                Some(Match { start, end, dist })
            }
            None => Some(Match { start, end, dist }),
        };
        last_end = end;
    }
    matches.extend(run);
    matches
}
