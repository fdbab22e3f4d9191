//! Removal of repeated page-header boilerplate.
//!
//! Scanned reports repeat the same few header lines on every page, with the
//! accession number and patient name substituted in. Left in place they cut
//! straight through block spans, so once those two fields are known the
//! whole body is scrubbed — destructively, exactly once per document,
//! before any later anchor is located.

use crate::config::ScrapeConfig;
use crate::fuzzy;

/// Substitute the resolved accession and patient values into each header
/// template and splice every fuzzy occurrence out of `text`.
///
/// Removal shifts all subsequent offsets, so each iteration re-searches
/// the updated body instead of reusing stale spans. Runs to exhaustion:
/// re-running on the scrubbed output removes nothing further.
pub fn remove_headers(text: &mut String, accession: &str, patient: &str, config: &ScrapeConfig) {
    for template in &config.header_templates {
        let header = template
            .replace("{accession}", accession)
            .replace("{patient}", patient);

        let mut removed = 0usize;
        while let Some(hit) = fuzzy::find_near_matches(&header, text, config.header_tolerance)
            .first()
            .copied()
        {
            if hit.start == hit.end {
                break;
            }
            text.replace_range(hit.start..hit.end, "");
            removed += 1;
        }
        if removed > 0 {
            tracing::debug!(header = header.as_str(), removed, "scrubbed header boilerplate");
        }
    }
}
