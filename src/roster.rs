//! Gene roster loading.
//!
//! The roster file lists every gene name the sub-scraper looks for, split
//! on whitespace or commas. A missing or unreadable file degrades to an
//! empty roster with a warning: the run still produces the field columns,
//! just no per-gene ones.

use std::path::Path;

use regex::Regex;

/// Read the gene roster from `path`.
pub fn load_roster(path: &Path) -> Vec<String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "gene roster not found, continuing with an empty roster"
            );
            return Vec::new();
        }
    };
    split_names(&raw)
}

fn split_names(raw: &str) -> Vec<String> {
    let sep = Regex::new(r"[\s,]+").expect("static regex");
    sep.split(raw)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
