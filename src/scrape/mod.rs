//! The field-extraction engine.
//!
//! Locates keyword anchors in noisy OCR text by approximate matching, pulls
//! out single-line values and bounded multi-line blocks, scrubs repeated
//! page-header boilerplate, and runs the per-gene sub-extraction over the
//! variant blocks. Absent fields become the configured sentinel value —
//! "not found" is data here, not an error.

pub mod anchor;
pub mod assembler;
pub mod fields;
pub mod genes;
pub mod scrub;

pub use assembler::{scrape_document, ScrapedDocument};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The index anchor was not found within tolerance: the document cannot
    /// be keyed, so it is skipped rather than silently colliding with every
    /// other index-less document on the sentinel key.
    #[error("index field `{0}` not found within tolerance")]
    MissingIndex(String),
}
