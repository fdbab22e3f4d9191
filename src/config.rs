//! Scrape configuration: tolerances, sentinel, field sequence, headers.
//!
//! Everything the extraction engine treats as fixed — the ordered anchor
//! sequence, the edit-distance tolerances, the header boilerplate — lives
//! in one explicit [`ScrapeConfig`] value constructed at startup and passed
//! down, never ambient globals. The compiled-in defaults describe the
//! OncoPanel report layout; a JSON file can override any subset of fields.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const APP_NAME: &str = "oncoscrape";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// How a field's value is pulled out of the text once its anchor is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Everything from the anchor to the next line break.
    SingleLine,
    /// Everything from the anchor to the next applicable anchor.
    Block,
    /// A block whose stored value is its first standalone numeric token;
    /// the raw block text is kept aside for gene sub-scraping.
    NumericBlock,
    /// Never extracted — only terminates the block before it.
    Terminator,
}

/// Extra handling applied to a field beyond its extraction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    #[default]
    General,
    /// Normalize the extracted line to "Male"/"Female" when fuzzily present.
    Sex,
    /// Raw block feeds the per-gene tiered-variant scan.
    TierVariants,
    /// Raw block feeds the per-gene copy-number-variant scan.
    CopyNumber,
}

/// One keyword anchor and the output column it populates.
///
/// The position of a spec in [`ScrapeConfig::fields`] is semantic: it
/// decides which later anchors are valid block terminators. Reordering the
/// sequence changes extraction results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub keyword: String,
    /// Output column name; empty for pure terminators.
    #[serde(default)]
    pub column: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub role: FieldRole,
}

impl FieldSpec {
    fn new(keyword: &str, column: &str, kind: FieldKind) -> Self {
        Self {
            keyword: keyword.to_string(),
            column: column.to_string(),
            kind,
            role: FieldRole::General,
        }
    }

    fn with_role(mut self, role: FieldRole) -> Self {
        self.role = role;
        self
    }
}

/// Full configuration for one scraping run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Directory holding the PDF reports to scan.
    pub report_dir: PathBuf,
    /// Sidecar text cache; defaults to `<report_dir>/text-files`.
    pub text_dir: Option<PathBuf>,
    /// Output CSV path.
    pub output_path: PathBuf,
    /// Gene roster file (whitespace- or comma-delimited names).
    pub roster_path: PathBuf,

    /// Placeholder written wherever nothing was found within tolerance.
    pub sentinel: String,
    /// Joins the lines of a flattened block; splits them again for the
    /// gene scan.
    pub delimiter: String,

    /// Edit-distance tolerance for single-line anchors. Loose — context
    /// disambiguates short labels even in noisy OCR text.
    pub one_line_tolerance: u32,
    /// Tolerance for block anchors. Tight — section headers are long and a
    /// false positive corrupts the block boundary.
    pub block_tolerance: u32,
    /// Tolerance for header boilerplate removal.
    pub header_tolerance: u32,

    /// Column whose extracted value keys the output table.
    pub index_column: String,
    /// Column substituted into the `{accession}` header-template slot.
    pub accession_column: String,
    /// Column substituted into the `{patient}` header-template slot.
    pub patient_column: String,

    /// The ordered anchor sequence.
    pub fields: Vec<FieldSpec>,
    /// Per-page boilerplate, with optional `{accession}`/`{patient}` slots,
    /// removed once those two fields are known.
    pub header_templates: Vec<String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        use FieldKind::{Block, NumericBlock, SingleLine, Terminator};

        Self {
            report_dir: PathBuf::from("oncopanel-reports-to-scan"),
            text_dir: None,
            output_path: PathBuf::from("oncopanel-report-data.csv"),
            roster_path: PathBuf::from("447-genes.txt"),

            sentinel: "None".to_string(),
            delimiter: "\n".to_string(),

            one_line_tolerance: 5,
            block_tolerance: 1,
            header_tolerance: 3,

            index_column: "Accession Number".to_string(),
            accession_column: "BL Accession Number".to_string(),
            patient_column: "Patient Name".to_string(),

            fields: vec![
                FieldSpec::new(
                    "Accession numbers on blocks submitted - ",
                    "Accession Number",
                    SingleLine,
                ),
                FieldSpec::new("Accession No.: ", "BL Accession Number", SingleLine),
                FieldSpec::new("Patient Name: ", "Patient Name", SingleLine),
                FieldSpec::new("Unit Number(s): ", "Unit Number", SingleLine),
                FieldSpec::new("Birth Date:", "Birth Date", SingleLine),
                FieldSpec::new("Age Sex: ", "Sex", SingleLine).with_role(FieldRole::Sex),
                FieldSpec::new("Test Performed - ", "Test Performed", SingleLine),
                FieldSpec::new("Test Description - ", "Test Description", SingleLine),
                FieldSpec::new(
                    "Original Pathologic Diagnosis - ",
                    "Original Pathologic Diagnosis",
                    SingleLine,
                ),
                FieldSpec::new(
                    "Estimated percentage of neoplastic cells in submitted specimen - ",
                    "Neoplastic Cells (%)",
                    SingleLine,
                ),
                FieldSpec::new("DNA VARIANTS:", "Aligned Reads", Block),
                FieldSpec::new(
                    "aligned, high quality reads for this specimen with a mean of ",
                    "Mean Reads Across Targeted Exons",
                    Block,
                ),
                FieldSpec::new(
                    "reads across all targeted exons and ",
                    "Exons with >30 Reads (%)",
                    Block,
                ),
                FieldSpec::new("Tier 1 variants:", "Tier 1 Variants", NumericBlock)
                    .with_role(FieldRole::TierVariants),
                FieldSpec::new("Tier 2 variants:", "Tier 2 Variants", NumericBlock)
                    .with_role(FieldRole::TierVariants),
                FieldSpec::new("Tier 3 variants:", "Tier 3 Variants", NumericBlock)
                    .with_role(FieldRole::TierVariants),
                FieldSpec::new("Tier 4 variants:", "Tier 4 Variants", NumericBlock)
                    .with_role(FieldRole::TierVariants),
                FieldSpec::new("Tier 5 variants:", "Tier 5 Variants", NumericBlock)
                    .with_role(FieldRole::TierVariants),
                FieldSpec::new("COPY NUMBER VARIATIONS:", "Copy Number Variations", Block)
                    .with_role(FieldRole::CopyNumber),
                FieldSpec::new(
                    "CHROMOSOMAL REARRANGEMENT: ",
                    "Chromosomal Rearrangement",
                    Block,
                ),
                FieldSpec::new("INTERPRETATION", "", Terminator),
            ],

            header_templates: vec![
                "Brigham and Women’s Hospital".to_string(),
                "Molecular Diagnostics Laboratory".to_string(),
                "MOLECULAR DIAGNOSTICS REPORT".to_string(),
                "Page x of y".to_string(),
                "Accession: {accession} Patient Name: {patient}".to_string(),
            ],
        }
    }
}

impl ScrapeConfig {
    /// Load overrides from a JSON file on top of the compiled-in defaults.
    /// Absent keys keep their default values.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Sidecar text cache directory (`text_dir` or `<report_dir>/text-files`).
    pub fn text_cache_dir(&self) -> PathBuf {
        self.text_dir
            .clone()
            .unwrap_or_else(|| self.report_dir.join("text-files"))
    }

    /// The spec whose column keys the output table.
    pub fn index_field(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.column == self.index_column)
    }
}
