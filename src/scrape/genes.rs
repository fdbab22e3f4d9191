//! Per-gene sub-extraction over the copy-number and tiered-variant blocks.
//!
//! Every gene in the roster is scanned for by plain substring containment
//! in the two pre-extracted line lists. A gene hit in several lines
//! contributes to every attribute it can — values accumulate comma-joined,
//! never overwritten. A line that lacks an expected token (no parenthesis,
//! no "exon" marker) simply contributes nothing for that attribute; the
//! other lines and attributes still count.

use crate::config::ScrapeConfig;
use crate::fuzzy;

/// Attribute columns emitted for every gene, in output order.
pub const GENE_ATTRIBUTES: [&str; 7] = [
    "Number of Mutations",
    "DNA Change",
    "Protein Change",
    "Exon",
    "% Reads",
    "CNV Type",
    "CNV Locus",
];

/// Copy-number classes, fuzzy-matched in order; the first hit wins and maps
/// to its 1-based ordinal, an unmatched line to "0".
const CNV_CLASSES: [&str; 4] = ["Single", "Deep", "Low", "High"];
const CNV_CLASS_TOLERANCE: u32 = 1;

/// The percent-reads phrasing varies across report vintages, so the
/// tolerance is deliberately loose; the matched span is kept verbatim.
const READS_PATTERN: &str = "in ab% of xyz reads";
const READS_TOLERANCE: u32 = 7;

/// The full attribute set for one gene. Always fully populated:
/// sentinel-filled where nothing matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneRecord {
    pub mutation_count: usize,
    pub dna_change: String,
    pub protein_change: String,
    pub exon: String,
    pub percent_reads: String,
    pub cnv_type: String,
    pub cnv_locus: String,
}

impl GeneRecord {
    /// Column/value pairs keyed `"{gene} {attribute}"`, in
    /// [`GENE_ATTRIBUTES`] order.
    pub fn columns(&self, gene: &str) -> Vec<(String, String)> {
        vec![
            (
                format!("{gene} Number of Mutations"),
                self.mutation_count.to_string(),
            ),
            (format!("{gene} DNA Change"), self.dna_change.clone()),
            (format!("{gene} Protein Change"), self.protein_change.clone()),
            (format!("{gene} Exon"), self.exon.clone()),
            (format!("{gene} % Reads"), self.percent_reads.clone()),
            (format!("{gene} CNV Type"), self.cnv_type.clone()),
            (format!("{gene} CNV Locus"), self.cnv_locus.clone()),
        ]
    }
}

/// Scan both line lists for `gene` and aggregate its attributes.
pub fn scrape_gene(
    gene: &str,
    cnv_lines: &[&str],
    tier_lines: &[&str],
    config: &ScrapeConfig,
) -> GeneRecord {
    let sentinel = config.sentinel.as_str();

    let mut cnv_type = sentinel.to_string();
    let mut cnv_locus = sentinel.to_string();
    for line in cnv_lines.iter().filter(|line| line.contains(gene)) {
        comma_add(&mut cnv_type, Some(&cnv_class(line)), sentinel);
        // First token of the line, even when that is the gene name itself.
        comma_add(&mut cnv_locus, line.split_whitespace().next(), sentinel);
    }

    let mut dna_change = sentinel.to_string();
    let mut protein_change = sentinel.to_string();
    let mut exon = sentinel.to_string();
    let mut percent_reads = sentinel.to_string();
    for line in tier_lines.iter().filter(|line| line.contains(gene)) {
        comma_add(&mut dna_change, token_after(line, gene), sentinel);
        comma_add(&mut protein_change, parenthesized(line), sentinel);
        comma_add(&mut exon, token_after(line, "exon"), sentinel);
        comma_add(&mut percent_reads, reads_span(line), sentinel);
    }

    let mutation_count = if dna_change == sentinel {
        0
    } else {
        dna_change.split(',').count()
    };

    GeneRecord {
        mutation_count,
        dna_change,
        protein_change,
        exon,
        percent_reads,
        cnv_type,
        cnv_locus,
    }
}

/// Append `addition` to a comma-joined running value, replacing the
/// sentinel on first contribution. `None` contributes nothing.
fn comma_add<S: AsRef<str>>(current: &mut String, addition: Option<S>, sentinel: &str) {
    let Some(addition) = addition else {
        return;
    };
    if current.as_str() == sentinel {
        *current = addition.as_ref().to_string();
    } else {
        current.push_str(", ");
        current.push_str(addition.as_ref());
    }
}

/// Classify a copy-number line against the fixed class vocabulary.
fn cnv_class(line: &str) -> String {
    for (ordinal, class) in CNV_CLASSES.iter().enumerate() {
        if !fuzzy::find_near_matches(class, line, CNV_CLASS_TOLERANCE).is_empty() {
            return (ordinal + 1).to_string();
        }
    }
    "0".to_string()
}

/// First whitespace-delimited token following the first occurrence of
/// `marker` in `line`.
fn token_after<'l>(line: &'l str, marker: &str) -> Option<&'l str> {
    let pos = line.find(marker)?;
    line[pos + marker.len()..].split_whitespace().next()
}

/// The text inside the first parenthesis pair.
fn parenthesized(line: &str) -> Option<&str> {
    let open = line.find('(')?;
    let close = line.find(')')?;
    (open < close).then(|| &line[open + 1..close])
}

/// The verbatim span matching the percent-reads phrasing, if any.
fn reads_span(line: &str) -> Option<&str> {
    fuzzy::find_near_matches(READS_PATTERN, line, READS_TOLERANCE)
        .first()
        .map(|hit| hit.slice(line))
}
