//! Per-document record assembly.
//!
//! Drives the extraction stages in their fixed order: single-line fields,
//! the one-time header scrub, block fields, then the gene roster against
//! the retained variant blocks. The body is owned mutably through the scrub
//! and read-only afterwards.

use crate::config::{FieldKind, FieldRole, ScrapeConfig};

use super::{fields, genes, scrub, ScrapeError};

/// One scraped document: the index value plus every output column in
/// extraction order.
#[derive(Debug, Clone)]
pub struct ScrapedDocument {
    pub index: String,
    pub columns: Vec<(String, String)>,
}

/// Scrape every configured field and gene out of one document body.
///
/// The index column's value becomes the record key and is never placed in
/// the general column set. A document whose index anchor cannot be found
/// is unkeyable and fails with [`ScrapeError::MissingIndex`].
pub fn scrape_document(
    text: &mut String,
    filename: &str,
    roster: &[String],
    config: &ScrapeConfig,
) -> Result<ScrapedDocument, ScrapeError> {
    let mut index = config.sentinel.clone();
    let mut columns: Vec<(String, String)> =
        vec![("Filename".to_string(), filename.to_string())];
    let mut scrubbed = false;

    // Single-line pass, in sequence order. The header scrub runs exactly
    // once, as soon as the accession and patient fields are both resolved
    // and before any later anchor is located — leftover page headers cut
    // through block spans otherwise.
    for spec in config.fields.iter().filter(|f| f.kind == FieldKind::SingleLine) {
        let value = fields::single_line(text, spec, config);
        if spec.column == config.index_column {
            index = value;
        } else {
            columns.push((spec.column.clone(), value));
        }

        if !scrubbed {
            let accession = lookup(&columns, &config.accession_column).map(str::to_string);
            let patient = lookup(&columns, &config.patient_column).map(str::to_string);
            if let (Some(accession), Some(patient)) = (accession, patient) {
                scrub::remove_headers(text, &accession, &patient, config);
                scrubbed = true;
            }
        }
    }

    // Block pass against the scrubbed body. The raw variant blocks are kept
    // aside for the gene scan.
    let mut cnv_raw: Option<String> = None;
    let mut tier_raw: Vec<String> = Vec::new();
    for (position, spec) in config.fields.iter().enumerate() {
        if !matches!(spec.kind, FieldKind::Block | FieldKind::NumericBlock) {
            continue;
        }
        let capture = fields::block(text, &config.fields, position, config);
        match spec.role {
            FieldRole::CopyNumber => cnv_raw = capture.raw,
            FieldRole::TierVariants => tier_raw.extend(capture.raw),
            _ => {}
        }
        if spec.column == config.index_column {
            index = capture.value;
        } else if !spec.column.is_empty() {
            columns.push((spec.column.clone(), capture.value));
        }
    }

    if index == config.sentinel {
        return Err(ScrapeError::MissingIndex(config.index_column.clone()));
    }

    // Gene pass over the retained raw blocks.
    let cnv_lines: Vec<&str> = cnv_raw
        .as_deref()
        .map(|raw| raw.split(config.delimiter.as_str()).collect())
        .unwrap_or_default();
    let tier_lines: Vec<&str> = tier_raw
        .iter()
        .flat_map(|raw| raw.split(config.delimiter.as_str()))
        .collect();

    for gene in roster {
        let record = genes::scrape_gene(gene, &cnv_lines, &tier_lines, config);
        columns.extend(record.columns(gene));
    }

    Ok(ScrapedDocument { index, columns })
}

fn lookup<'c>(columns: &'c [(String, String)], name: &str) -> Option<&'c str> {
    columns
        .iter()
        .find(|(column, _)| column == name)
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> String {
        "Accession numbers on blocks submitted - BL-24-001\n\
         Accession No.: S24-100\n\
         Patient Name: Jane Doe\n\
         Age Sex: 61 Female\n\
         MOLECULAR DIAGNOSTICS REPORT\n\
         DNA VARIANTS:\n\
         There were 123456\n\
         aligned, high quality reads for this specimen with a mean of 400\n\
         reads across all targeted exons and 98\n\
         Tier 1 variants:\n\
         BRCA1 c.68_69del (p.Glu23Val) exon 2 in 45% of 1000 reads\n\
         Tier 2 variants:\n\
         Tier 3 variants:\n\
         Tier 4 variants:\n\
         Tier 5 variants:\n\
         COPY NUMBER VARIATIONS:\n\
         BRCA1 Single copy gain chr17:41196312-41277500\n\
         CHROMOSOMAL REARRANGEMENT: \n\
         INTERPRETATION\n\
         Positive for a pathogenic BRCA1 variant.\n"
            .to_string()
    }

    fn value<'d>(document: &'d ScrapedDocument, column: &str) -> &'d str {
        lookup(&document.columns, column).unwrap()
    }

    #[test]
    fn assembles_fields_and_gene_attributes() {
        let config = ScrapeConfig::default();
        let roster = vec!["BRCA1".to_string()];
        let mut text = sample_report();

        let document = scrape_document(&mut text, "report-001.pdf", &roster, &config).unwrap();

        assert_eq!(document.index, "BL-24-001");
        assert_eq!(value(&document, "Filename"), "report-001.pdf");
        assert_eq!(value(&document, "BL Accession Number"), "S24-100");
        assert_eq!(value(&document, "Patient Name"), "Jane Doe");
        assert_eq!(value(&document, "Sex"), "Female");

        assert_eq!(value(&document, "BRCA1 DNA Change"), "c.68_69del");
        assert_eq!(value(&document, "BRCA1 Protein Change"), "p.Glu23Val");
        assert_eq!(value(&document, "BRCA1 Exon"), "2");
        assert!(value(&document, "BRCA1 % Reads").contains("45% of 1000 reads"));
        assert_eq!(value(&document, "BRCA1 Number of Mutations"), "1");
        assert_eq!(value(&document, "BRCA1 CNV Type"), "1");
        assert_eq!(value(&document, "BRCA1 CNV Locus"), "BRCA1");
    }

    #[test]
    fn index_value_is_not_a_general_column() {
        let config = ScrapeConfig::default();
        let mut text = sample_report();
        let document = scrape_document(&mut text, "r.pdf", &[], &config).unwrap();
        assert!(lookup(&document.columns, &config.index_column).is_none());
    }

    #[test]
    fn page_headers_are_scrubbed_from_the_body() {
        let config = ScrapeConfig::default();
        let mut text = sample_report();
        scrape_document(&mut text, "r.pdf", &[], &config).unwrap();
        assert!(!text.contains("MOLECULAR DIAGNOSTICS REPORT"));
    }

    #[test]
    fn missing_index_anchor_fails_the_document() {
        let config = ScrapeConfig::default();
        let mut text = "Patient Name: Jane Doe\nnothing else useful\n".to_string();
        let result = scrape_document(&mut text, "r.pdf", &[], &config);
        assert!(matches!(result, Err(ScrapeError::MissingIndex(_))));
    }

    #[test]
    fn roster_gene_absent_from_document_is_sentinel_filled() {
        let config = ScrapeConfig::default();
        let roster = vec!["TP53".to_string()];
        let mut text = sample_report();

        let document = scrape_document(&mut text, "r.pdf", &roster, &config).unwrap();

        assert_eq!(value(&document, "TP53 Number of Mutations"), "0");
        assert_eq!(value(&document, "TP53 DNA Change"), config.sentinel);
        assert_eq!(value(&document, "TP53 CNV Type"), config.sentinel);
    }

    #[test]
    fn absent_single_line_fields_are_sentinel() {
        let config = ScrapeConfig::default();
        let mut text = sample_report();
        let document = scrape_document(&mut text, "r.pdf", &[], &config).unwrap();
        assert_eq!(value(&document, "Test Performed"), config.sentinel);
    }
}
