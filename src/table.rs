//! The accumulating output table and its CSV write-back.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::config::ScrapeConfig;
use crate::scrape::genes::GENE_ATTRIBUTES;
use crate::scrape::ScrapedDocument;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("cannot write output table: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One row per scraped document, keyed by the index column.
///
/// Re-scraping a document with an already-present index replaces that row
/// in place: last write wins, original position kept. The column layout is
/// fixed up front — index first, then `Filename`, the field columns in
/// sequence order, and the per-gene attribute columns in roster order.
#[derive(Debug)]
pub struct ReportTable {
    columns: Vec<String>,
    index_column: String,
    sentinel: String,
    rows: Vec<(String, HashMap<String, String>)>,
}

impl ReportTable {
    pub fn new(config: &ScrapeConfig, roster: &[String]) -> Self {
        let mut columns = vec![config.index_column.clone(), "Filename".to_string()];
        for spec in &config.fields {
            if spec.column.is_empty() || spec.column == config.index_column {
                continue;
            }
            columns.push(spec.column.clone());
        }
        for gene in roster {
            for attribute in GENE_ATTRIBUTES {
                columns.push(format!("{gene} {attribute}"));
            }
        }
        Self {
            columns,
            index_column: config.index_column.clone(),
            sentinel: config.sentinel.clone(),
            rows: Vec::new(),
        }
    }

    /// Insert the document's row, replacing any row with the same index.
    pub fn upsert(&mut self, document: ScrapedDocument) {
        let ScrapedDocument { index, columns } = document;
        let cells: HashMap<String, String> = columns.into_iter().collect();
        match self.rows.iter_mut().find(|(key, _)| *key == index) {
            Some(row) => row.1 = cells,
            None => self.rows.push((index, cells)),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the whole table to `path` as CSV, header row first. Cells
    /// never filled in get the sentinel, so gaps stay visible for review.
    pub fn write_csv(&self, path: &Path) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for (index, cells) in &self.rows {
            let record: Vec<&str> = self
                .columns
                .iter()
                .map(|column| {
                    if column == &self.index_column {
                        index.as_str()
                    } else {
                        cells
                            .get(column)
                            .map(String::as_str)
                            .unwrap_or(self.sentinel.as_str())
                    }
                })
                .collect();
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
