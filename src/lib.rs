//! oncoscrape: pulls structured clinical and genomic fields out of OCR'd
//! oncology panel reports and accumulates them into one tabular dataset.
//!
//! The pipeline per document: acquire text (sidecar cache or external OCR),
//! scrub repeated page headers, extract every configured field by fuzzy
//! anchor matching, sub-extract the per-gene variant attributes, and upsert
//! one row into the output table. Documents are processed strictly
//! sequentially; the table is written once at the end of the run.

pub mod config;
pub mod fuzzy;
pub mod ocr;
pub mod roster;
pub mod scrape;
pub mod table;

use std::path::{Path, PathBuf};

use thiserror::Error;

use config::ScrapeConfig;
use ocr::{OcrEngine, TextCache};
use table::ReportTable;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("cannot read report directory {path}: {source}")]
    ReportDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot open text cache {path}: {source}")]
    Cache {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Table(#[from] table::TableError),
}

/// Counts for the end-of-run report. A failed document never aborts the
/// run; its gaps surface here and in the log instead.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub scraped: usize,
    pub cache_hits: usize,
    pub failed: usize,
}

/// Scrape every report in the configured directory and write the table.
pub fn run(config: &ScrapeConfig, engine: &dyn OcrEngine) -> Result<RunSummary, RunError> {
    let roster = roster::load_roster(&config.roster_path);
    tracing::info!(genes = roster.len(), "roster loaded");

    let cache_dir = config.text_cache_dir();
    let cache = TextCache::open(cache_dir.clone()).map_err(|source| RunError::Cache {
        path: cache_dir,
        source,
    })?;

    let reports = discover_reports(&config.report_dir)?;
    let mut table = ReportTable::new(config, &roster);
    let mut summary = RunSummary::default();

    for (position, pdf) in reports.iter().enumerate() {
        let name = pdf
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!("({}/{}) working on {name}", position + 1, reports.len());

        let (mut text, cached) = match ocr::text_for(pdf, &cache, engine) {
            Ok(acquired) => acquired,
            Err(err) => {
                tracing::error!(report = %name, error = %err, "text acquisition failed, skipping");
                summary.failed += 1;
                continue;
            }
        };
        if cached {
            summary.cache_hits += 1;
            tracing::debug!(report = %name, "sidecar text found in cache");
        }

        match scrape::scrape_document(&mut text, &name, &roster, config) {
            Ok(document) => {
                tracing::debug!(report = %name, index = %document.index, "scraped");
                table.upsert(document);
                summary.scraped += 1;
            }
            Err(err) => {
                tracing::error!(report = %name, error = %err, "skipping document");
                summary.failed += 1;
            }
        }

        // Persist freshly OCR'd (and now scrubbed) text for the next run.
        if !cached {
            if let Err(err) = cache.store(pdf, &text) {
                tracing::warn!(report = %name, error = %err, "could not persist sidecar text");
            }
        }
    }

    table.write_csv(&config.output_path)?;
    tracing::info!(
        rows = table.len(),
        output = %config.output_path.display(),
        "table written"
    );
    Ok(summary)
}

/// All `*.pdf` files directly under `dir`, sorted by filename.
fn discover_reports(dir: &Path) -> Result<Vec<PathBuf>, RunError> {
    let entries = std::fs::read_dir(dir).map_err(|source| RunError::ReportDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut reports = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RunError::ReportDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            reports.push(path);
        }
    }
    reports.sort();
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const REPORT: &str = "Accession numbers on blocks submitted - BL-24-001\n\
        Accession No.: S24-100\n\
        Patient Name: Jane Doe\n\
        Age Sex: 61 Female\n\
        Tier 1 variants:\n\
        BRCA1 c.68_69del (p.Glu23Val) exon 2 in 45% of 1000 reads\n\
        Tier 2 variants:\n\
        Tier 3 variants:\n\
        Tier 4 variants:\n\
        Tier 5 variants:\n\
        COPY NUMBER VARIATIONS:\n\
        CHROMOSOMAL REARRANGEMENT: \n\
        INTERPRETATION\n";

    struct CannedEngine {
        text: &'static str,
    }

    impl OcrEngine for CannedEngine {
        fn extract_text(&self, _pdf: &Path, sidecar: &Path) -> Result<String, ocr::OcrError> {
            std::fs::write(sidecar, self.text)?;
            Ok(self.text.to_string())
        }
    }

    fn test_config(dir: &Path) -> ScrapeConfig {
        ScrapeConfig {
            report_dir: dir.join("reports"),
            text_dir: Some(dir.join("text-files")),
            output_path: dir.join("out.csv"),
            roster_path: dir.join("genes.txt"),
            ..ScrapeConfig::default()
        }
    }

    fn seed(dir: &Path, reports: &[&str]) {
        std::fs::create_dir_all(dir.join("reports")).unwrap();
        for name in reports {
            std::fs::write(dir.join("reports").join(name), b"%PDF").unwrap();
        }
        std::fs::write(dir.join("genes.txt"), "BRCA1 TP53").unwrap();
    }

    #[test]
    fn full_run_scrapes_and_writes_the_table() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), &["report-001.pdf"]);
        let config = test_config(dir.path());
        let engine = CannedEngine { text: REPORT };

        let summary = run(&config, &engine).unwrap();
        assert_eq!(summary.scraped, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.cache_hits, 0);

        let written = std::fs::read_to_string(&config.output_path).unwrap();
        assert!(written.contains("BL-24-001"));
        assert!(written.contains("c.68_69del"));
        assert!(written.contains("BRCA1 DNA Change"));
    }

    #[test]
    fn second_run_hits_the_sidecar_cache() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), &["report-001.pdf"]);
        let config = test_config(dir.path());
        let engine = CannedEngine { text: REPORT };

        run(&config, &engine).unwrap();
        let summary = run(&config, &engine).unwrap();
        assert_eq!(summary.cache_hits, 1);
        assert_eq!(summary.scraped, 1);
    }

    #[test]
    fn identical_index_across_documents_keeps_one_row() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), &["report-001.pdf", "report-002.pdf"]);
        let config = test_config(dir.path());
        let engine = CannedEngine { text: REPORT };

        let summary = run(&config, &engine).unwrap();
        assert_eq!(summary.scraped, 2);

        let written = std::fs::read_to_string(&config.output_path).unwrap();
        // Header plus exactly one data row for the shared accession number.
        assert_eq!(written.lines().count(), 2);
        // Last write wins: the later file's name is the one recorded.
        assert!(written.contains("report-002.pdf"));
        assert!(!written.contains("report-001.pdf"));
    }

    #[test]
    fn unkeyable_document_is_counted_failed_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), &["report-001.pdf"]);
        let config = test_config(dir.path());
        let engine = CannedEngine {
            text: "Patient Name: Jane Doe\nno index anchor anywhere\n",
        };

        let summary = run(&config, &engine).unwrap();
        assert_eq!(summary.scraped, 0);
        assert_eq!(summary.failed, 1);
        // The table is still written, just empty.
        assert!(config.output_path.exists());
    }

    #[test]
    fn missing_report_directory_is_a_run_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let engine = CannedEngine { text: REPORT };
        assert!(matches!(
            run(&config, &engine),
            Err(RunError::ReportDir { .. })
        ));
    }
}
