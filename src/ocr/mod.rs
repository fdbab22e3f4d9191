//! Report text acquisition: sidecar cache first, external OCR otherwise.
//!
//! OCR is by far the slowest step of a run, so every extracted text is
//! persisted as a sidecar `.txt` next to the reports and reused on later
//! runs. The engine itself is an external `ocrmypdf` process; the trait
//! seam lets tests substitute a fake engine.

pub mod cache;

pub use cache::TextCache;

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status} for {pdf}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        pdf: PathBuf,
    },

    #[error("OCR produced no sidecar text at {0}")]
    SidecarMissing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns one scanned PDF into plain text, writing it to `sidecar` along
/// the way.
pub trait OcrEngine {
    fn extract_text(&self, pdf: &Path, sidecar: &Path) -> Result<String, OcrError>;
}

/// `ocrmypdf` driven as an external process: deskews, cleans and OCRs
/// every page, writing the recognized text to the sidecar file.
pub struct OcrmypdfEngine {
    program: String,
}

impl OcrmypdfEngine {
    pub fn new() -> Self {
        Self::with_program("ocrmypdf")
    }

    /// Use a different executable name or path (e.g. a wrapper script).
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }
}

impl Default for OcrmypdfEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for OcrmypdfEngine {
    fn extract_text(&self, pdf: &Path, sidecar: &Path) -> Result<String, OcrError> {
        tracing::debug!(pdf = %pdf.display(), "invoking {}", self.program);
        let status = Command::new(&self.program)
            .args(["--output-type", "pdf", "--force-ocr", "--deskew", "--clean"])
            .arg("--sidecar")
            .arg(sidecar)
            .arg(pdf)
            .arg(pdf)
            .status()
            .map_err(|source| OcrError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(OcrError::Failed {
                program: self.program.clone(),
                status,
                pdf: pdf.to_path_buf(),
            });
        }
        if !sidecar.exists() {
            return Err(OcrError::SidecarMissing(sidecar.to_path_buf()));
        }
        Ok(std::fs::read_to_string(sidecar)?)
    }
}

/// Text for one report: from the sidecar cache when present, from a fresh
/// OCR pass otherwise. Returns the text and whether it was a cache hit.
pub fn text_for(
    pdf: &Path,
    cache: &TextCache,
    engine: &dyn OcrEngine,
) -> Result<(String, bool), OcrError> {
    if let Some(text) = cache.lookup(pdf)? {
        return Ok((text, true));
    }
    let text = engine.extract_text(pdf, &cache.sidecar_path(pdf))?;
    Ok((text, false))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeEngine {
        text: &'static str,
    }

    impl OcrEngine for FakeEngine {
        fn extract_text(&self, _pdf: &Path, sidecar: &Path) -> Result<String, OcrError> {
            std::fs::write(sidecar, self.text)?;
            Ok(self.text.to_string())
        }
    }

    struct FailingEngine;

    impl OcrEngine for FailingEngine {
        fn extract_text(&self, pdf: &Path, _sidecar: &Path) -> Result<String, OcrError> {
            Err(OcrError::SidecarMissing(pdf.to_path_buf()))
        }
    }

    #[test]
    fn cache_miss_invokes_the_engine() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TextCache::open(dir.path().join("text-files")).unwrap();
        let pdf = dir.path().join("report.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();

        let engine = FakeEngine { text: "scanned text" };
        let (text, cached) = text_for(&pdf, &cache, &engine).unwrap();
        assert_eq!(text, "scanned text");
        assert!(!cached);
    }

    #[test]
    fn cache_hit_skips_the_engine() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TextCache::open(dir.path().join("text-files")).unwrap();
        let pdf = dir.path().join("report.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();
        cache.store(&pdf, "cached text").unwrap();

        let (text, cached) = text_for(&pdf, &cache, &FailingEngine).unwrap();
        assert_eq!(text, "cached text");
        assert!(cached);
    }

    #[test]
    fn engine_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TextCache::open(dir.path().join("text-files")).unwrap();
        let pdf = dir.path().join("report.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();

        assert!(text_for(&pdf, &cache, &FailingEngine).is_err());
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = OcrmypdfEngine::with_program("/no/such/ocr-binary");
        let pdf = dir.path().join("report.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();

        let result = engine.extract_text(&pdf, &dir.path().join("out.txt"));
        assert!(matches!(result, Err(OcrError::Launch { .. })));
    }
}
