//! Sidecar text cache: one `.txt` per scanned report.
//!
//! A document whose sidecar already exists skips the OCR pass entirely on
//! later runs, which also makes the cache a natural per-document resume
//! checkpoint after an interrupted run.

use std::path::{Path, PathBuf};

/// Directory of sidecar text files, keyed by report file stem.
#[derive(Debug, Clone)]
pub struct TextCache {
    dir: PathBuf,
}

impl TextCache {
    /// Open the cache, creating the directory if needed.
    pub fn open(dir: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Where the sidecar for `pdf` lives, whether or not it exists yet.
    pub fn sidecar_path(&self, pdf: &Path) -> PathBuf {
        let stem = pdf
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dir.join(format!("{stem}.txt"))
    }

    /// Cached text for `pdf`, or `None` when no sidecar exists.
    pub fn lookup(&self, pdf: &Path) -> std::io::Result<Option<String>> {
        let path = self.sidecar_path(pdf);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(path).map(Some)
    }

    /// Persist (or overwrite) the sidecar for `pdf`.
    pub fn store(&self, pdf: &Path, text: &str) -> std::io::Result<()> {
        std::fs::write(self.sidecar_path(pdf), text)
    }
}
