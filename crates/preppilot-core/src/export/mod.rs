//! Client-side PDF export of a prep pack.
//!
//! The pipeline is `PrepPack` → [`document::layout_pack`] (pure layout through
//! a [`cursor::DocumentCursor`]) → [`pdf::render`] (bytes) → one atomic file
//! write. Any failure along the way yields an [`ExportError`] and no file.

pub mod cursor;
pub mod document;
pub mod metrics;
pub mod pdf;

use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::pack::PrepPack;

pub use cursor::{Block, DocumentCursor, Layout, Mark, PageGeometry, TextStyle};
pub use document::layout_pack;

/// Name of the downloaded document.
pub const EXPORT_FILENAME: &str = "PrepPilot_Interview_Prep_Pack.pdf";

/// Local timestamp for the "Generated on" line.
pub fn generated_on() -> String {
    chrono::Local::now().format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// Render the pack to PDF bytes. Panics inside the PDF backend are reported
/// as export failures rather than taking the application down.
pub fn render_pdf(pack: &PrepPack, generated_on: &str) -> Result<Vec<u8>, ExportError> {
    let layout = layout_pack(pack, generated_on);
    tracing::debug!(pages = layout.page_count(), "prep pack laid out");

    catch_unwind(AssertUnwindSafe(|| pdf::render(&layout, document::TITLE)))
        .map_err(|_| ExportError::Pdf("PDF backend panicked".to_string()))?
}

#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn target_path(&self) -> PathBuf {
        self.dir.join(EXPORT_FILENAME)
    }

    /// Write the PDF for `pack`, replacing any earlier export. The file only
    /// appears once it is complete.
    pub fn export(&self, pack: &PrepPack) -> Result<PathBuf, ExportError> {
        let bytes = render_pdf(pack, &generated_on())?;

        fs::create_dir_all(&self.dir)?;
        let target = self.target_path();
        let partial = self.dir.join(format!(".{}.part", EXPORT_FILENAME));
        if let Err(err) = fs::write(&partial, &bytes).and_then(|_| fs::rename(&partial, &target)) {
            let _ = fs::remove_file(&partial);
            return Err(err.into());
        }

        tracing::info!(path = %target.display(), bytes = bytes.len(), "prep pack exported");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::TechQuestion;

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        let pack = PrepPack {
            role_summary: "X".to_string(),
            tech_questions: vec![TechQuestion {
                question: "Q1".to_string(),
                answer_outline: "O1".to_string(),
            }],
            ..PrepPack::default()
        };

        let path = exporter.export(&pack).unwrap();
        assert_eq!(path.file_name().unwrap(), EXPORT_FILENAME);
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_empty_pack_exports() {
        let bytes = render_pdf(&PrepPack::default(), "now").unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_unwritable_dir_fails_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let exporter = Exporter::new(&blocker);
        let err = exporter.export(&PrepPack::default()).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
        assert!(!exporter.target_path().exists());
    }

    #[test]
    fn test_generated_on_format() {
        let stamp = generated_on();
        assert_eq!(stamp.len(), "01/01/2026, 09:00:00".len());
    }
}
