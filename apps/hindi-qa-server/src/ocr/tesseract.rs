//! Tesseract OCR provider
//!
//! Runs the `tesseract` CLI once per page segmentation mode. Hindi support is
//! optional: trained data is looked up on disk first, then via `--list-langs`.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use super::types::OcrError;

/// Page segmentation modes tried in order on the enhanced raster
pub const PSM_MODES: [u8; 4] = [6, 4, 3, 11];

/// Language string passed when Hindi trained data is installed
pub const HINDI_LANGUAGES: &str = "hin+eng";

/// Tessdata directories checked before asking the binary
const KNOWN_TESSDATA_DIRS: [&str; 5] = [
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/tessdata",
    "/usr/local/share/tessdata",
    "C:\\Program Files\\Tesseract-OCR\\tessdata",
];

/// OCR engine driven by page segmentation modes
#[async_trait]
pub trait SegmentingOcrProvider: Send + Sync {
    /// Check if the engine is installed
    async fn is_available(&self) -> bool;

    /// Whether trained data for `language` is installed
    async fn has_language(&self, language: &str) -> bool;

    /// Recognize a PNG-encoded raster with the given mode and languages.
    /// `None` leaves the engine on its default language.
    async fn recognize(
        &self,
        png: &[u8],
        psm: u8,
        languages: Option<&str>,
    ) -> Result<String, OcrError>;
}

/// Tesseract OCR provider
pub struct TesseractProvider {
    command: String,
    /// Searched before [`KNOWN_TESSDATA_DIRS`]
    extra_tessdata_dirs: Vec<PathBuf>,
    /// Skip the built-in directory list (tests)
    known_dirs: bool,
}

impl TesseractProvider {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            extra_tessdata_dirs: Vec::new(),
            known_dirs: true,
        }
    }

    pub fn with_tessdata_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.extra_tessdata_dirs = dirs;
        self
    }

    fn tessdata_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = self.extra_tessdata_dirs.clone();
        if self.known_dirs {
            dirs.extend(KNOWN_TESSDATA_DIRS.iter().map(PathBuf::from));
            if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
                dirs.push(Path::new(&home).join("tessdata"));
            }
        }
        dirs
    }

    fn find_traineddata(&self, language: &str) -> Option<PathBuf> {
        let file = format!("{}.traineddata", language);
        self.tessdata_dirs()
            .into_iter()
            .map(|dir| dir.join(&file))
            .find(|path| path.exists())
    }

    async fn list_languages(&self) -> Result<Vec<String>, OcrError> {
        let output = Command::new(&self.command)
            .arg("--list-langs")
            .output()
            .await
            .map_err(|e| OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)))?;

        // Older releases print the list on stderr
        let listing = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.contains(' '))
            .map(str::to_string)
            .collect())
    }
}

#[async_trait]
impl SegmentingOcrProvider for TesseractProvider {
    async fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    async fn has_language(&self, language: &str) -> bool {
        if let Some(path) = self.find_traineddata(language) {
            tracing::info!("Found {} Tesseract data at: {}", language, path.display());
            return true;
        }

        match self.list_languages().await {
            Ok(languages) if languages.iter().any(|l| l == language) => {
                tracing::info!("{} language available in Tesseract", language);
                true
            }
            Ok(_) => {
                tracing::warn!("{} language data not found for Tesseract", language);
                false
            }
            Err(e) => {
                tracing::warn!("Could not query Tesseract languages: {}", e);
                false
            }
        }
    }

    async fn recognize(
        &self,
        png: &[u8],
        psm: u8,
        languages: Option<&str>,
    ) -> Result<String, OcrError> {
        let mut input = tempfile::Builder::new()
            .prefix("ocr_input_")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to create temp file: {}", e)))?;
        input
            .write_all(png)
            .and_then(|_| input.flush())
            .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;

        let mut command = Command::new(&self.command);
        command
            .arg(input.path())
            .arg("stdout")
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg(psm.to_string());
        if let Some(languages) = languages {
            command.arg("-l").arg(languages);
        }

        let output = command
            .output()
            .await
            .map_err(|e| OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Mock provider for testing. Answers are consumed in call order; the last
/// one repeats once the script runs out.
#[cfg(test)]
pub struct MockSegmentingProvider {
    pub available: bool,
    pub hindi: bool,
    pub script: Vec<Result<String, String>>,
    pub calls: std::sync::Mutex<Vec<(u8, Option<String>, usize)>>,
}

#[cfg(test)]
impl MockSegmentingProvider {
    pub fn scripted(script: &[&str]) -> Self {
        Self {
            available: true,
            hindi: true,
            script: script.iter().map(|s| Ok(s.to_string())).collect(),
            calls: Default::default(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::scripted(&[""])
        }
    }

    /// (psm, languages, input length) per call
    pub fn calls(&self) -> Vec<(u8, Option<String>, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl SegmentingOcrProvider for MockSegmentingProvider {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn has_language(&self, _language: &str) -> bool {
        self.hindi
    }

    async fn recognize(
        &self,
        png: &[u8],
        psm: u8,
        languages: Option<&str>,
    ) -> Result<String, OcrError> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len().min(self.script.len().saturating_sub(1));
        calls.push((psm, languages.map(str::to_string), png.len()));
        self.script
            .get(index)
            .cloned()
            .unwrap_or_else(|| Ok(String::new()))
            .map_err(OcrError::ProcessingError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated(command: &str, dir: &Path) -> TesseractProvider {
        TesseractProvider {
            command: command.to_string(),
            extra_tessdata_dirs: vec![dir.to_path_buf()],
            known_dirs: false,
        }
    }

    #[tokio::test]
    async fn test_language_found_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zzz.traineddata"), b"").unwrap();

        let provider = isolated("definitely-not-tesseract", dir.path());
        assert!(provider.has_language("zzz").await);
    }

    #[tokio::test]
    async fn test_missing_language_without_binary() {
        let dir = tempfile::tempdir().unwrap();
        let provider = isolated("definitely-not-tesseract", dir.path());

        assert!(!provider.has_language("qqq").await);
        assert!(!provider.is_available().await);
    }

    #[tokio::test]
    async fn test_recognize_without_binary_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = isolated("definitely-not-tesseract", dir.path());

        let result = provider.recognize(b"png", 6, Some(HINDI_LANGUAGES)).await;
        assert!(matches!(result, Err(OcrError::ProcessingError(_))));
    }

    #[test]
    fn test_known_dirs_include_home() {
        let provider = TesseractProvider::new("tesseract")
            .with_tessdata_dirs(vec![PathBuf::from("/opt/tessdata")]);
        let dirs = provider.tessdata_dirs();

        assert_eq!(dirs[0], PathBuf::from("/opt/tessdata"));
        assert!(dirs.contains(&PathBuf::from("/usr/share/tesseract-ocr/tessdata")));
    }
}
