//! OCR Module
//!
//! Extracts Hindi text from uploaded images with an ordered fallback chain:
//!
//! 1. A neural engine on the untouched raster (Ollama vision model)
//! 2. Tesseract on the enhanced raster, retrying page segmentation modes
//!    `[6, 4, 3, 11]`, then once more on the original raster
//!
//! Each stage reports a [`StageOutcome`]; [`select_text`] applies the
//! meaningfulness policy across both stages.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hindi_qa_server::ocr::{OcrService, OllamaProvider, TesseractProvider};
//!
//! let service = OcrService::new(
//!     Some(Arc::new(OllamaProvider::default_url())),
//!     Arc::new(TesseractProvider::new("tesseract")),
//! );
//! let outcome = service.extract_text(&upload_bytes).await?;
//! println!("{}", outcome.text());
//! ```

mod provider;
mod service;
mod tesseract;
mod types;

pub use provider::{NeuralOcrProvider, OllamaProvider};
pub use service::{select_text, OcrService};
pub use tesseract::{SegmentingOcrProvider, TesseractProvider, HINDI_LANGUAGES, PSM_MODES};
pub use types::{
    is_all_zeros, is_digit_noise, is_meaningful, OcrEngine, OcrError, OcrOutcome, StageOutcome,
    RECOGNITION_FAILURE_MESSAGE, UNREADABLE_IMAGE_MESSAGE,
};

#[cfg(test)]
pub(crate) use provider::MockNeuralProvider;
#[cfg(test)]
pub(crate) use tesseract::MockSegmentingProvider;
