//! OCR Service
//!
//! Orchestrates the neural and Tesseract stages over the enhanced image
//! variants and selects the final text.

use std::sync::Arc;
use std::time::Instant;

use crate::imaging::{self, ImageVariantSet};

use super::{
    provider::NeuralOcrProvider,
    tesseract::{SegmentingOcrProvider, HINDI_LANGUAGES, PSM_MODES},
    types::{is_digit_noise, OcrEngine, OcrError, OcrOutcome, StageOutcome},
};

/// OCR service for uploaded document photos
pub struct OcrService {
    /// `None` when the neural engine is disabled or failed to initialise
    neural: Option<Arc<dyn NeuralOcrProvider>>,
    tesseract: Arc<dyn SegmentingOcrProvider>,
}

impl OcrService {
    /// Create a new OCR service
    pub fn new(
        neural: Option<Arc<dyn NeuralOcrProvider>>,
        tesseract: Arc<dyn SegmentingOcrProvider>,
    ) -> Self {
        Self { neural, tesseract }
    }

    /// Decode, enhance and run the fallback chain over an uploaded image.
    ///
    /// Undecodable bytes yield [`OcrOutcome::Unreadable`]; engine failures
    /// degrade to "no result" and never surface as errors.
    pub async fn extract_text(&self, data: &[u8]) -> Result<OcrOutcome, OcrError> {
        let start = Instant::now();

        let original = match imaging::decode(data) {
            Ok(image) => image,
            Err(e) => {
                tracing::error!("Failed to read/decode image: {}", e);
                return Ok(OcrOutcome::Unreadable);
            }
        };

        let variants = tokio::task::spawn_blocking(move || imaging::enhance(original))
            .await
            .map_err(|e| OcrError::Internal(format!("Enhancement task failed: {}", e)))?;
        tracing::info!(
            variants = ?variants.names(),
            "Image enhancement completed in {:.2} seconds",
            start.elapsed().as_secs_f64()
        );

        let neural = self.run_neural(&variants).await?;
        if let Some(text) = neural.meaningful_text() {
            tracing::info!("Successfully extracted text using neural OCR");
            return Ok(OcrOutcome::Text {
                text: text.to_string(),
                engine: OcrEngine::Neural,
            });
        }

        let tesseract = self.run_tesseract(&variants).await?;
        let outcome = select_text(neural, tesseract);

        match &outcome {
            OcrOutcome::Text { engine, .. } => {
                tracing::info!("Selected OCR text from {:?}", engine)
            }
            _ => tracing::warn!("All OCR methods failed to extract meaningful Hindi text"),
        }
        Ok(outcome)
    }

    /// Neural stage on the original raster
    async fn run_neural(&self, variants: &ImageVariantSet) -> Result<StageOutcome, OcrError> {
        let Some(provider) = &self.neural else {
            tracing::warn!("Neural OCR not configured");
            return Ok(StageOutcome::Unavailable);
        };

        if !provider.is_available().await {
            tracing::warn!("Neural OCR provider '{}' not available", provider.name());
            return Ok(StageOutcome::Unavailable);
        }

        let png = imaging::encode_png(variants.original())?;

        tracing::info!("Performing OCR with {}", provider.name());
        let start = Instant::now();

        let text = match provider.recognize(&png).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Error using {}: {}", provider.name(), e);
                return Ok(StageOutcome::Rejected);
            }
        };

        tracing::info!(
            "{} completed in {:.2} seconds",
            provider.name(),
            start.elapsed().as_secs_f64()
        );
        tracing::debug!("{} result: {}...", provider.name(), preview(&text));

        if is_digit_noise(&text) {
            tracing::warn!("{} returned only digits or spaces", provider.name());
            return Ok(StageOutcome::Rejected);
        }

        Ok(StageOutcome::Accepted(text))
    }

    /// Tesseract stage: enhanced raster over every PSM, then the original once
    async fn run_tesseract(&self, variants: &ImageVariantSet) -> Result<StageOutcome, OcrError> {
        if !self.tesseract.is_available().await {
            tracing::warn!("Tesseract not available");
            return Ok(StageOutcome::Unavailable);
        }

        let languages = self
            .tesseract
            .has_language("hin")
            .await
            .then_some(HINDI_LANGUAGES);

        let enhanced = imaging::encode_png(variants.enhanced_or_original())?;

        tracing::info!("Performing OCR with Tesseract");
        let start = Instant::now();

        for psm in PSM_MODES {
            let text = match self.tesseract.recognize(&enhanced, psm, languages).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Error using Tesseract (PSM {}): {}", psm, e);
                    return Ok(StageOutcome::Rejected);
                }
            };

            let text = text.trim();
            if !is_digit_noise(text) {
                tracing::info!(
                    "Tesseract (PSM {}) completed in {:.2} seconds",
                    psm,
                    start.elapsed().as_secs_f64()
                );
                tracing::debug!("Tesseract result: {}...", preview(text));
                return Ok(StageOutcome::Accepted(text.to_string()));
            }
            tracing::debug!("Tesseract PSM {} produced no usable text", psm);
        }

        // Last resort: the unenhanced raster with the first mode, any quality
        let original = imaging::encode_png(variants.original())?;
        let text = match self
            .tesseract
            .recognize(&original, PSM_MODES[0], languages)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Error using Tesseract (final attempt): {}", e);
                return Ok(StageOutcome::Rejected);
            }
        };

        tracing::info!(
            "Tesseract (final attempt) completed in {:.2} seconds",
            start.elapsed().as_secs_f64()
        );

        let text = text.trim();
        if text.is_empty() {
            Ok(StageOutcome::Rejected)
        } else {
            Ok(StageOutcome::Accepted(text.to_string()))
        }
    }
}

/// Pick the final text from both stages.
///
/// Meaningful neural text wins, then meaningful Tesseract text, then any
/// neural text, then any Tesseract text.
pub fn select_text(neural: StageOutcome, tesseract: StageOutcome) -> OcrOutcome {
    let candidates = [
        (OcrEngine::Neural, &neural),
        (OcrEngine::Tesseract, &tesseract),
    ];

    let meaningful = candidates
        .iter()
        .find_map(|(engine, stage)| stage.meaningful_text().map(|text| (*engine, text)));
    let any = || {
        candidates
            .iter()
            .find_map(|(engine, stage)| stage.text().map(|text| (*engine, text)))
    };

    match meaningful.or_else(any) {
        Some((engine, text)) => OcrOutcome::Text {
            text: text.to_string(),
            engine,
        },
        None => OcrOutcome::Unrecognized,
    }
}

fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}
