//! OCR Routes
//!
//! Endpoint:
//! - POST /api/ocr - Upload an image (multipart field `image`), get the
//!   recognized text and generated question-answer pairs

use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::ocr::{is_all_zeros, OcrOutcome, RECOGNITION_FAILURE_MESSAGE};
use crate::qa::QaPair;
use crate::state::AppState;
use crate::upload::{UploadError, UploadedImage, IMAGE_FIELD, MAX_UPLOAD_SIZE};

// ============================================================================
// Canned responses
// ============================================================================

pub const NO_TEXT_MESSAGE: &str =
    "No text detected. Please try a clearer image with visible Hindi text.";
pub const NO_TEXT_QUESTION: &str = "क्यों कोई पाठ नहीं मिला?";
pub const NO_TEXT_ANSWER: &str = "छवि में कोई पाठ नहीं मिला या OCR पहचान विफल रही। \
     कृपया स्पष्ट हिंदी पाठ वाली एक अलग छवि का प्रयास करें।";

pub const RECOGNITION_QUESTION: &str = "OCR परिणाम क्यों सही नहीं है?";
pub const RECOGNITION_ANSWER: &str = "छवि सही से पहचानी नहीं गई। \
     कृपया एक स्पष्ट छवि का प्रयास करें या सुनिश्चित करें कि छवि में हिंदी पाठ है।";

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OcrResponse {
    pub text: String,
    pub qa_pairs: Vec<QaPair>,
    pub processing_time: String,
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ocr", post(upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/ocr
async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OcrResponse>> {
    let start = Instant::now();
    let image = read_image(&mut multipart).await?;

    let span = tracing::info_span!(
        "ocr_request",
        request_id = %Uuid::new_v4(),
        filename = %image.filename
    );
    process_image(&state, image, start).instrument(span).await
}

async fn process_image(
    state: &AppState,
    image: UploadedImage,
    start: Instant,
) -> Result<Json<OcrResponse>> {
    tracing::info!(bytes = image.data.len(), "Processing uploaded image");

    let outcome = state.ocr().extract_text(&image.data).await?;
    tracing::info!(
        engine = ?outcome.engine(),
        "OCR completed in {:.2} seconds",
        start.elapsed().as_secs_f64()
    );

    let (text, qa_pairs) = match canned_response(&outcome) {
        Some(canned) => canned,
        None => {
            let text = outcome.text().to_string();
            let qa_start = Instant::now();
            let qa_pairs = state.qa().generate_pairs(&text).await?;
            tracing::info!(
                pairs = qa_pairs.len(),
                "QA generation completed in {:.2} seconds",
                qa_start.elapsed().as_secs_f64()
            );
            (text, qa_pairs)
        }
    };

    let elapsed = start.elapsed().as_secs_f64();
    tracing::info!("Total processing time: {:.2} seconds", elapsed);

    Ok(Json(OcrResponse {
        text,
        qa_pairs,
        processing_time: format!("{:.2} seconds", elapsed),
    }))
}

/// Pull the `image` field out of the form. Other fields are skipped.
async fn read_image(multipart: &mut Multipart) -> Result<UploadedImage> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            tracing::debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        tracing::debug!("Read {} bytes of image data", data.len());

        return Ok(UploadedImage::new(filename.as_deref(), data)?);
    }

    Err(UploadError::NoImage.into())
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Multipart {
        status: err.status(),
        message: err.body_text(),
    }
}

/// Response for OCR text that never reaches the QA pipeline.
///
/// The unreadable and unrecognized placeholders are ordinary text here and
/// go through QA like any other result.
fn canned_response(outcome: &OcrOutcome) -> Option<(String, Vec<QaPair>)> {
    let OcrOutcome::Text { text, .. } = outcome else {
        return None;
    };

    let text = text.trim();
    if text.is_empty() {
        tracing::warn!("No text detected in image");
        return Some((
            NO_TEXT_MESSAGE.to_string(),
            vec![QaPair::canned(NO_TEXT_QUESTION, NO_TEXT_ANSWER)],
        ));
    }
    if is_all_zeros(text) {
        tracing::warn!("OCR returned only zeros");
        return Some(recognition_problem());
    }
    None
}

fn recognition_problem() -> (String, Vec<QaPair>) {
    (
        RECOGNITION_FAILURE_MESSAGE.to_string(),
        vec![QaPair::canned(RECOGNITION_QUESTION, RECOGNITION_ANSWER)],
    )
}
