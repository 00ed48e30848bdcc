//! OCR Types
//!
//! Stage outcomes, the final selection result and the text-quality heuristics
//! shared by every engine.

use crate::imaging::EnhanceError;

/// Minimum character count (exclusive) for text to count as meaningful
pub const MEANINGFUL_MIN_CHARS: usize = 5;

/// Returned when no engine produced any text
pub const RECOGNITION_FAILURE_MESSAGE: &str =
    "OCR पहचान में समस्या। कृपया अधिक स्पष्ट छवि का प्रयास करें।";

/// Returned when the upload could not be decoded as an image
pub const UNREADABLE_IMAGE_MESSAGE: &str = "Error: Could not read the image file.";

/// OCR engine type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrEngine {
    /// Neural engine with its own preprocessing (vision model)
    Neural,
    /// Tesseract on the enhanced raster
    Tesseract,
}

/// Result of one stage of the fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The engine produced text that is not digit noise
    Accepted(String),
    /// The engine ran but produced nothing usable, or failed mid-run
    Rejected,
    /// The engine is not installed, not reachable or disabled
    Unavailable,
}

impl StageOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Accepted(text) => Some(text),
            _ => None,
        }
    }

    /// Accepted text that also passes [`is_meaningful`]
    pub fn meaningful_text(&self) -> Option<&str> {
        self.text().filter(|text| is_meaningful(text))
    }
}

/// Final outcome of the OCR pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    /// Text from an engine, possibly low quality
    Text { text: String, engine: OcrEngine },
    /// Every engine came back empty
    Unrecognized,
    /// The upload is not a decodable raster
    Unreadable,
}

impl OcrOutcome {
    /// User-displayable text; never empty for the placeholder outcomes
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text, .. } => text,
            Self::Unrecognized => RECOGNITION_FAILURE_MESSAGE,
            Self::Unreadable => UNREADABLE_IMAGE_MESSAGE,
        }
    }

    pub fn engine(&self) -> Option<OcrEngine> {
        match self {
            Self::Text { engine, .. } => Some(*engine),
            _ => None,
        }
    }
}

/// True when every character is a digit or whitespace (including empty text).
///
/// Both engines misread paper texture as numerals on noisy scans; this is a
/// literal heuristic and cannot tell a genuinely numeric page from noise.
pub fn is_digit_noise(text: &str) -> bool {
    text.chars().all(|c| c.is_numeric() || c.is_whitespace())
}

/// More than [`MEANINGFUL_MIN_CHARS`] characters and not digit noise
pub fn is_meaningful(text: &str) -> bool {
    text.chars().count() > MEANINGFUL_MIN_CHARS && !is_digit_noise(text)
}

/// Non-empty text made only of the character `0`
pub fn is_all_zeros(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c == '0')
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Failed to prepare image: {0}")]
    Image(#[from] EnhanceError),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Internal OCR error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_noise() {
        assert!(is_digit_noise(""));
        assert!(is_digit_noise("  12 3\n4 "));
        assert!(is_digit_noise("१२३ ४५"));
        assert!(!is_digit_noise("12a"));
        assert!(!is_digit_noise("भारत 1947"));
    }

    #[test]
    fn test_meaningful_requires_more_than_five_chars() {
        assert!(!is_meaningful("भारत"));
        assert!(!is_meaningful("abcde"));
        assert!(is_meaningful("abcdef"));
        assert!(!is_meaningful("1234567890"));
        assert!(is_meaningful("ताजमहल आगरा में है"));
    }

    #[test]
    fn test_all_zeros() {
        assert!(is_all_zeros("0"));
        assert!(is_all_zeros("0000"));
        assert!(!is_all_zeros(""));
        assert!(!is_all_zeros("00 00"));
        assert!(!is_all_zeros("0001"));
    }

    #[test]
    fn test_outcome_text_is_displayable() {
        assert_eq!(OcrOutcome::Unrecognized.text(), RECOGNITION_FAILURE_MESSAGE);
        assert_eq!(OcrOutcome::Unreadable.text(), UNREADABLE_IMAGE_MESSAGE);
        let outcome = OcrOutcome::Text {
            text: "नमस्ते".to_string(),
            engine: OcrEngine::Neural,
        };
        assert_eq!(outcome.text(), "नमस्ते");
        assert_eq!(outcome.engine(), Some(OcrEngine::Neural));
    }
}
