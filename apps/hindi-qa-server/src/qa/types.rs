//! QA Types

use serde::Serialize;

// ============================================================================
// Constants
// ============================================================================

/// Sentences shorter than this (trimmed, in characters) are skipped
pub const MIN_CONTEXT_CHARS: usize = 20;

/// Final answers must be longer than this (trimmed, in characters)
pub const MIN_ANSWER_CHARS: usize = 3;

/// Model answers of this many characters or fewer go to the rule tier
pub const MIN_MODEL_ANSWER_CHARS: usize = 2;

/// Model answers scoring below this go to the rule tier
pub const MIN_MODEL_SCORE: f64 = 0.1;

/// Longest answer span requested from the extractive model
pub const MAX_ANSWER_LEN: usize = 150;

/// Beam width for question generation
pub const QG_NUM_BEAMS: usize = 5;

/// Upper bound on generated question length, in tokens
pub const QG_MAX_LENGTH: usize = 64;

/// Forbidden repeated n-gram size during generation
pub const QG_NO_REPEAT_NGRAM_SIZE: usize = 2;

// ============================================================================
// QA Pair
// ============================================================================

/// A generated question with its extracted answer.
///
/// `context` is the source sentence; canned explanatory pairs leave it out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QaPair {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn generated(context: &str, question: &str, answer: &str) -> Self {
        Self {
            context: Some(context.to_string()),
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    pub fn canned(question: &str, answer: &str) -> Self {
        Self {
            context: None,
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// QA error types
#[derive(Debug, thiserror::Error)]
pub enum QaError {
    #[error("Model API error: {0}")]
    Api(String),

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    #[error("Model {0} returned no output")]
    EmptyResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_pair_omits_context() {
        let json = serde_json::to_value(QaPair::canned("प्रश्न?", "उत्तर")).unwrap();
        assert!(json.get("context").is_none());
        assert_eq!(json["question"], "प्रश्न?");

        let json = serde_json::to_value(QaPair::generated("वाक्य", "प्रश्न?", "उत्तर")).unwrap();
        assert_eq!(json["context"], "वाक्य");
    }
}
