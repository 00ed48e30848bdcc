//! QA Service
//!
//! Runs segmentation, question generation and answer extraction over OCR text.

use std::sync::Arc;
use std::time::Instant;

use super::answer::AnswerModel;
use super::extractor::AnswerExtractor;
use super::generator::QuestionGenerator;
use super::rules::RuleExtractor;
use super::segmenter::Segmenter;
use super::types::{QaError, QaPair, MIN_ANSWER_CHARS, MIN_CONTEXT_CHARS};

/// QA pair generation service
pub struct QaService {
    segmenter: Segmenter,
    generator: Arc<dyn QuestionGenerator>,
    extractor: AnswerExtractor,
}

impl QaService {
    pub fn new(generator: Arc<dyn QuestionGenerator>, answer_model: Arc<dyn AnswerModel>) -> Self {
        let segmenter = Segmenter::new();
        Self {
            segmenter,
            generator,
            extractor: AnswerExtractor::new(answer_model, RuleExtractor::new(segmenter)),
        }
    }

    /// One attempted pair per sentence of at least [`MIN_CONTEXT_CHARS`]
    /// characters, in sentence order. Pairs whose answer is
    /// [`MIN_ANSWER_CHARS`] characters or shorter are dropped.
    ///
    /// Question generation errors propagate; answer model errors do not.
    pub async fn generate_pairs(&self, text: &str) -> Result<Vec<QaPair>, QaError> {
        let mut pairs = Vec::new();

        for (index, sentence) in self.segmenter.split(text).enumerate() {
            let context = sentence.trim();
            if context.chars().count() < MIN_CONTEXT_CHARS {
                tracing::debug!(index, "Skipping short sentence");
                continue;
            }

            let start = Instant::now();
            let Some(question) = self.generator.generate(&sentence).await? else {
                tracing::debug!(index, "Question model returned nothing");
                continue;
            };

            let answer = self.extractor.extract(&question, &sentence).await;
            tracing::debug!(
                index,
                tier = ?answer.tier,
                "Sentence processed in {:.2} seconds",
                start.elapsed().as_secs_f64()
            );

            if answer.text.trim().chars().count() > MIN_ANSWER_CHARS {
                pairs.push(QaPair::generated(&sentence, &question, &answer.text));
            } else {
                tracing::debug!(index, "Dropping pair with too short an answer");
            }
        }

        Ok(pairs)
    }
}
