//! Two-tier answer extraction: extractive model, then rules

use std::sync::Arc;

use super::answer::AnswerModel;
use super::rules::RuleExtractor;
use super::types::{MIN_MODEL_ANSWER_CHARS, MIN_MODEL_SCORE};

/// Which tier produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerTier {
    Model,
    Rules,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedAnswer {
    pub text: String,
    pub tier: AnswerTier,
}

/// Answer extractor. Model failures never escape; the rule tier always answers.
pub struct AnswerExtractor {
    model: Arc<dyn AnswerModel>,
    rules: RuleExtractor,
}

impl AnswerExtractor {
    pub fn new(model: Arc<dyn AnswerModel>, rules: RuleExtractor) -> Self {
        Self { model, rules }
    }

    pub async fn extract(&self, question: &str, context: &str) -> ExtractedAnswer {
        match self.model.answer(question, context).await {
            Ok(result) => {
                let answer = result.answer.trim();
                if answer.chars().count() > MIN_MODEL_ANSWER_CHARS && result.score >= MIN_MODEL_SCORE {
                    return ExtractedAnswer {
                        text: answer.to_string(),
                        tier: AnswerTier::Model,
                    };
                }
                tracing::debug!(
                    score = result.score,
                    "Model answer too short or unsure, using rule-based extraction"
                );
            }
            Err(e) => {
                tracing::warn!("Answer model failed, using rule-based extraction: {}", e);
            }
        }

        ExtractedAnswer {
            text: self.rules.extract(question, context),
            tier: AnswerTier::Rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qa::MockAnswerModel;

    const CONTEXT: &str = "ताजमहल आगरा शहर में यमुना नदी के किनारे स्थित है।";
    const QUESTION: &str = "ताजमहल कहाँ स्थित है?";

    fn extractor(model: MockAnswerModel) -> AnswerExtractor {
        AnswerExtractor::new(Arc::new(model), RuleExtractor::default())
    }

    #[tokio::test]
    async fn test_confident_model_answer_is_kept() {
        let answer = extractor(MockAnswerModel::answering(" आगरा शहर ", 0.72))
            .extract(QUESTION, CONTEXT)
            .await;
        assert_eq!(answer.text, "आगरा शहर");
        assert_eq!(answer.tier, AnswerTier::Model);
    }

    #[tokio::test]
    async fn test_low_score_uses_rules() {
        let answer = extractor(MockAnswerModel::answering("आगरा शहर", 0.05))
            .extract(QUESTION, CONTEXT)
            .await;
        assert_eq!(answer.tier, AnswerTier::Rules);
        assert_eq!(answer.text, "ताजमहल आगरा शहर में यमुना नदी के किनारे स्थित है");
    }

    #[tokio::test]
    async fn test_score_threshold_is_inclusive() {
        let answer = extractor(MockAnswerModel::answering("आगरा शहर", MIN_MODEL_SCORE))
            .extract(QUESTION, CONTEXT)
            .await;
        assert_eq!(answer.tier, AnswerTier::Model);
    }

    #[tokio::test]
    async fn test_short_or_impossible_answer_uses_rules() {
        for short in ["", "  ", "ab"] {
            let answer = extractor(MockAnswerModel::answering(short, 0.99))
                .extract(QUESTION, CONTEXT)
                .await;
            assert_eq!(answer.tier, AnswerTier::Rules, "answer {:?}", short);
        }
    }

    #[tokio::test]
    async fn test_model_failure_uses_rules() {
        let answer = extractor(MockAnswerModel::failing())
            .extract(QUESTION, CONTEXT)
            .await;
        assert_eq!(answer.tier, AnswerTier::Rules);
        assert!(!answer.text.is_empty());
    }
}
