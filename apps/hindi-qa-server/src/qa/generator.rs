//! Question generation
//!
//! One question per sentence from a multilingual seq2seq model.

use async_trait::async_trait;
use serde::Deserialize;

use super::inference::InferenceClient;
use super::types::{QaError, QG_MAX_LENGTH, QG_NO_REPEAT_NGRAM_SIZE, QG_NUM_BEAMS};

/// Question generator trait
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Generate a question about `sentence`; `None` when the model output is blank
    async fn generate(&self, sentence: &str) -> Result<Option<String>, QaError>;
}

/// Prompt embedding the sentence, in the form the model was fine-tuned on
pub fn question_prompt(sentence: &str) -> String {
    format!("generate question: {}", sentence)
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Question generator backed by a text2text-generation endpoint
pub struct HfQuestionGenerator {
    client: InferenceClient,
    model: String,
}

impl HfQuestionGenerator {
    pub fn new(client: InferenceClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    /// Only keys the text2text-generation pipeline accepts; anything else is
    /// forwarded to `generate()` and rejected there.
    fn parameters() -> serde_json::Value {
        serde_json::json!({
            "num_beams": QG_NUM_BEAMS,
            "max_length": QG_MAX_LENGTH,
            "early_stopping": true,
            "no_repeat_ngram_size": QG_NO_REPEAT_NGRAM_SIZE,
            "truncation": true,
            "do_sample": false
        })
    }
}

#[async_trait]
impl QuestionGenerator for HfQuestionGenerator {
    async fn generate(&self, sentence: &str) -> Result<Option<String>, QaError> {
        let outputs: Vec<GeneratedText> = self
            .client
            .infer(
                &self.model,
                serde_json::Value::String(question_prompt(sentence)),
                Self::parameters(),
            )
            .await?;

        let first = outputs
            .into_iter()
            .next()
            .ok_or_else(|| QaError::EmptyResponse(self.model.clone()))?;

        let question = first.generated_text.trim();
        Ok((!question.is_empty()).then(|| question.to_string()))
    }
}

/// Mock generator for testing; counts calls and can fail on demand
#[cfg(test)]
pub struct MockQuestionGenerator {
    pub question: Option<String>,
    pub fail: bool,
    pub calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockQuestionGenerator {
    pub fn returning(question: &str) -> Self {
        Self {
            question: Some(question.to_string()),
            fail: false,
            calls: Default::default(),
        }
    }

    pub fn blank() -> Self {
        Self {
            question: None,
            ..Self::returning("")
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning("")
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl QuestionGenerator for MockQuestionGenerator {
    async fn generate(&self, sentence: &str) -> Result<Option<String>, QaError> {
        self.calls.lock().unwrap().push(sentence.to_string());
        if self.fail {
            return Err(QaError::Api("question model unavailable".to_string()));
        }
        Ok(self.question.clone())
    }
}
