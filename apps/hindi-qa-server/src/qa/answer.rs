//! Extractive question answering model

use async_trait::async_trait;
use serde::Deserialize;

use super::inference::InferenceClient;
use super::types::{QaError, MAX_ANSWER_LEN};

/// Span picked by the extractive model. An empty `answer` means the model
/// judged the question unanswerable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelAnswer {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub score: f64,
}

/// Extractive QA model trait
#[async_trait]
pub trait AnswerModel: Send + Sync {
    async fn answer(&self, question: &str, context: &str) -> Result<ModelAnswer, QaError>;
}

/// Some deployments return a ranked list even for a single answer
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswerResponse {
    Many(Vec<ModelAnswer>),
    One(ModelAnswer),
}

/// Answer model backed by a question-answering endpoint
pub struct HfAnswerModel {
    client: InferenceClient,
    model: String,
}

impl HfAnswerModel {
    pub fn new(client: InferenceClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    fn parameters() -> serde_json::Value {
        serde_json::json!({
            "max_answer_len": MAX_ANSWER_LEN,
            "handle_impossible_answer": true
        })
    }
}

#[async_trait]
impl AnswerModel for HfAnswerModel {
    async fn answer(&self, question: &str, context: &str) -> Result<ModelAnswer, QaError> {
        let response: AnswerResponse = self
            .client
            .infer(
                &self.model,
                serde_json::json!({ "question": question, "context": context }),
                Self::parameters(),
            )
            .await?;

        match response {
            AnswerResponse::One(answer) => Ok(answer),
            AnswerResponse::Many(answers) => answers
                .into_iter()
                .next()
                .ok_or_else(|| QaError::EmptyResponse(self.model.clone())),
        }
    }
}

/// Mock answer model for testing
#[cfg(test)]
pub struct MockAnswerModel {
    pub response: Result<ModelAnswer, String>,
}

#[cfg(test)]
impl MockAnswerModel {
    pub fn answering(answer: &str, score: f64) -> Self {
        Self {
            response: Ok(ModelAnswer {
                answer: answer.to_string(),
                score,
            }),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: Err("answer model unavailable".to_string()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl AnswerModel for MockAnswerModel {
    async fn answer(&self, _question: &str, _context: &str) -> Result<ModelAnswer, QaError> {
        self.response.clone().map_err(QaError::Api)
    }
}
