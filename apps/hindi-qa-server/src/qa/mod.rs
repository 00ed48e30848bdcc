//! Question-Answer Generation Module
//!
//! Turns OCR text into question-answer pairs, one attempt per sentence:
//!
//! - [`Segmenter`] normalizes Devanagari and splits sentences
//! - [`QuestionGenerator`] asks a seq2seq model for one question per sentence
//! - [`AnswerExtractor`] asks an extractive QA model, falling back to
//!   [`RuleExtractor`] when the model answer is short or low-confidence
//!
//! Models are reached through a Hugging Face compatible inference endpoint.

mod answer;
mod extractor;
mod generator;
mod inference;
mod rules;
mod segmenter;
mod service;
mod types;

pub use answer::{AnswerModel, HfAnswerModel, ModelAnswer};
pub use extractor::{AnswerExtractor, AnswerTier, ExtractedAnswer};
pub use generator::{HfQuestionGenerator, QuestionGenerator};
pub use inference::InferenceClient;
pub use rules::{QuestionKind, RuleExtractor};
pub use segmenter::{Segmenter, Sentences};
pub use service::QaService;
pub use types::*;

#[cfg(test)]
pub(crate) use answer::MockAnswerModel;
#[cfg(test)]
pub(crate) use generator::MockQuestionGenerator;
