//! Grounded product Q&A with a deterministic fallback.
//!
//! Each call tries the configured chat model exactly once with a conversation
//! seeded by the product's grounding prompt. Any failure, or no model at all,
//! produces the rule-based answer instead. Callers always get an answer.

use crate::llm::{ChatModel, ModelTurn};
use crate::models::{AnswerSource, ChatRole, ChatTurn, Product};
use crate::prompt::{build_system_prompt, GROUNDING_ACKNOWLEDGEMENT};
use crate::responder::generate_smart_response;
use std::sync::Arc;

/// Result of one Q&A call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiAnswer {
    pub response: String,
    pub source: AnswerSource,
}

impl AiAnswer {
    fn fallback(product: &Product, question: &str) -> Self {
        Self {
            response: generate_smart_response(product, question),
            source: AnswerSource::Fallback,
        }
    }
}

/// Orchestrates the model call and the rule-based fallback.
#[derive(Clone, Default)]
pub struct Assistant {
    model: Option<Arc<dyn ChatModel>>,
}

impl Assistant {
    pub fn new(model: Option<Arc<dyn ChatModel>>) -> Self {
        Self { model }
    }

    /// An assistant with no model that always answers from rules.
    pub fn unconfigured() -> Self {
        Self { model: None }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Answers `question` about `product`, never failing.
    pub async fn generate_ai_response(
        &self,
        product: &Product,
        question: &str,
        history: &[ChatTurn],
    ) -> AiAnswer {
        let Some(model) = &self.model else {
            tracing::warn!("Chat model not configured, answering from rules");
            return AiAnswer::fallback(product, question);
        };

        let turns = seed_conversation(product, history);

        match model.complete(&turns, question).await {
            Ok(text) if !text.trim().is_empty() => {
                tracing::info!(
                    "Answered question about product {} with {}",
                    product.id,
                    model.name()
                );
                AiAnswer {
                    response: text,
                    source: AnswerSource::Gemini,
                }
            }
            Ok(_) => {
                tracing::error!(
                    "{} returned blank text for product {}, using fallback",
                    model.name(),
                    product.id
                );
                AiAnswer::fallback(product, question)
            }
            Err(e) => {
                tracing::error!(
                    "{} failed for product {}: {}, using fallback",
                    model.name(),
                    product.id,
                    e
                );
                AiAnswer::fallback(product, question)
            }
        }
    }
}

/// Grounding prompt, acknowledgement, then caller history in order.
pub fn seed_conversation(product: &Product, history: &[ChatTurn]) -> Vec<ModelTurn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(ModelTurn::user(build_system_prompt(product)));
    turns.push(ModelTurn::model(GROUNDING_ACKNOWLEDGEMENT));
    turns.extend(history.iter().map(|turn| match turn.role {
        ChatRole::User => ModelTurn::user(turn.content.clone()),
        ChatRole::Assistant => ModelTurn::model(turn.content.clone()),
    }));
    turns
}
