use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use atelier_core::domain::product::Product;

use crate::llm::{ChatMessage, CompletionOptions, LlmClient, LlmError};

const SYNTHESIS_SYSTEM_PROMPT: &str = "Sei un assistente professionale per architetti.";

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("reply synthesis call failed: {0}")]
    Completion(#[from] LlmError),
    #[error("reply synthesis returned empty content")]
    EmptyReply,
}

/// Produces the short natural-language reply for a finished search. The model
/// sees the original request and the result count, never full records.
pub struct ResponseSynthesizer {
    llm: Arc<dyn LlmClient>,
}

impl ResponseSynthesizer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn synthesize(
        &self,
        user_query: &str,
        products: &[Product],
    ) -> Result<String, SynthesisError> {
        let summary = if products.is_empty() {
            "Nessun prodotto trovato.".to_string()
        } else {
            format!("Trovati {} prodotti.", products.len())
        };

        let prompt = format!(
            "L'utente ha chiesto: \"{user_query}\".\n{summary}\nRispondi brevemente e professionalmente."
        );

        let messages = [ChatMessage::system(SYNTHESIS_SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let reply = self.llm.complete(&messages, CompletionOptions::default()).await?;

        if reply.trim().is_empty() {
            return Err(SynthesisError::EmptyReply);
        }

        debug!(
            event_name = "agent.synthesizer.completed",
            product_count = products.len(),
            "reply synthesized"
        );

        Ok(reply)
    }
}
